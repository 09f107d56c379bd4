/*!
 * Lyrics alignment, reconciliation and LRC assembly.
 *
 * - `alignment`: pairs original lyric lines with transcribed lines
 * - `reconciler`: keeps matching lines and asks a corrector about the rest
 * - `lrc`: renders LRC content from subtitle entries and corrected lyrics
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod alignment;
pub mod lrc;
pub mod reconciler;

pub use alignment::{Alignment, AlignmentStrategy, align};
pub use lrc::{LrcAssembler, LrcLine, LrcMetadata, assemble};
pub use reconciler::{LyricsReconciler, reconcile};

/// What to do when two sequences that should pair up have different lengths
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Log a warning and continue with the paired prefix
    #[default]
    Warn,
    /// Abort with a length mismatch error
    Strict,
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => f.write_str("warn"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for MismatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            _ => Err(anyhow::anyhow!("Invalid mismatch policy: {}", s)),
        }
    }
}

/// Split a block of lyrics into lines, dropping blank lines.
///
/// Stanza breaks produce no transcribed segment, so keeping them would pair
/// every later lyric with the wrong segment.
pub fn split_lyrics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
