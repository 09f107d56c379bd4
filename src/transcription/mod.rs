/*!
 * Speech transcription collaborators.
 *
 * - `whisper`: runs the Whisper command line tool on an audio file
 * - `segment_file`: loads segments from a Whisper JSON transcript on disk
 */

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::TranscriptionError;
use crate::subtitle_processor::Segment;

pub mod segment_file;
pub mod whisper;

pub use segment_file::SegmentFile;
pub use whisper::WhisperCli;

/// Audio file extensions offered by default; not enforced
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// Turns an audio file into ordered transcription segments
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio at `audio_path`
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<Segment>, TranscriptionError>;

    /// Short human readable description for logs
    fn describe(&self) -> String;
}

/// Whisper's JSON output, or a bare list of segments
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptDocument {
    Whisper {
        segments: Vec<Segment>,
        #[serde(default)]
        language: Option<String>,
    },
    Segments(Vec<Segment>),
}

/// Parse segments from Whisper JSON (`{"segments": [...]}`) or a bare array.
///
/// Segments are returned sorted by start time.
pub fn parse_segments_json(content: &str) -> Result<Vec<Segment>, TranscriptionError> {
    let document: TranscriptDocument = serde_json::from_str(content)?;
    let mut segments = match document {
        TranscriptDocument::Whisper { segments, language } => {
            if let Some(language) = language {
                log::debug!("Transcript language: {}", language);
            }
            segments
        }
        TranscriptDocument::Segments(segments) => segments,
    };

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(segments)
}
