use std::fmt;

use log::warn;

use crate::errors::FormatError;
use crate::subtitle_processor::SubtitleEntry;
use crate::timestamp::{LrcTimestampStyle, to_lrc_timestamp_with_style};

// @module: LRC content assembly

// @struct: One timed lyric line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrcLine {
    // @field: Bracketed timestamp, e.g. [75.50]
    pub timestamp: String,

    // @field: Lyric text
    pub text: String,
}

impl fmt::Display for LrcLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}{}", self.timestamp, self.text)
    }
}

/// Optional LRC ID tags written before the timed lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LrcMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub by: Option<String>,
}

impl LrcMetadata {
    pub fn is_empty(&self) -> bool {
        self.tags().next().is_none()
    }

    fn tags(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("ti", &self.title),
            ("ar", &self.artist),
            ("al", &self.album),
            ("by", &self.by),
        ]
        .into_iter()
        .filter_map(|(tag, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (tag, v))
        })
    }
}

impl fmt::Display for LrcMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (tag, value) in self.tags() {
            writeln!(f, "[{}:{}]", tag, value)?;
        }
        Ok(())
    }
}

/// Builds LRC content from subtitle entries and reconciled lyrics
#[derive(Debug, Clone, Default)]
pub struct LrcAssembler {
    style: LrcTimestampStyle,
    metadata: LrcMetadata,
}

impl LrcAssembler {
    pub fn new(style: LrcTimestampStyle) -> Self {
        Self {
            style,
            metadata: LrcMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: LrcMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Pair entries with lyrics by position and time each lyric by the
    /// start of its entry. Pairs beyond the shorter input are dropped with a
    /// warning.
    pub fn lines(&self, entries: &[SubtitleEntry], lyrics: &[String]) -> Result<Vec<LrcLine>, FormatError> {
        if entries.len() != lyrics.len() {
            warn!(
                "LRC assembly pairs {} subtitle entries with {} lyric line(s); extra lines are dropped",
                entries.len(),
                lyrics.len()
            );
        }

        entries
            .iter()
            .zip(lyrics)
            .map(|(entry, lyric)| {
                Ok(LrcLine {
                    timestamp: to_lrc_timestamp_with_style(&entry.start, self.style)?,
                    text: lyric.clone(),
                })
            })
            .collect()
    }

    /// Render the LRC content, ID tags first
    pub fn assemble(&self, entries: &[SubtitleEntry], lyrics: &[String]) -> Result<String, FormatError> {
        let mut content = self.metadata.to_string();
        for line in self.lines(entries, lyrics)? {
            content.push_str(&line.to_string());
        }
        Ok(content)
    }
}

/// Assemble LRC content with the default timestamp style and no ID tags
pub fn assemble(entries: &[SubtitleEntry], lyrics: &[String]) -> Result<String, FormatError> {
    LrcAssembler::default().assemble(entries, lyrics)
}
