use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::FormatError;
use crate::timestamp::{self, format_srt_millis, parse_srt_timestamp};

// @module: Transcription segments and SRT documents

// @struct: One recognized utterance from the transcriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Start offset in seconds
    pub start: f64,

    // @field: End offset in seconds
    pub end: f64,

    // @field: Recognized text
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
        }
    }
}

// @struct: Single numbered SRT entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start timestamp, HH:MM:SS,mmm
    pub start: String,

    // @field: End timestamp, HH:MM:SS,mmm
    pub end: String,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Build the entry for the segment at `position` (0-based)
    pub fn from_segment(position: usize, segment: &Segment) -> Result<Self, FormatError> {
        if segment.end < segment.start {
            warn!(
                "Segment {} ends before it starts ({} < {})",
                position + 1,
                segment.end,
                segment.start
            );
        }

        Ok(SubtitleEntry {
            index: position + 1,
            start: timestamp::to_srt_timestamp(segment.start)?,
            end: timestamp::to_srt_timestamp(segment.end)?,
            text: segment.text.trim().to_string(),
        })
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)
    }
}

/// Ordered SRT entries, as written to `transcription.srt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Entries, indexed 1..=N in order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Build one entry per segment, numbered from 1.
    ///
    /// # Errors
    /// Fails with [`FormatError::InvalidInput`] when a segment has a negative
    /// or non-finite offset.
    pub fn build(segments: &[Segment]) -> Result<Self, FormatError> {
        let entries = segments
            .iter()
            .enumerate()
            .map(|(position, segment)| SubtitleEntry::from_segment(position, segment))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Built {} subtitle entries", entries.len());
        Ok(SubtitleDocument { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full SRT text: entries separated by a blank line
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text of every entry, in order
    pub fn transcribed_lines(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.text.clone()).collect()
    }

    /// Parse an SRT document.
    ///
    /// Blocks are separated by blank lines. A byte order mark, CRLF line
    /// endings and a `.` millisecond separator are accepted, multi-line text is joined with a
    /// single space, and entries are renumbered from 1.
    pub fn parse(content: &str) -> Result<Self, FormatError> {
        let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
        let mut entries = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in normalized.lines().chain(std::iter::once("")) {
            if !line.trim().is_empty() {
                block.push(line.trim());
                continue;
            }
            if block.is_empty() {
                continue;
            }

            let entry = Self::parse_block(&block, entries.len() + 1)?;
            entries.push(entry);
            block.clear();
        }

        Ok(SubtitleDocument { entries })
    }

    fn parse_block(block: &[&str], index: usize) -> Result<SubtitleEntry, FormatError> {
        let mut lines = block.iter();

        let number_line = lines.next().copied().unwrap_or_default();
        let declared: usize = number_line
            .parse()
            .map_err(|_| FormatError::parse(number_line, "expected a subtitle sequence number"))?;
        if declared != index {
            debug!("Renumbering subtitle {} as {}", declared, index);
        }

        let timing_line = lines
            .next()
            .copied()
            .ok_or_else(|| FormatError::parse(number_line, "subtitle block has no timing line"))?;
        let (start, end) = timing_line
            .split_once("-->")
            .ok_or_else(|| FormatError::parse(timing_line, "expected 'start --> end'"))?;
        // Trailing position hints after the end timestamp are ignored
        let end = end.split_whitespace().next().unwrap_or_default();

        let text = lines.copied().collect::<Vec<_>>().join(" ");

        Ok(SubtitleEntry {
            index,
            start: Self::normalize_timestamp(start.trim())?,
            end: Self::normalize_timestamp(end)?,
            text,
        })
    }

    fn normalize_timestamp(raw: &str) -> Result<String, FormatError> {
        let time = parse_srt_timestamp(&raw.replace('.', ","))?;
        Ok(format_srt_millis(time.total_millis()))
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render())
    }
}
