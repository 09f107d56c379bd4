use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;

use crate::errors::TranscriptionError;
use crate::subtitle_processor::Segment;
use crate::transcription::{Transcriber, parse_segments_json};

/// Transcriber that reads an existing Whisper JSON transcript instead of
/// running a model
#[derive(Debug, Clone)]
pub struct SegmentFile {
    path: PathBuf,
}

impl SegmentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Transcriber for SegmentFile {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Vec<Segment>, TranscriptionError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let segments = parse_segments_json(&content)?;
        info!("Loaded {} segments from {}", segments.len(), self.path.display());
        Ok(segments)
    }

    fn describe(&self) -> String {
        format!("segments from {}", self.path.display())
    }
}
