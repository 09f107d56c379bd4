use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use tokio::process::Command;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriptionError;
use crate::language_utils;
use crate::subtitle_processor::Segment;
use crate::transcription::{Transcriber, parse_segments_json};

/// Runs the `whisper` command line tool and reads its JSON transcript
#[derive(Debug, Clone)]
pub struct WhisperCli {
    command: String,
    model: String,
    language: Option<String>,
    device: Option<String>,
    timeout_secs: u64,
}

impl WhisperCli {
    /// Create a transcriber from configuration
    pub fn new(config: &TranscriptionConfig) -> Self {
        let language = config.language.as_deref().map(|code| {
            language_utils::normalize_to_part1_or_part2t(code).unwrap_or_else(|_| code.to_string())
        });

        Self {
            command: config.command.clone(),
            model: config.model.clone(),
            language,
            device: config.device.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Command line arguments for one run
    pub fn build_args(&self, audio_path: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            audio_path.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
            "--verbose".to_string(),
            "False".to_string(),
        ];
        if let Some(language) = &self.language {
            args.extend(["--language".to_string(), language.clone()]);
        }
        if let Some(device) = &self.device {
            args.extend(["--device".to_string(), device.clone()]);
        }
        args
    }

    /// Check that the executable can be started
    pub async fn check_available(&self) -> Result<(), TranscriptionError> {
        let output = Command::new(&self.command)
            .arg("--help")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TranscriptionError::ModelLoad(format!(
                "'{} --help' exited with {}",
                self.command, output.status
            )))
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> TranscriptionError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranscriptionError::ModelLoad(format!(
                "'{}' executable not found; install openai-whisper or set transcription.command",
                self.command
            ))
        } else {
            TranscriptionError::Io(e)
        }
    }

    /// Keep the last lines of whisper's stderr; the traceback tail holds the cause
    pub fn summarize_stderr(stderr: &str) -> String {
        let lines: Vec<&str> = stderr
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !line.contains('%') || !line.contains('|'))
            .collect();
        let start = lines.len().saturating_sub(5);
        lines[start..].join("\n")
    }

    /// Sort a failed run into a model load failure or a transcription failure
    pub fn classify_failure(stderr: &str) -> TranscriptionError {
        let summary = Self::summarize_stderr(stderr);
        let lower = stderr.to_lowercase();
        let model_problem = (lower.contains("model") && lower.contains("not found"))
            || lower.contains("available models")
            || lower.contains("checksum")
            || lower.contains("failed to load");

        if model_problem {
            TranscriptionError::ModelLoad(summary)
        } else {
            TranscriptionError::Failed(summary)
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<Segment>, TranscriptionError> {
        if !audio_path.is_file() {
            return Err(TranscriptionError::Failed(format!(
                "Audio file does not exist: {}",
                audio_path.display()
            )));
        }

        let output_dir = tempfile::tempdir()?;
        let args = self.build_args(audio_path, output_dir.path());
        debug!("Running {} {}", self.command, args.join(" "));

        let whisper_future = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = whisper_future => result.map_err(|e| self.spawn_error(e))?,
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscriptionError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Whisper exited with {}", output.status);
            return Err(Self::classify_failure(&stderr));
        }

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        let json_path = output_dir.path().join(format!("{}.json", stem));
        let content = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            TranscriptionError::Failed(format!("Whisper produced no transcript at {}: {}", json_path.display(), e))
        })?;

        let segments = parse_segments_json(&content)?;
        info!("Transcribed {} segments with whisper model '{}'", segments.len(), self.model);
        Ok(segments)
    }

    fn describe(&self) -> String {
        format!("whisper ({} model)", self.model)
    }
}
