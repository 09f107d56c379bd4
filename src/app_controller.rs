use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};

use crate::app_config::{Config, OutputConfig};
use crate::correction::{CorrectionService, Corrector};
use crate::errors::{AppError, LyricsError, TranscriptionError};
use crate::file_utils::FileManager;
use crate::lyrics::{AlignmentStrategy, LrcAssembler, LrcMetadata, LyricsReconciler, MismatchPolicy, align};
use crate::subtitle_processor::SubtitleDocument;
use crate::timestamp::LrcTimestampStyle;
use crate::transcription::{SegmentFile, Transcriber, WhisperCli};

// @module: Application controller for lyrics synchronization

/// Where the timed transcript comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSource {
    /// Transcribe an audio file
    Audio(PathBuf),
    /// Load Whisper JSON segments
    Segments(PathBuf),
    /// Re-use an existing SRT file
    Srt(PathBuf),
}

/// Options that shape the generated outputs
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub lrc_style: LrcTimestampStyle,
    pub alignment: AlignmentStrategy,
    pub mismatch_policy: MismatchPolicy,
    pub metadata: LrcMetadata,
}

impl From<&OutputConfig> for PipelineOptions {
    fn from(output: &OutputConfig) -> Self {
        Self {
            lrc_style: output.lrc_style,
            alignment: output.alignment,
            mismatch_policy: output.mismatch_policy,
            metadata: LrcMetadata::default(),
        }
    }
}

/// Rendered outputs of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// SRT content for the whole transcript
    pub srt: String,
    /// LRC content for the aligned lyric lines
    pub lrc: String,
    /// Number of subtitle entries
    pub entries: usize,
    /// Number of timed lyric lines
    pub lyric_lines: usize,
}

/// What a completed run wrote
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub srt_path: PathBuf,
    pub lrc_path: PathBuf,
    pub entries: usize,
    pub lyric_lines: usize,
    pub elapsed: Duration,
}

/// Align, reconcile and render both outputs from a subtitle document.
///
/// The SRT output covers every entry. The LRC output only covers the lines
/// the alignment paired; a remainder is an error under the strict policy and
/// a warning otherwise.
pub async fn build_outputs<C: Corrector + ?Sized>(
    document: &SubtitleDocument,
    original_lyrics: &[String],
    corrector: &C,
    options: &PipelineOptions,
    progress: Option<ProgressBar>,
) -> Result<PipelineOutput, AppError> {
    let transcribed = document.transcribed_lines();
    let alignment = align(original_lyrics, &transcribed, options.alignment);

    if alignment.has_remainder() {
        match options.mismatch_policy {
            MismatchPolicy::Strict => {
                let error = match options.alignment {
                    AlignmentStrategy::Positional => LyricsError::LengthMismatch {
                        original: original_lyrics.len(),
                        transcribed: transcribed.len(),
                    },
                    AlignmentStrategy::Sequence { .. } => LyricsError::UnmatchedLines {
                        original: alignment.unmatched_original.len(),
                        transcribed: alignment.unmatched_transcribed.len(),
                    },
                };
                return Err(error.into());
            }
            MismatchPolicy::Warn => warn!(
                "{} original line(s) and {} transcribed line(s) could not be paired ({} alignment); they are left out of the LRC",
                alignment.unmatched_original.len(),
                alignment.unmatched_transcribed.len(),
                options.alignment
            ),
        }
    }

    let aligned_original = alignment.select_original(original_lyrics);
    let aligned_transcribed = alignment.select_transcribed(&transcribed);
    let aligned_entries = alignment.select_transcribed(&document.entries);

    let mut reconciler = LyricsReconciler::new(corrector).with_policy(options.mismatch_policy);
    if let Some(progress) = progress.clone() {
        progress.set_length(aligned_original.len() as u64);
        reconciler = reconciler.with_progress(progress);
    }
    let reconciled = reconciler.reconcile(&aligned_original, &aligned_transcribed).await?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let lrc = LrcAssembler::new(options.lrc_style)
        .with_metadata(options.metadata.clone())
        .assemble(&aligned_entries, &reconciled)?;

    Ok(PipelineOutput {
        srt: document.render(),
        lrc,
        entries: document.len(),
        lyric_lines: reconciled.len(),
    })
}

/// Main application controller for lyrics synchronization
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The transcriber configured for audio input
    pub fn whisper(&self) -> WhisperCli {
        WhisperCli::new(&self.config.transcription)
    }

    /// The corrector configured for mismatched lines, `None` when correction
    /// is disabled
    pub fn correction_service(&self) -> Option<CorrectionService> {
        if self.config.correction.enabled {
            Some(CorrectionService::new(&self.config.correction))
        } else {
            None
        }
    }

    /// Check that whisper starts and the correction provider answers
    pub async fn check(&self) -> Result<(), AppError> {
        let whisper = self.whisper();
        match whisper.check_available().await {
            Ok(()) => info!("{} is available", whisper.describe()),
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        }

        match self.correction_service() {
            Some(service) => {
                service.test_connection().await?;
                info!(
                    "{} is reachable (model '{}')",
                    service.provider().display_name(),
                    service.model()
                );
            }
            None => info!("Correction is disabled; no provider to check"),
        }

        Ok(())
    }

    /// Obtain the subtitle document for `source`
    pub async fn load_document<T: Transcriber + ?Sized>(
        &self,
        source: &TranscriptSource,
        transcriber: &T,
    ) -> Result<SubtitleDocument, AppError> {
        let segments = match source {
            TranscriptSource::Srt(path) => {
                let content = FileManager::read_to_string(path).map_err(|e| AppError::File(format!("{:#}", e)))?;
                let document = SubtitleDocument::parse(&content)?;
                info!("Loaded {} subtitle entries from {}", document.len(), path.display());
                return Ok(document);
            }
            TranscriptSource::Segments(path) => SegmentFile::new(path).transcribe(path).await?,
            TranscriptSource::Audio(path) => {
                let spinner = Self::spinner(format!("Transcribing with {}", transcriber.describe()));
                let result = transcriber.transcribe(path).await;
                spinner.finish_and_clear();
                result?
            }
        };

        if segments.is_empty() {
            return Err(TranscriptionError::Failed("the transcript contains no segments".to_string()).into());
        }

        Ok(SubtitleDocument::build(&segments)?)
    }

    /// Build both outputs without writing anything
    pub async fn process<T, C>(
        &self,
        source: &TranscriptSource,
        transcriber: &T,
        original_lyrics: &[String],
        corrector: &C,
        metadata: LrcMetadata,
    ) -> Result<PipelineOutput, AppError>
    where
        T: Transcriber + ?Sized,
        C: Corrector + ?Sized,
    {
        let document = self.load_document(source, transcriber).await?;
        debug!("Subtitle document has {} entries", document.len());

        let options = PipelineOptions {
            metadata,
            ..PipelineOptions::from(&self.config.output)
        };
        let progress = Self::progress_bar(original_lyrics.len().min(document.len()));
        build_outputs(&document, original_lyrics, corrector, &options, Some(progress)).await
    }

    /// Write both outputs into the configured directory, or neither
    pub fn write_outputs(&self, output: &PipelineOutput) -> Result<(PathBuf, PathBuf), AppError> {
        let srt_path = self.config.output.srt_path();
        let lrc_path = self.config.output.lrc_path();

        FileManager::write_all_or_nothing(&[
            (srt_path.clone(), output.srt.clone()),
            (lrc_path.clone(), output.lrc.clone()),
        ])
        .map_err(|e| AppError::File(format!("{:#}", e)))?;

        Ok((srt_path, lrc_path))
    }

    /// Run the whole workflow and write the outputs.
    ///
    /// Ctrl-C before the outputs are written cancels the run and leaves
    /// existing files untouched.
    pub async fn run<T, C>(
        &self,
        source: &TranscriptSource,
        transcriber: &T,
        original_lyrics: &[String],
        corrector: &C,
        metadata: LrcMetadata,
    ) -> Result<RunSummary, AppError>
    where
        T: Transcriber + ?Sized,
        C: Corrector + ?Sized,
    {
        let start_time = Instant::now();

        let output = tokio::select! {
            result = self.process(source, transcriber, original_lyrics, corrector, metadata) => result?,
            _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {
                warn!("Interrupted, no output written");
                return Err(AppError::Cancelled);
            }
        };

        let (srt_path, lrc_path) = self.write_outputs(&output)?;
        let elapsed = start_time.elapsed();

        info!("Subtitles written to {}", srt_path.display());
        info!("Lyrics written to {}", lrc_path.display());
        info!(
            "Synchronized {} lyric line(s) over {} subtitle entries in {}",
            output.lyric_lines,
            output.entries,
            Self::format_duration(elapsed)
        );

        Ok(RunSummary {
            srt_path,
            lrc_path,
            entries: output.entries,
            lyric_lines: output.lyric_lines,
            elapsed,
        })
    }

    fn spinner(message: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn progress_bar(len: usize) -> ProgressBar {
        let progress_bar = ProgressBar::new(len as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Human readable duration, e.g. `1m 05s`
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {:02}m {:02}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {:02}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}

/// Resolve once `signal` reports an interrupt.
///
/// A signal handler that cannot be installed never resolves, so the run
/// continues without Ctrl-C support instead of being reported as cancelled.
pub(crate) async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {}
        Err(e) => {
            warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
