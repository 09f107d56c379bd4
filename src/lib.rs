/*!
 * # SyncWAI - Sync lyrics With AI
 *
 * A Rust library that turns a song into time-synchronized lyrics.
 *
 * ## Features
 *
 * - Transcribe audio with the Whisper command line tool, or load an existing
 *   Whisper JSON transcript or SRT file
 * - Render the transcript as SRT subtitles
 * - Reconcile the user's original lyrics with the transcribed lines,
 *   asking an AI provider to correct lines that differ:
 *   - OpenAI API
 *   - Anthropic API
 *   - Ollama (local LLM)
 *   - LM Studio (OpenAI-compatible local server)
 * - Positional or similarity-based alignment of lyric lines
 * - LRC output with configurable timestamp style and ID tags
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timestamp`: SRT and LRC timestamp conversion
 * - `subtitle_processor`: Segments, subtitle entries and SRT documents
 * - `lyrics`: Lyrics handling:
 *   - `lyrics::alignment`: Pairing original and transcribed lines
 *   - `lyrics::reconciler`: Correction of mismatched lines
 *   - `lyrics::lrc`: LRC assembly
 * - `transcription`: Speech transcription collaborators
 * - `correction`: The corrector seam and the provider-backed service
 * - `providers`: Client implementations for various LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::ollama`: Ollama API client
 * - `input`: Acquisition of the lyrics and audio file
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod correction;
pub mod errors;
pub mod file_utils;
pub mod input;
pub mod language_utils;
pub mod lyrics;
pub mod providers;
pub mod subtitle_processor;
pub mod timestamp;
pub mod transcription;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, PipelineOptions, PipelineOutput, TranscriptSource, build_outputs};
pub use correction::{CorrectionService, Corrector, KeepOriginal};
pub use errors::{AppError, FormatError, InputError, LyricsError, ProviderError, TranscriptionError};
pub use lyrics::{AlignmentStrategy, LrcAssembler, LrcMetadata, MismatchPolicy, reconcile};
pub use subtitle_processor::{Segment, SubtitleDocument, SubtitleEntry};
pub use timestamp::{LrcTimestampStyle, to_lrc_timestamp, to_srt_timestamp};
pub use transcription::{SegmentFile, Transcriber, WhisperCli};
