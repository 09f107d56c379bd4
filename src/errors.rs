/*!
 * Error types for the syncwai application.
 *
 * This module contains custom error types for the different layers of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while formatting or parsing timestamps and SRT content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A seconds offset that cannot be rendered (negative, NaN or infinite)
    #[error("Invalid timestamp input: {0} seconds")]
    InvalidInput(f64),

    /// A string that is not a well-formed SRT timestamp or document
    #[error("Failed to parse '{input}': {reason}")]
    ParseError {
        /// The offending input
        input: String,
        /// What was wrong with it
        reason: String,
    },
}

impl FormatError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while running the speech transcription collaborator
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The speech model or its executable could not be loaded
    #[error("Failed to load transcription model: {0}")]
    ModelLoad(String),

    /// The model ran but did not produce a transcript
    #[error("Transcription failed: {0}")]
    Failed(String),

    /// The transcription did not finish before the deadline
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// File system error around the transcription output
    #[error("Transcription I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transcript file could not be decoded
    #[error("Invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a retry with backoff may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimitExceeded(_) | Self::ConnectionError(_))
    }

    /// Map a non-success HTTP status and body to the matching error kind
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::RequestFailed(format!("request timed out: {}", error))
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while reconciling and assembling lyrics
#[derive(Error, Debug)]
pub enum LyricsError {
    /// The correction service failed
    #[error("Correction service error: {0}")]
    Provider(#[from] ProviderError),

    /// A timestamp could not be converted
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Original and transcribed sequences could not be paired completely
    #[error("Length mismatch: {original} original line(s) vs {transcribed} transcribed line(s)")]
    LengthMismatch {
        /// Number of original lyric lines
        original: usize,
        /// Number of transcribed lines
        transcribed: usize,
    },

    /// Sequence alignment left lines unpaired
    #[error("Unaligned lines: {original} original line(s) and {transcribed} transcribed line(s) have no counterpart")]
    UnmatchedLines {
        /// Original lyric lines left unpaired
        original: usize,
        /// Transcribed lines left unpaired
        transcribed: usize,
    },
}

/// Errors raised while acquiring the user's inputs
#[derive(Error, Debug)]
pub enum InputError {
    /// The user gave an empty answer to a required step
    #[error("Input cancelled: no {0} provided")]
    Cancelled(String),

    /// The given path does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Reading the input failed
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from timestamp or SRT handling
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from lyrics reconciliation
    #[error("Lyrics error: {0}")]
    Lyrics(#[from] LyricsError),

    /// Error while acquiring inputs
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The run was interrupted by the user
    #[error("Cancelled by user")]
    Cancelled,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
