/*!
 * Tests for the error types
 */

use syncwai::errors::{AppError, FormatError, InputError, LyricsError, ProviderError, TranscriptionError};

#[test]
fn test_providerError_isTransient_shouldOnlyCoverRetryableKinds() {
    assert!(ProviderError::RateLimitExceeded("x".to_string()).is_transient());
    assert!(ProviderError::ConnectionError("x".to_string()).is_transient());
    assert!(!ProviderError::AuthenticationError("x".to_string()).is_transient());
    assert!(!ProviderError::ParseError("x".to_string()).is_transient());
    assert!(
        !ProviderError::ApiError {
            status_code: 500,
            message: "x".to_string()
        }
        .is_transient()
    );
}

#[test]
fn test_errorDisplay_shouldDescribeTheFailure() {
    assert_eq!(
        FormatError::InvalidInput(-2.0).to_string(),
        "Invalid timestamp input: -2 seconds"
    );
    assert_eq!(
        LyricsError::LengthMismatch {
            original: 3,
            transcribed: 2
        }
        .to_string(),
        "Length mismatch: 3 original line(s) vs 2 transcribed line(s)"
    );
    assert_eq!(
        LyricsError::UnmatchedLines {
            original: 1,
            transcribed: 1
        }
        .to_string(),
        "Unaligned lines: 1 original line(s) and 1 transcribed line(s) have no counterpart"
    );
    assert_eq!(
        TranscriptionError::Timeout(1800).to_string(),
        "Transcription timed out after 1800 seconds"
    );
    assert_eq!(
        InputError::Cancelled("audio file".to_string()).to_string(),
        "Input cancelled: no audio file provided"
    );
}

#[test]
fn test_appError_fromLayerErrors_shouldWrapThem() {
    let error: AppError = LyricsError::from(ProviderError::AuthenticationError("bad key".to_string())).into();
    assert!(matches!(error, AppError::Lyrics(LyricsError::Provider(_))));
    assert!(error.to_string().contains("bad key"));

    let error: AppError = FormatError::InvalidInput(f64::NAN).into();
    assert!(matches!(error, AppError::Format(_)));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("odd").into();
    assert!(matches!(error, AppError::Unknown(_)));

    assert_eq!(AppError::Cancelled.to_string(), "Cancelled by user");
}

#[test]
fn test_transcriptionError_fromJson_shouldWrapParseFailure() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: TranscriptionError = json_error.into();
    assert!(matches!(error, TranscriptionError::Json(_)));
}
