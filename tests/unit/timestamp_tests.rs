/*!
 * Tests for SRT and LRC timestamp conversion
 */

use syncwai::errors::FormatError;
use syncwai::timestamp::{
    LrcTimestampStyle, parse_srt_timestamp, to_lrc_timestamp, to_lrc_timestamp_with_style, to_srt_timestamp,
};

/// Test the documented SRT examples
#[test]
fn test_toSrtTimestamp_withKnownOffsets_shouldFormatFields() {
    assert_eq!(to_srt_timestamp(0.0).unwrap(), "00:00:00,000");
    assert_eq!(to_srt_timestamp(3661.234).unwrap(), "01:01:01,234");
    assert_eq!(to_srt_timestamp(75.5).unwrap(), "00:01:15,500");
    assert_eq!(to_srt_timestamp(2.5).unwrap(), "00:00:02,500");
}

/// Rounding to milliseconds happens before splitting into fields
#[test]
fn test_toSrtTimestamp_withSubMillisecondCarry_shouldNotProduceSixtySeconds() {
    assert_eq!(to_srt_timestamp(59.9996).unwrap(), "00:01:00,000");
    assert_eq!(to_srt_timestamp(3599.9999).unwrap(), "01:00:00,000");
    assert_eq!(to_srt_timestamp(1.0004).unwrap(), "00:00:01,000");
}

#[test]
fn test_toSrtTimestamp_withInvalidInput_shouldFail() {
    assert_eq!(to_srt_timestamp(-1.0), Err(FormatError::InvalidInput(-1.0)));
    assert!(matches!(to_srt_timestamp(f64::NAN), Err(FormatError::InvalidInput(_))));
    assert!(matches!(to_srt_timestamp(f64::INFINITY), Err(FormatError::InvalidInput(_))));
}

/// Offsets past the millisecond range are rejected instead of saturating
#[test]
fn test_toSrtTimestamp_withHugeOffset_shouldFail() {
    assert_eq!(to_srt_timestamp(1e17), Err(FormatError::InvalidInput(1e17)));
    assert!(matches!(to_srt_timestamp(f64::MAX), Err(FormatError::InvalidInput(_))));
    assert!(to_srt_timestamp(1e12).is_ok());
}

/// Every rendered timestamp has the fixed shape, and string order follows
/// numeric order on the two-digit hour range
#[test]
fn test_toSrtTimestamp_overTwoDigitHourRange_shouldBeWellFormedAndMonotonic() {
    let mut previous = String::new();
    let mut seconds = 0.0;
    while seconds < 359_999.0 {
        let timestamp = to_srt_timestamp(seconds).unwrap();
        assert_eq!(timestamp.len(), 12, "unexpected shape: {}", timestamp);
        assert!(parse_srt_timestamp(&timestamp).is_ok());
        assert!(timestamp >= previous, "{} < {}", timestamp, previous);
        previous = timestamp;
        seconds += 97.123;
    }
}

#[test]
fn test_toLrcTimestamp_withDefaultStyle_shouldPadCentiseconds() {
    assert_eq!(to_lrc_timestamp("00:01:15,500").unwrap(), "[75.50]");
    assert_eq!(to_lrc_timestamp("00:00:00,000").unwrap(), "[0.00]");
    assert_eq!(to_lrc_timestamp("00:00:01,050").unwrap(), "[1.05]");
    assert_eq!(to_lrc_timestamp("01:00:00,999").unwrap(), "[3600.99]");
}

#[test]
fn test_toLrcTimestamp_withReferenceStyle_shouldKeepUnpaddedCentiseconds() {
    let style = LrcTimestampStyle::Reference;
    assert_eq!(to_lrc_timestamp_with_style("00:01:15,500", style).unwrap(), "[75.5]");
    assert_eq!(to_lrc_timestamp_with_style("00:00:01,050", style).unwrap(), "[1.5]");
    assert_eq!(to_lrc_timestamp_with_style("00:00:02,000", style).unwrap(), "[2.0]");
}

#[test]
fn test_toLrcTimestamp_withStandardStyle_shouldUseMinutes() {
    let style = LrcTimestampStyle::Standard;
    assert_eq!(to_lrc_timestamp_with_style("00:01:15,500", style).unwrap(), "[01:15.50]");
    assert_eq!(to_lrc_timestamp_with_style("01:02:03,040", style).unwrap(), "[62:03.04]");
}

/// Centiseconds are truncated, never rounded
#[test]
fn test_toLrcTimestamp_withTrailingMilliseconds_shouldTruncate() {
    assert_eq!(to_lrc_timestamp("00:00:09,999").unwrap(), "[9.99]");
    assert_eq!(to_lrc_timestamp("00:00:09,009").unwrap(), "[9.00]");
}

#[test]
fn test_toLrcTimestamp_withMalformedInput_shouldFail() {
    for input in ["", "1:15.5", "00:01:15.500", "00:61:00,000", "00:00:60,000", "00:00:00,00", "garbage"] {
        assert!(
            matches!(to_lrc_timestamp(input), Err(FormatError::ParseError { .. })),
            "accepted {:?}",
            input
        );
    }
}

/// Hour fields that overflow the offset arithmetic are parse errors
#[test]
fn test_toLrcTimestamp_withOverflowingHours_shouldFail() {
    for input in [
        "5124095576030431:59:59,000",
        "5124095576030431:00:00,000",
        "99999999999999999999:00:00,000",
    ] {
        assert!(
            matches!(to_lrc_timestamp(input), Err(FormatError::ParseError { .. })),
            "accepted {:?}",
            input
        );
        assert!(parse_srt_timestamp(input).is_err());
    }

    let time = parse_srt_timestamp("1000000:00:00,000").unwrap();
    assert_eq!(time.total_seconds(), 3_600_000_000);
}

/// The LRC value always agrees with the SRT text it came from
#[test]
fn test_srtThenLrc_withRoundedOffset_shouldMatchSrtText() {
    let srt = to_srt_timestamp(12.3456).unwrap();
    assert_eq!(srt, "00:00:12,346");
    assert_eq!(to_lrc_timestamp(&srt).unwrap(), "[12.34]");
}

#[test]
fn test_lrcTimestampStyle_parseAndDisplay_shouldUseLowercaseNames() {
    assert_eq!("padded".parse::<LrcTimestampStyle>().unwrap(), LrcTimestampStyle::Padded);
    assert_eq!("Standard".parse::<LrcTimestampStyle>().unwrap(), LrcTimestampStyle::Standard);
    assert!("minutes".parse::<LrcTimestampStyle>().is_err());
    assert_eq!(LrcTimestampStyle::Reference.to_string(), "reference");
    assert_eq!(LrcTimestampStyle::default(), LrcTimestampStyle::Padded);
}
