/*!
 * Timestamp conversions between transcription offsets, SRT and LRC.
 *
 * Transcription segments carry floating point second offsets. Those are
 * rendered as SRT timestamps (`HH:MM:SS,mmm`), and LRC timestamps are
 * re-derived from the SRT text rather than from the original offsets, so the
 * LRC output always agrees with what was written to the SRT file.
 */

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FormatError;

// @const: Single SRT timestamp, hours may widen past two digits
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}),(\d{3})$").expect("valid SRT timestamp regex")
});

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// How LRC timestamps are written
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LrcTimestampStyle {
    /// `[75.5]`: total seconds, unpadded centiseconds
    Reference,
    /// `[75.50]`: total seconds, two-digit centiseconds
    #[default]
    Padded,
    /// `[01:15.50]`: minutes, seconds and centiseconds
    Standard,
}

impl LrcTimestampStyle {
    // @returns: Lowercase style identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Padded => "padded",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for LrcTimestampStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LrcTimestampStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(Self::Reference),
            "padded" => Ok(Self::Padded),
            "standard" => Ok(Self::Standard),
            _ => Err(anyhow::anyhow!("Invalid LRC timestamp style: {}", s)),
        }
    }
}

/// Convert a seconds offset into an SRT timestamp (`HH:MM:SS,mmm`).
///
/// The offset is rounded to whole milliseconds before it is split into
/// fields, so a value such as `59.9996` carries into the minutes field and
/// renders as `00:01:00,000`. Hours are zero padded to two digits and widen
/// for recordings longer than 99 hours.
///
/// # Errors
/// Returns [`FormatError::InvalidInput`] for negative, NaN or infinite input
/// and for offsets too large to count in milliseconds.
pub fn to_srt_timestamp(seconds: f64) -> Result<String, FormatError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(FormatError::InvalidInput(seconds));
    }

    let total_ms = (seconds * 1000.0).round();
    if total_ms >= u64::MAX as f64 {
        return Err(FormatError::InvalidInput(seconds));
    }
    Ok(format_srt_millis(total_ms as u64))
}

/// Render a millisecond offset as an SRT timestamp
pub fn format_srt_millis(total_ms: u64) -> String {
    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// The fields of a parsed SRT timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrtTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl SrtTime {
    /// Whole seconds, dropping the millisecond part
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes * 60)
            .saturating_add(self.seconds)
    }

    /// Centiseconds, truncated from the millisecond part
    pub fn centiseconds(&self) -> u64 {
        self.millis / 10
    }

    /// Offset in milliseconds
    pub fn total_millis(&self) -> u64 {
        self.total_seconds()
            .saturating_mul(MS_PER_SECOND)
            .saturating_add(self.millis)
    }
}

/// Parse a strict `HH:MM:SS,mmm` timestamp.
///
/// # Errors
/// Returns [`FormatError::ParseError`] when the text does not have that exact
/// shape, when minutes or seconds are out of range, or when the offset
/// does not fit in a millisecond count.
pub fn parse_srt_timestamp(timestamp: &str) -> Result<SrtTime, FormatError> {
    let captures = SRT_TIMESTAMP_REGEX
        .captures(timestamp)
        .ok_or_else(|| FormatError::parse(timestamp, "expected HH:MM:SS,mmm"))?;

    let field = |i: usize, name: &str| -> Result<u64, FormatError> {
        captures[i]
            .parse::<u64>()
            .map_err(|e| FormatError::parse(timestamp, format!("invalid {}: {}", name, e)))
    };

    let time = SrtTime {
        hours: field(1, "hours")?,
        minutes: field(2, "minutes")?,
        seconds: field(3, "seconds")?,
        millis: field(4, "milliseconds")?,
    };

    if time.minutes >= 60 || time.seconds >= 60 {
        return Err(FormatError::parse(timestamp, "minutes and seconds must be below 60"));
    }

    // Every timestamp that parses must have an exact millisecond offset
    time.hours
        .checked_mul(3600)
        .and_then(|s| s.checked_add(time.minutes * 60 + time.seconds))
        .and_then(|s| s.checked_mul(MS_PER_SECOND))
        .and_then(|ms| ms.checked_add(time.millis))
        .ok_or_else(|| FormatError::parse(timestamp, "hours out of range"))?;

    Ok(time)
}

/// Convert an SRT timestamp into an LRC timestamp using the default style
/// ([`LrcTimestampStyle::Padded`]).
///
/// `"00:01:15,500"` becomes `"[75.50]"`.
pub fn to_lrc_timestamp(srt_timestamp: &str) -> Result<String, FormatError> {
    to_lrc_timestamp_with_style(srt_timestamp, LrcTimestampStyle::default())
}

/// Convert an SRT timestamp into an LRC timestamp.
///
/// Whole seconds are summed from the hour, minute and second fields and the
/// milliseconds are truncated to centiseconds. Nothing is rounded.
pub fn to_lrc_timestamp_with_style(
    srt_timestamp: &str,
    style: LrcTimestampStyle,
) -> Result<String, FormatError> {
    let time = parse_srt_timestamp(srt_timestamp)?;
    let total_seconds = time.total_seconds();
    let centiseconds = time.centiseconds();

    Ok(match style {
        LrcTimestampStyle::Reference => format!("[{}.{}]", total_seconds, centiseconds),
        LrcTimestampStyle::Padded => format!("[{}.{:02}]", total_seconds, centiseconds),
        LrcTimestampStyle::Standard => format!(
            "[{:02}:{:02}.{:02}]",
            total_seconds / 60,
            total_seconds % 60,
            centiseconds
        ),
    })
}
