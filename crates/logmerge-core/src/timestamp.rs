//! Timestamp normaliser: turns a captured header string into a
//! timezone-aware instant.
//!
//! A string that ends in an explicit offset (`+05`, `-0700`, `+05:30`, `Z`,
//! `UTC`, `GMT`) is parsed as-is. Anything else is read as a wall-clock time
//! in the local zone, unless the normaliser assumes UTC, in which case the
//! string is re-parsed with a literal `" +00:00"` suffix. A time-only string
//! is placed on today's date in the local zone.
//!
//! The same rules apply to header timestamps and to `--from`/`--to` bounds.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::TimestampError;

/// A parsed instant, carrying the offset it was written (or inferred) with.
pub type Timestamp = DateTime<FixedOffset>;

// ---------------------------------------------------------------------------
// Offset detection
// ---------------------------------------------------------------------------

/// Offset directly after a time of day: `10:00:00+01:00`, `10:00:00.5 Z`,
/// `10:00:00 GMT`.
static OFFSET_AFTER_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<local>.*\d{1,2}:\d{2}(?::\d{2}(?:[.,]\d+)?)?(?:\s*[ap]m)?)\s*(?P<offset>z|utc|gmt|[+-]\d{2}(?::?\d{2})?)$",
    )
    .expect("offset-after-time pattern is valid")
});

/// Offset separated by whitespace from any other date form: `2024-01-01 +00:00`.
static OFFSET_AFTER_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<local>.*\d)\s+(?P<offset>z|utc|gmt|[+-]\d{2}(?::?\d{2})?)$")
        .expect("offset-after-space pattern is valid")
});

/// log4j-style comma before fractional seconds.
static COMMA_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}),(\d)").expect("comma fraction pattern is valid")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M:%S%.f %p",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S%.f %p",
    "%m/%d/%Y %I:%M %p",
    "%d %b %Y %H:%M:%S%.f",
    "%b %d %Y %H:%M:%S%.f",
    "%a, %d %b %Y %H:%M:%S%.f",
    "%a, %d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S%.f %p", "%I:%M %p"];

// ---------------------------------------------------------------------------
// Normaliser
// ---------------------------------------------------------------------------

/// Parses timestamp strings with a fixed "assume UTC" policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampNormalizer {
    assume_utc: bool,
}

impl TimestampNormalizer {
    pub const fn new(assume_utc: bool) -> Self {
        Self { assume_utc }
    }

    /// Normalise `raw` against the machine's local time zone.
    pub fn normalize(&self, raw: &str) -> Result<Timestamp, TimestampError> {
        self.normalize_in(raw, &Local)
    }

    /// Normalise `raw`, using `local` as the zone for offset-less strings.
    pub fn normalize_in<Tz: TimeZone>(
        &self,
        raw: &str,
        local: &Tz,
    ) -> Result<Timestamp, TimestampError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimestampError::Empty);
        }

        if let Some(explicit) = parse_explicit(trimmed, local) {
            return explicit;
        }

        let naive = parse_naive(trimmed, local)
            .ok_or_else(|| TimestampError::Unrecognised(trimmed.to_string()))?;
        // A wall-clock time in a DST gap has no local offset; with UTC assumed
        // it still takes the re-parse below.
        match local.from_local_datetime(&naive).earliest() {
            Some(inferred) if !self.assume_utc || inferred.offset().fix().local_minus_utc() == 0 => {
                let offset = inferred.offset().fix();
                Ok(inferred.with_timezone(&offset))
            }
            _ if self.assume_utc => parse_explicit(&format!("{trimmed} +00:00"), local)
                .unwrap_or_else(|| Err(TimestampError::Unrecognised(trimmed.to_string()))),
            _ => Err(TimestampError::NonexistentLocalTime(trimmed.to_string())),
        }
    }
}

/// Free-function form of [`TimestampNormalizer::normalize`].
pub fn normalize(raw: &str, assume_utc: bool) -> Result<Timestamp, TimestampError> {
    TimestampNormalizer::new(assume_utc).normalize(raw)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `None` when `s` carries no explicit offset.
fn parse_explicit<Tz: TimeZone>(s: &str, local: &Tz) -> Option<Result<Timestamp, TimestampError>> {
    let caps = OFFSET_AFTER_TIME
        .captures(s)
        .or_else(|| OFFSET_AFTER_SPACE.captures(s))?;

    let wall = caps.name("local").map_or("", |m| m.as_str()).trim_end();
    let offset = caps.name("offset").map_or("", |m| m.as_str());

    let Some(offset) = parse_offset(offset) else {
        return Some(Err(TimestampError::Unrecognised(s.to_string())));
    };
    let parsed = parse_naive(wall, local)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| TimestampError::Unrecognised(s.to_string()));
    Some(parsed)
}

/// Date-time, date-only (midnight) or time-only (today in `local`).
fn parse_naive<Tz: TimeZone>(s: &str, local: &Tz) -> Option<NaiveDateTime> {
    let s = COMMA_FRACTION.replace(s.trim(), "${1}.${2}");

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| {
            let time = TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(&s, fmt).ok())?;
            Some(today_in(local).and_time(time))
        })
}

fn today_in<Tz: TimeZone>(zone: &Tz) -> NaiveDate {
    Utc::now().with_timezone(zone).date_naive()
}

/// `Z`, `UTC`, `GMT`, `+HH`, `+HHMM` or `+HH:MM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if ["z", "utc", "gmt"].iter().any(|name| s.eq_ignore_ascii_case(name)) {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match s.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits.get(..2)?.parse::<i32>().ok()?,
            digits.get(2..)?.parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
