//! Parsing of observation timestamps into comparable UTC instants.
//!
//! Measurement exports carry timestamps as free-form strings. Before two
//! observations are compared they are parsed into [`DateTime<Utc>`]; strings that
//! cannot be parsed are never ordered at all.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Naive layouts tried in order after RFC 3339. Naive values are taken as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Offset-carrying layouts RFC 3339 does not cover (minute precision, space
/// separator, no colon in the offset). A trailing `Z` is rewritten to `+00:00`
/// before these are tried.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Conversion of the parsed chrono forms into a UTC instant.
pub(crate) trait IntoUtcDateTime {
    fn into_utc(self) -> DateTime<Utc>;
}

impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self)
    }
}

impl IntoUtcDateTime for DateTime<FixedOffset> {
    fn into_utc(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

/// Parses a raw observation timestamp into a UTC instant.
///
/// Accepts RFC 3339 (with `Z` or an explicit offset), ISO-like naive date-times
/// with a `T` or space separator and optional seconds/fractions (optionally
/// followed by `Z` or a `+hh:mm` / `+hhmm` offset), day-first
/// `DD/MM/YYYY HH:MM[:SS]`, and a bare `YYYY-MM-DD` (taken as midnight).
///
/// Returns `None` for anything else, including empty or whitespace-only input.
///
/// # Examples
///
/// ```
/// use stationmap::parse_instant;
///
/// let a = parse_instant("2024-01-01T00:00").unwrap();
/// let b = parse_instant("2024-01-01T10:00:00+10:00").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_instant("yesterday").is_none());
/// ```
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.into_utc());
    }
    if let Some(dt) = parse_with_offset(raw) {
        return Some(dt.into_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive_dt.into_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(IntoUtcDateTime::into_utc)
}

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    let zulu;
    let raw = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => {
            zulu = format!("{}+00:00", local);
            zulu.as_str()
        }
        None => raw,
    };
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
}
