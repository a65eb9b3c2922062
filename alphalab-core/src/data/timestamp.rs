//! Time column detection and timestamp normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Exact header names tried first, in order of preference.
const TIME_COLUMN_NAMES: [&str; 5] = ["timestamp", "datetime", "date_time", "time", "date"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// Epoch values above this are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Index of the column holding bar time, given lowercased header names.
///
/// Exact timestamp-like names win over date-like ones; failing that, the
/// first header mentioning "time" and then "date" is used.
pub fn find_time_column(headers: &[String]) -> Option<usize> {
    TIME_COLUMN_NAMES
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
        .or_else(|| headers.iter().position(|h| h.contains("time")))
        .or_else(|| headers.iter().position(|h| h.contains("date")))
}

/// Parse one time cell into a naive UTC timestamp.
///
/// Accepts RFC 3339, common date-time and date layouts, and integer Unix
/// epochs in seconds or milliseconds. Dates map to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.len() != 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        let dt = if n > EPOCH_MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(n)?
        } else {
            DateTime::from_timestamp(n, 0)?
        };
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
