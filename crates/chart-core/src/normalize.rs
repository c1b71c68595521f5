// File: crates/chart-core/src/normalize.rs
// Summary: Raw feed rows -> canonical, time-ordered, deduplicated point sequence.
// Notes:
// - Dedup policy is keep-last: for equal timestamps the row appearing later in
//   the input replaces earlier ones.
// - Bad rows are rejected individually and reported; they never abort the batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::series::CanonicalPoint;
use crate::types::{Timestamp, SECONDS_PER_DAY};

/// One untyped record from a tabular feed. Unknown columns are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl RawRow {
    pub fn new(date: &str, open: &str, high: &str, low: &str, close: &str) -> Self {
        Self {
            date: date.to_string(),
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
        })
    }
}

/// Why a single row was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("unparsable date {0:?}")]
    Date(String),
    #[error("non-numeric {field} value {raw:?}")]
    Value { field: Field, raw: String },
}

/// A dropped row: its position in the input and the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRow {
    pub index: usize,
    pub error: RowError,
}

/// How finely timestamps are keyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeResolution {
    /// Truncate to UTC midnight; one point per calendar day.
    #[default]
    Day,
    /// Keep the full parsed timestamp.
    Exact,
}

impl TimeResolution {
    /// Key of `time` at this resolution; `None` when it cannot be represented.
    pub fn key(self, time: Timestamp) -> Option<Timestamp> {
        match self {
            TimeResolution::Day => time.div_euclid(SECONDS_PER_DAY).checked_mul(SECONDS_PER_DAY),
            TimeResolution::Exact => Some(time),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizeOptions {
    pub resolution: TimeResolution,
}

/// Result of a normalization pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    /// Strictly ascending by `time`, at most one point per timestamp.
    pub points: Vec<CanonicalPoint>,
    pub rejected: Vec<RejectedRow>,
}

/// Normalize with default options (day resolution).
pub fn normalize(rows: &[RawRow]) -> Normalized {
    normalize_with(rows, &NormalizeOptions::default())
}

pub fn normalize_with(rows: &[RawRow], opts: &NormalizeOptions) -> Normalized {
    let mut points = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match parse_row(row, opts.resolution) {
            Ok(p) => points.push(p),
            Err(error) => {
                warn!(index, %error, "dropping feed row");
                rejected.push(RejectedRow { index, error });
            }
        }
    }

    // Stable sort keeps input order among equal keys, so the last of each run wins.
    points.sort_by_key(|p| p.time);
    let mut out: Vec<CanonicalPoint> = Vec::with_capacity(points.len());
    for p in points {
        match out.last_mut() {
            Some(last) if last.time == p.time => *last = p,
            _ => out.push(p),
        }
    }

    debug!(rows = rows.len(), points = out.len(), rejected = rejected.len(), "normalized feed");
    Normalized { points: out, rejected }
}

fn parse_row(row: &RawRow, resolution: TimeResolution) -> Result<CanonicalPoint, RowError> {
    let time = parse_date(&row.date)
        .and_then(|t| resolution.key(t))
        .ok_or_else(|| RowError::Date(row.date.clone()))?;
    let open = parse_value(&row.open, Field::Open)?;
    let high = parse_value(&row.high, Field::High)?;
    let low = parse_value(&row.low, Field::Low)?;
    let close = parse_value(&row.close, Field::Close)?;
    Ok(CanonicalPoint::new(time, open, high, low, close))
}

fn parse_value(raw: &str, field: Field) -> Result<f64, RowError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::Value { field, raw: raw.to_string() })
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a feed date into UTC epoch seconds.
///
/// Accepts plain dates, naive date-times (taken as UTC), RFC 3339, pandas-style
/// `YYYY-MM-DD HH:MM:SS+HH:MM`, and bare epoch integers (milliseconds when above 10^12).
/// Epochs outside the calendar range chrono can represent are rejected.
pub fn parse_date(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms -> sec; out of calendar range is unparsable
        let dt = if n > 10_i64.pow(12) { DateTime::from_timestamp_millis(n) } else { DateTime::from_timestamp(n, 0) };
        return dt.map(|dt| dt.timestamp());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.timestamp());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    None
}
