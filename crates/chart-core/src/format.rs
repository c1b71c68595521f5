// File: crates/chart-core/src/format.rs
// Summary: Fixed two-decimal price formatting with grouping, and time-value resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::normalize::parse_date;
use crate::types::TimeValue;

/// Two-decimal number formatter with locale-style separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceFormatter {
    pub group_separator: char,
    pub decimal_separator: char,
}

impl PriceFormatter {
    /// `1,234.50`
    pub const fn en_us() -> Self { Self { group_separator: ',', decimal_separator: '.' } }
    /// `1.234,50`
    pub const fn de_de() -> Self { Self { group_separator: '.', decimal_separator: ',' } }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
        // "-0.00" is printed as "0.00".
        if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        let digits = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out.push(self.decimal_separator);
        out.push_str(frac_part);
        out
    }
}

impl Default for PriceFormatter {
    fn default() -> Self { Self::en_us() }
}

/// Resolve any crosshair time representation to a UTC calendar instant.
pub fn resolve_time(time: &TimeValue) -> Option<NaiveDateTime> {
    match time {
        TimeValue::Timestamp(t) => DateTime::from_timestamp(*t, 0).map(|dt| dt.naive_utc()),
        TimeValue::Text(s) => parse_date(s).and_then(|t| DateTime::from_timestamp(t, 0)).map(|dt| dt.naive_utc()),
        TimeValue::BusinessDay { year, month, day } => {
            NaiveDate::from_ymd_opt(*year, *month, *day).and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }
}

/// Human-readable date line: `YYYY-MM-DD` at midnight, `YYYY-MM-DD HH:MM` otherwise.
pub fn format_date(dt: &NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M").to_string()
    }
}
