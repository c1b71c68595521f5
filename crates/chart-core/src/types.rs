// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (surface size, timestamps, time values).

use serde::{Deserialize, Serialize};

/// Default surface width in pixels.
pub const WIDTH: f64 = 1024.0;
/// Default surface height in pixels.
pub const HEIGHT: f64 = 640.0;

/// Seconds since the Unix epoch, UTC. Key of every canonical point.
pub type Timestamp = i64;

/// Seconds in one UTC day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Time as delivered by a crosshair notification.
/// Contract: all variants resolve to the same calendar instant via
/// [`crate::format::resolve_time`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeValue {
    /// Epoch seconds.
    Timestamp(Timestamp),
    /// ISO-like text, e.g. `2024-01-02` or `2024-01-02T10:00:00Z`.
    Text(String),
    /// Calendar day without a time component.
    BusinessDay { year: i32, month: u32, day: u32 },
}

impl From<Timestamp> for TimeValue {
    fn from(t: Timestamp) -> Self { TimeValue::Timestamp(t) }
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self { TimeValue::Text(s.to_string()) }
}
