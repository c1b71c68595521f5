// File: crates/chart-core/src/series.rs
// Summary: Canonical OHLC points and the per-rendering point-at-time lookup.
// Notes:
// - Both renderings share one immutable point slice; only the projection of a
//   point (single value vs. OHLC) differs between them.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::mode::ChartMode;
use crate::types::Timestamp;

/// One normalized record at a unique timestamp.
/// Contract: `value == close`; only [`CanonicalPoint::new`] builds it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoint {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub value: f64,
}

impl CanonicalPoint {
    pub fn new(time: Timestamp, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { time, open, high, low, close, value: close }
    }
}

/// A point as seen by one rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeriesPoint {
    Area { time: Timestamp, value: f64 },
    Candle { time: Timestamp, open: f64, high: f64, low: f64, close: f64 },
}

impl SeriesPoint {
    pub fn time(&self) -> Timestamp {
        match *self {
            SeriesPoint::Area { time, .. } | SeriesPoint::Candle { time, .. } => time,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            SeriesPoint::Area { value, .. } => value.is_finite(),
            SeriesPoint::Candle { open, high, low, close, .. } => {
                open.is_finite() && high.is_finite() && low.is_finite() && close.is_finite()
            }
        }
    }
}

/// One rendering over the shared canonical sequence.
#[derive(Clone, Debug)]
pub struct Series {
    pub mode: ChartMode,
    points: Rc<[CanonicalPoint]>,
}

impl Series {
    pub fn new(mode: ChartMode, points: Rc<[CanonicalPoint]>) -> Self {
        Self { mode, points }
    }

    pub fn points(&self) -> &[CanonicalPoint] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Index of the point keyed exactly at `time` (binary search over the sorted slice).
    pub fn index_of(&self, time: Timestamp) -> Option<usize> {
        self.points.binary_search_by_key(&time, |p| p.time).ok()
    }

    /// The point at `time`, projected for this rendering.
    pub fn point_at(&self, time: Timestamp) -> Option<SeriesPoint> {
        let p = self.points[self.index_of(time)?];
        Some(self.project(&p))
    }

    fn project(&self, p: &CanonicalPoint) -> SeriesPoint {
        match self.mode {
            ChartMode::Area => SeriesPoint::Area { time: p.time, value: p.value },
            ChartMode::Candlestick => SeriesPoint::Candle {
                time: p.time,
                open: p.open,
                high: p.high,
                low: p.low,
                close: p.close,
            },
        }
    }
}

/// Lookup seam used by the tooltip binder: one function from mode to point-at-time.
pub trait PointSource {
    fn point_at(&self, mode: ChartMode, time: Timestamp) -> Option<SeriesPoint>;
}
