// File: crates/chart-core/src/scale.rs
// Summary: Horizontal time scale mapping bar indices to surface pixels and back.

/// Logical X coordinate: bar index into the canonical sequence.
pub type Logical = f64;

/// Horizontal time scale controlled via logical start and bar spacing (px per bar).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f64,
    pub start_logical: Logical,
    pub bar_spacing: f64,
}

impl TimeScale {
    pub fn new(left_px: f64, start_logical: Logical, bar_spacing: f64) -> Self {
        Self { left_px, start_logical, bar_spacing: bar_spacing.max(0.01) }
    }

    /// Spread `bars` evenly over `width` pixels, each bar centered in its slot.
    pub fn fit(width: f64, bars: usize) -> Self {
        let spacing = if bars == 0 { width.max(1.0) } else { width.max(1.0) / bars as f64 };
        Self::new(spacing * 0.5, 0.0, spacing)
    }

    #[inline]
    pub fn to_px(&self, x: Logical) -> f64 {
        self.left_px + (x - self.start_logical) * self.bar_spacing
    }

    #[inline]
    pub fn from_px(&self, px: f64) -> Logical {
        self.start_logical + (px - self.left_px) / self.bar_spacing
    }

    /// Nearest bar index under `px`, or `None` when it falls outside `0..bars`.
    pub fn index_at(&self, px: f64, bars: usize) -> Option<usize> {
        let logical = self.from_px(px).round();
        if !logical.is_finite() || logical < 0.0 || logical >= bars as f64 {
            return None;
        }
        Some(logical as usize)
    }
}
