// Min-max rescaling of raw scores into a fixed display range.

use serde::{Deserialize, Serialize};

/// Target interval for normalized scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Range used for on-demand formula scores.
    pub const DISPLAY: ScoreRange = ScoreRange { min: 0.0, max: 90.0 };

    pub fn new(min: f64, max: f64) -> Self {
        ScoreRange { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        ScoreRange::DISPLAY
    }
}

/// Rescale `raw` linearly so its smallest value maps to `range.min` and its
/// largest to `range.max`. Output length and order match the input.
///
/// When the input carries no spread (empty, a single value, or all values
/// equal) every output is the range midpoint instead of a division by zero.
///
/// Bounds are taken over finite inputs only. Infinite inputs clamp to the
/// matching end of the range and NaN passes through unchanged.
pub fn normalize(raw: &[f64], range: ScoreRange) -> Vec<f64> {
    let (lo, hi) = finite_bounds(raw);
    // Work on halved values so `hi - lo` cannot overflow for extreme
    // finite inputs.
    let spread = hi / 2.0 - lo / 2.0;
    let degenerate = spread <= 0.0;

    raw.iter()
        .map(|&v| {
            if v.is_nan() {
                v
            } else if v == f64::INFINITY {
                range.max
            } else if v == f64::NEG_INFINITY {
                range.min
            } else if degenerate {
                range.midpoint()
            } else {
                (v / 2.0 - lo / 2.0) / spread * range.span() + range.min
            }
        })
        .collect()
}

/// Smallest and largest finite values, or `(0, 0)` when there are none.
fn finite_bounds(values: &[f64]) -> (f64, f64) {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let Some(first) = finite.next() else {
        return (0.0, 0.0);
    };
    finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
