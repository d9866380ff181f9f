//! Column statistics used for imputation and scaling.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// STREAMING MOMENTS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.
// Values are accumulated divided by a power of two at least as large as the
// biggest magnitude seen, so the running differences stay finite for any
// finite input. Power-of-two scaling is exact.

/// Streaming mean/variance accumulator using Welford's algorithm.
#[derive(Debug, Clone, Default)]
pub(crate) struct StreamingStats {
    count: usize,
    scale: f64,
    mean: f64, // Mean of the scaled values
    m2: f64,   // Sum of squared differences from mean, scaled
}

impl StreamingStats {
    /// Create an empty accumulator.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub(crate) fn add(&mut self, value: f64) {
        let target = power_of_two_floor(value.abs());
        if target > self.scale {
            let ratio = self.scale / target;
            self.mean *= ratio;
            self.m2 *= ratio * ratio;
            self.scale = target;
        }

        let x = value / self.scale;
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub(crate) fn mean(&self) -> f64 {
        self.mean * self.scale
    }

    /// Population standard deviation (denominator = count).
    pub(crate) fn std(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt() * self.scale
        }
    }

    /// Summarize the accumulated values, or `None` if nothing was added.
    pub(crate) fn moments(&self) -> Option<Moments> {
        (self.count > 0).then(|| Moments {
            count: self.count,
            mean: self.mean(),
            std: self.std(),
        })
    }
}

/// Largest power of two not above `magnitude`, never below the smallest normal.
fn power_of_two_floor(magnitude: f64) -> f64 {
    const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
    f64::from_bits(magnitude.to_bits() & EXPONENT_MASK).max(f64::MIN_POSITIVE)
}

impl FromIterator<f64> for StreamingStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = StreamingStats::new();
        for value in iter {
            stats.add(value);
        }
        stats
    }
}

/// Mean and population standard deviation of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (ddof = 0).
    pub std: f64,
}

impl Moments {
    /// Standardize a value; a zero-variance column maps every value to 0.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            return 0.0;
        }
        let diff = value - self.mean;
        if diff.is_finite() {
            diff / self.std
        } else {
            (value / 2.0 - self.mean / 2.0) / self.std * 2.0
        }
    }
}

// =============================================================================
// ORDER STATISTICS
// =============================================================================

/// Exact median; the mean of the two middle values for an even count.
pub(crate) fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent label. Ties go to the lexicographically smallest label.
pub(crate) fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(value, _)| value)
}
