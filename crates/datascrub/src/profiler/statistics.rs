//! Quartile statistics for outlier detection.

use crate::utils::quantile_sorted;
use serde::Serialize;

/// Tukey fence `[Q1 - k*IQR, Q3 + k*IQR]` over a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TukeyFence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl TukeyFence {
    /// Build the fence from unsorted values.
    ///
    /// `None` when there are no values or when a quartile or bound is not
    /// finite (infinities inside an interpolation window). Callers pass
    /// non-null, non-NaN values only.
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lower = q1 - multiplier * iqr;
        let upper = q3 + multiplier * iqr;

        if ![q1, q3, lower, upper].iter().all(|v| v.is_finite()) {
            return None;
        }

        Some(Self {
            q1,
            q3,
            iqr,
            lower,
            upper,
        })
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Number of values strictly outside the fence.
    pub fn count_outside(&self, values: &[f64]) -> usize {
        values.iter().filter(|v| !self.contains(**v)).count()
    }
}

/// Count Tukey outliers in a set of values; 0 when there are none.
pub(crate) fn count_outliers(values: &[f64], multiplier: f64) -> usize {
    TukeyFence::from_values(values, multiplier)
        .map(|fence| fence.count_outside(values))
        .unwrap_or(0)
}
