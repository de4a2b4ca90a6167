//! Descriptive and inferential statistics over benchmark samples.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sample::Sample;

/// Errors from statistical computations.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Fewer observations than the computation's mathematical minimum.
    #[error("Insufficient sample size: {actual} observations, at least {required} required")]
    InsufficientSampleSize { required: usize, actual: usize },
}

/// Identifies which side of a before/after comparison a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Before,
    After,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Before => f.write_str("before"),
            Side::After => f.write_str("after"),
        }
    }
}

/// Descriptive statistics computed from one sample.
///
/// All fields hold full-precision values; use [`DescriptiveStats::rounded`]
/// for display. The coefficient of variation is `None` when the mean is
/// zero, where the ratio is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected, n-1 divisor).
    pub std_dev: f64,
    /// Middle value; average of the two middle values for even counts.
    pub median: f64,
    /// Number of observations.
    pub count: usize,
    /// Sample variance, the square of `std_dev`.
    pub variance: f64,
    /// std_dev / mean, `None` when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
}

impl DescriptiveStats {
    /// Copy with every value rounded to 3 decimal places, for reporting.
    ///
    /// Downstream computation must keep using the full-precision original;
    /// feeding rounded values back into dependent formulas compounds the
    /// rounding error.
    pub fn rounded(&self) -> DescriptiveStats {
        DescriptiveStats {
            mean: round3(self.mean),
            std_dev: round3(self.std_dev),
            median: round3(self.median),
            count: self.count,
            variance: round3(self.variance),
            coefficient_of_variation: self.coefficient_of_variation.map(round3),
        }
    }
}

/// Round to 3 decimal places. Reporting only.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Compute descriptive statistics for a sample.
///
/// The standard deviation uses Bessel's correction (n-1 divisor), so at
/// least two observations are required.
///
/// # Errors
///
/// Returns [`StatsError::InsufficientSampleSize`] for samples with fewer
/// than 2 observations.
pub fn describe(sample: &Sample) -> Result<DescriptiveStats, StatsError> {
    let n = sample.len();
    if n < 2 {
        return Err(StatsError::InsufficientSampleSize {
            required: 2,
            actual: n,
        });
    }

    let values = sample.values();
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    let median = median_of(values);
    let coefficient_of_variation = if mean == 0.0 {
        None
    } else {
        Some(std_dev / mean)
    };

    Ok(DescriptiveStats {
        mean,
        std_dev,
        median,
        count: n,
        variance,
        coefficient_of_variation,
    })
}

/// Median of the values; sorts a copy, the input slice is untouched.
fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

mod compare;
mod normality;
pub use compare::{ComparisonReport, PooledZTest, Warning};
pub use normality::{NormalityResult, ShapiroWilk};
