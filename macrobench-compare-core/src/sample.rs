use serde::{Deserialize, Serialize};

/// Default minimum number of benchmark iterations required before a
/// comparison is considered meaningful.
pub const DEFAULT_MIN_ITERATIONS: usize = 30;

/// An ordered sequence of measurements extracted from one metric of one
/// benchmark run.
///
/// Samples are immutable once constructed; every statistic downstream works
/// on a read-only view of the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Create a sample from raw measurement values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// The measurement values in extraction order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of measurements in the sample.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sample contains no measurements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Whether `count` iterations satisfy the minimum-iteration policy.
///
/// The threshold is a policy choice, not a mathematical requirement; the
/// caller decides how to react to a `false` result.
pub fn has_sufficient_iterations(count: usize, minimum: usize) -> bool {
    count >= minimum
}
