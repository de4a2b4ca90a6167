//! Core statistics for comparing macro-benchmark runs.
//!
//! This crate implements the pure computation layer behind the
//! macrobench-compare CLI: metric extraction from parsed benchmark result
//! documents, descriptive statistics, the Shapiro-Wilk normality check, and
//! the pooled two-sample confidence-interval comparison. It performs no I/O
//! and never terminates the process.

pub mod analyze;
pub mod document;
pub mod sample;
pub mod stats;

// Re-export main types for convenience
pub use analyze::{compare_samples, AnalysisError, AnalysisOptions, MetricComparison};
pub use document::{extract_runs, ExtractError, Metric};
pub use sample::{has_sufficient_iterations, Sample, DEFAULT_MIN_ITERATIONS};
pub use stats::{
    describe, round3, ComparisonReport, DescriptiveStats, NormalityResult, PooledZTest,
    ShapiroWilk, Side, StatsError, Warning,
};
