//! macrobench-compare: before/after comparison of macro-benchmark results.
//!
//! This library wires the statistical core to the command line: result-file
//! loading, configuration, and terminal reporting.

pub mod cli;
pub mod config;
pub mod input;
pub mod report;

// Re-export core types for convenience
pub use macrobench_compare_core::{
    compare_samples, extract_runs, has_sufficient_iterations, AnalysisError, AnalysisOptions,
    ComparisonReport, DescriptiveStats, ExtractError, Metric, MetricComparison, NormalityResult,
    PooledZTest, Sample, ShapiroWilk, Side, StatsError, Warning, DEFAULT_MIN_ITERATIONS,
};

// Re-export main types from this crate
pub use cli::{Cli, Command};
pub use config::Config;
pub use input::{load_document, InputError};
pub use report::{ReportError, Reporter, TerminalReporter};
