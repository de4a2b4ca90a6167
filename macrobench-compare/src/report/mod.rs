use macrobench_compare_core::{Metric, MetricComparison};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Reporter: Send + Sync {
    fn report(&self, metric: Metric, comparison: &MetricComparison) -> Result<(), ReportError>;
}

mod terminal;
pub use terminal::TerminalReporter;
