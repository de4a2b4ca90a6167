//! Command-line interface for macrobench-compare.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use macrobench_compare_core::Metric;

use crate::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(name = "macrobench-compare")]
#[command(about = "Statistical before/after comparison of macro-benchmark results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Confidence level for the comparison intervals (0.0-1.0)
    #[arg(long, global = true)]
    pub confidence_level: Option<f64>,

    /// Minimum number of iterations required per run
    #[arg(long, global = true)]
    pub min_iterations: Option<usize>,

    /// Flag CV ratios outside [0.5, 2] instead of the legacy one-sided check
    #[arg(long, global = true)]
    pub symmetric_variance_check: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// One subcommand per supported metric; each compares a before and an
/// after result file.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare time-to-initial-display startup timings
    CompareStartup { before: PathBuf, after: PathBuf },
    /// Compare average gesture tracking times
    CompareTrackGesture { before: PathBuf, after: PathBuf },
    /// Compare maximum heap size while tracking a view click gesture
    CompareViewClickHeap { before: PathBuf, after: PathBuf },
    /// Compare average SVG generation times
    CompareGenerateSvg { before: PathBuf, after: PathBuf },
}

impl Command {
    /// The metric this subcommand extracts.
    pub fn metric(&self) -> Metric {
        match self {
            Command::CompareStartup { .. } => Metric::TimeToInitialDisplay,
            Command::CompareTrackGesture { .. } => Metric::TrackGestureAverage,
            Command::CompareViewClickHeap { .. } => Metric::TrackGestureHeapMax,
            Command::CompareGenerateSvg { .. } => Metric::GenerateSvgAverage,
        }
    }

    /// The before and after result file paths.
    pub fn paths(&self) -> (&Path, &Path) {
        match self {
            Command::CompareStartup { before, after }
            | Command::CompareTrackGesture { before, after }
            | Command::CompareViewClickHeap { before, after }
            | Command::CompareGenerateSvg { before, after } => (before, after),
        }
    }
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(confidence_level) = self.confidence_level {
            config.analysis.confidence_level = confidence_level;
        }

        if let Some(min_iterations) = self.min_iterations {
            config.analysis.min_iterations = min_iterations;
        }

        if self.symmetric_variance_check {
            config.analysis.symmetric_cv_ratio_check = true;
        }

        if self.no_color {
            config.report.colors = false;
        }
    }
}
