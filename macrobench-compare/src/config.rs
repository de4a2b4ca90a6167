//! Configuration loading for macrobench-compare.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings. The thresholds the reference tooling hard-coded are
//! all explicit configuration here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use macrobench_compare_core::{AnalysisOptions, DEFAULT_MIN_ITERATIONS};

/// Top-level configuration for macrobench-compare.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the statistical analysis.
    pub analysis: AnalysisConfig,
    /// Settings for report output.
    pub report: ReportConfig,
}

/// Configuration for the statistical analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Confidence level for the comparison intervals.
    pub confidence_level: f64,
    /// Minimum number of iterations required per run.
    pub min_iterations: usize,
    /// Significance threshold for the normality pre-check.
    pub normality_alpha: f64,
    /// Coefficient-of-variation level above which a warning is reported.
    pub cv_warning_threshold: f64,
    /// Use the corrected two-sided CV-ratio heuristic.
    pub symmetric_cv_ratio_check: bool,
}

/// Configuration for report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Whether to use colors in terminal output.
    pub colors: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            min_iterations: DEFAULT_MIN_ITERATIONS,
            normality_alpha: 0.05,
            cv_warning_threshold: 0.06,
            symmetric_cv_ratio_check: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { colors: true }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".macrobench-compare.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path`, or use defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// The analysis options this configuration selects.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            min_iterations: self.analysis.min_iterations,
            confidence_level: self.analysis.confidence_level,
            normality_alpha: self.analysis.normality_alpha,
            cv_warning_threshold: self.analysis.cv_warning_threshold,
            symmetric_cv_ratio_check: self.analysis.symmetric_cv_ratio_check,
        }
    }
}
