//! End-to-end comparison workflow for one metric.
//!
//! Validates the iteration-count policy, gates on the normality check, and
//! reduces both samples to descriptive statistics before running the
//! two-sample comparison.

use serde::Serialize;
use thiserror::Error;

use crate::sample::{has_sufficient_iterations, Sample, DEFAULT_MIN_ITERATIONS};
use crate::stats::{
    describe, ComparisonReport, DescriptiveStats, NormalityResult, PooledZTest, ShapiroWilk, Side,
    StatsError,
};

/// Errors from the comparison workflow.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A run has fewer iterations than the policy minimum.
    #[error("The {side} run has {actual} iterations; at least {minimum} are required for analysis")]
    InsufficientIterations {
        side: Side,
        actual: usize,
        minimum: usize,
    },

    /// A run failed the normality check, so the z-based comparison does
    /// not apply.
    #[error("The {side} run is not normally distributed (W = {statistic:.5}, p = {p_value:.5})")]
    NonNormalDistribution {
        side: Side,
        statistic: f64,
        p_value: f64,
    },

    /// A statistic could not be computed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Tunables for the comparison workflow.
///
/// Every threshold the reference implementation kept as a module-level
/// constant is an explicit value here.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Minimum iterations required per run before any statistic is computed.
    pub min_iterations: usize,
    /// Confidence level for the comparison intervals.
    pub confidence_level: f64,
    /// Significance threshold for the normality pre-check.
    pub normality_alpha: f64,
    /// Coefficient-of-variation level above which a warning is reported.
    pub cv_warning_threshold: f64,
    /// Use the corrected two-sided CV-ratio heuristic.
    pub symmetric_cv_ratio_check: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_iterations: DEFAULT_MIN_ITERATIONS,
            confidence_level: 0.95,
            normality_alpha: 0.05,
            cv_warning_threshold: 0.06,
            symmetric_cv_ratio_check: false,
        }
    }
}

/// The full result of comparing one metric across two runs.
#[derive(Debug, Clone, Serialize)]
pub struct MetricComparison {
    pub before: DescriptiveStats,
    pub after: DescriptiveStats,
    pub normality_before: NormalityResult,
    pub normality_after: NormalityResult,
    pub report: ComparisonReport,
}

/// Compare a before and an after sample of one metric.
///
/// Statistics are only computed once both samples pass the minimum
/// iteration policy and the normality check; a non-normal sample aborts
/// the comparison rather than merely warning.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientIterations`] when either run falls
/// short of the policy minimum, [`AnalysisError::NonNormalDistribution`]
/// when either run fails the normality check, and propagates
/// [`StatsError`] from the underlying computations.
pub fn compare_samples(
    before: &Sample,
    after: &Sample,
    options: &AnalysisOptions,
) -> Result<MetricComparison, AnalysisError> {
    for (side, sample) in [(Side::Before, before), (Side::After, after)] {
        if !has_sufficient_iterations(sample.len(), options.min_iterations) {
            return Err(AnalysisError::InsufficientIterations {
                side,
                actual: sample.len(),
                minimum: options.min_iterations,
            });
        }
    }

    let normality = ShapiroWilk::new(options.normality_alpha);
    let normality_before = normality.test(before)?;
    let normality_after = normality.test(after)?;
    for (side, result) in [
        (Side::Before, &normality_before),
        (Side::After, &normality_after),
    ] {
        if !result.is_normal {
            return Err(AnalysisError::NonNormalDistribution {
                side,
                statistic: result.statistic,
                p_value: result.p_value,
            });
        }
    }

    let stats_before = describe(before)?;
    let stats_after = describe(after)?;

    let test = PooledZTest {
        confidence_level: options.confidence_level,
        cv_warning_threshold: options.cv_warning_threshold,
        symmetric_cv_ratio_check: options.symmetric_cv_ratio_check,
    };
    let report = test.compare(&stats_before, &stats_after)?;

    Ok(MetricComparison {
        before: stats_before,
        after: stats_after,
        normality_before,
        normality_after,
        report,
    })
}
