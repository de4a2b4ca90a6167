//! Shapiro-Wilk test for departure from normality.
//!
//! Implements the AS R94 approximation (Royston, 1995): normal order
//! statistic weights with polynomial-corrected extremes, the W statistic,
//! and a three-regime p-value normalization. Valid for sample sizes from 3
//! up to a few thousand observations.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use super::StatsError;
use crate::sample::Sample;

/// Result of a normality check on one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalityResult {
    /// The Shapiro-Wilk W statistic.
    pub statistic: f64,
    /// Probability of observing a W at least this small under normality.
    pub p_value: f64,
    /// Whether the sample is classified normal, i.e. the p-value exceeds
    /// the significance threshold.
    pub is_normal: bool,
}

/// Shapiro-Wilk normality test with a configurable significance threshold.
#[derive(Debug, Clone)]
pub struct ShapiroWilk {
    /// Significance threshold; data is classified normal when p > alpha
    /// (default: 0.05).
    pub alpha: f64,
}

impl Default for ShapiroWilk {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl ShapiroWilk {
    /// Create a test with the specified significance threshold.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the range (0, 1).
    pub fn new(alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "alpha must be between 0 and 1 (exclusive)"
        );
        Self { alpha }
    }

    /// Run the test on a sample.
    ///
    /// Zero-variance samples leave the W statistic undefined (0/0); they
    /// are treated as degenerate and reported as trivially normal.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InsufficientSampleSize`] for samples with
    /// fewer than 3 observations.
    pub fn test(&self, sample: &Sample) -> Result<NormalityResult, StatsError> {
        let n = sample.len();
        if n < 3 {
            return Err(StatsError::InsufficientSampleSize {
                required: 3,
                actual: n,
            });
        }

        let mut sorted = sample.values().to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let ssq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        if ssq == 0.0 {
            return Ok(NormalityResult {
                statistic: 1.0,
                p_value: 1.0,
                is_normal: true,
            });
        }

        let weights = Self::weights(n);
        let numerator: f64 = weights.iter().zip(&sorted).map(|(a, x)| a * x).sum();
        let statistic = (numerator * numerator / ssq).min(1.0);
        let p_value = Self::p_value(statistic, n);

        Ok(NormalityResult {
            statistic,
            p_value,
            is_normal: p_value > self.alpha,
        })
    }

    /// Approximate normal-order-statistic weights for a sorted sample of
    /// size `n`. Antisymmetric: the weight for the i-th smallest value is
    /// the negation of the weight for the i-th largest.
    fn weights(n: usize) -> Vec<f64> {
        let normal = Normal::standard();
        let nf = n as f64;

        let m: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
            .collect();
        let msq: f64 = m.iter().map(|v| v * v).sum();

        let mut weights = vec![0.0; n];
        if n == 3 {
            // Exact weights for the smallest supported size.
            weights[0] = -std::f64::consts::FRAC_1_SQRT_2;
            weights[2] = std::f64::consts::FRAC_1_SQRT_2;
            return weights;
        }

        let rsn = 1.0 / nf.sqrt();
        let last = poly(&[-2.706056, 4.434685, -2.071190, -0.147981, 0.221157], rsn)
            + m[n - 1] / msq.sqrt();

        if n > 5 {
            let second = poly(&[-3.582633, 5.682633, -1.752461, -0.293762, 0.042981], rsn)
                + m[n - 2] / msq.sqrt();
            let phi = (msq - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
                / (1.0 - 2.0 * last.powi(2) - 2.0 * second.powi(2));
            let scale = phi.sqrt();

            weights[n - 1] = last;
            weights[n - 2] = second;
            weights[0] = -last;
            weights[1] = -second;
            for i in 2..n - 2 {
                weights[i] = m[i] / scale;
            }
        } else {
            let phi = (msq - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * last.powi(2));
            let scale = phi.sqrt();

            weights[n - 1] = last;
            weights[0] = -last;
            for i in 1..n - 1 {
                weights[i] = m[i] / scale;
            }
        }
        weights
    }

    /// P-value for a W statistic, piecewise by sample size: exact for
    /// n == 3, a -ln(gamma - ln(1-W)) normalization for 4..=11, and a
    /// log-normal approximation of ln(1-W) for n >= 12.
    fn p_value(w: f64, n: usize) -> f64 {
        let normal = Normal::standard();
        if n == 3 {
            let p = (6.0 / std::f64::consts::PI)
                * (w.sqrt().asin() - 0.75f64.sqrt().asin());
            return p.clamp(0.0, 1.0);
        }

        let log1mw = (1.0 - w).ln();
        if n <= 11 {
            let nf = n as f64;
            let gamma = -2.273 + 0.459 * nf;
            let arg = gamma - log1mw;
            if arg <= 0.0 {
                // W is far into the rejection region and the transform's
                // argument has collapsed; the p-value underflows.
                return 0.0;
            }
            let mu = 0.5440 - 0.39978 * nf + 0.025054 * nf.powi(2) - 0.0006714 * nf.powi(3);
            let sigma =
                (1.3822 - 0.77857 * nf + 0.062767 * nf.powi(2) - 0.0020322 * nf.powi(3)).exp();
            let z = (-arg.ln() - mu) / sigma;
            return 1.0 - normal.cdf(z);
        }

        if log1mw.is_infinite() {
            // W numerically equal to 1.
            return 1.0;
        }
        let log_n = (n as f64).ln();
        let mu = -1.5861 - 0.31082 * log_n - 0.083751 * log_n.powi(2) + 0.0038915 * log_n.powi(3);
        let sigma = (-0.4803 - 0.082676 * log_n + 0.0030302 * log_n.powi(2)).exp();
        let z = (log1mw - mu) / sigma;
        1.0 - normal.cdf(z)
    }
}

/// Evaluate `c5*u^5 + c4*u^4 + .. + c1*u` with coefficients given highest
/// power first.
fn poly(coefficients: &[f64], u: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * u + c) * u
}
