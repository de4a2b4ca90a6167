use std::io::{self, Write};

use colored::Colorize;
use macrobench_compare_core::{round3, Metric, MetricComparison, Warning};

use super::{ReportError, Reporter};

/// A reporter that renders a metric comparison as terminal tables.
///
/// Output is a Before/After descriptive table and a comparison table,
/// followed by any warnings. All displayed values are rounded to 3 decimal
/// places; the underlying comparison keeps full precision.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
    /// Whether to print normality diagnostics.
    verbose: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self {
            use_colors: false,
            verbose: false,
        }
    }

    /// Enable or disable normality diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Format an already-rounded value for display.
    fn format_value(value: f64) -> String {
        format!("{}", value)
    }

    /// Format an optional value, rendering the undefined sentinel.
    fn format_optional(value: Option<f64>) -> String {
        match value {
            Some(v) => Self::format_value(v),
            None => "undefined".to_string(),
        }
    }

    fn format_interval((lower, upper): (f64, f64)) -> String {
        format!(
            "({}, {})",
            Self::format_value(lower),
            Self::format_value(upper)
        )
    }

    fn format_optional_interval(interval: Option<(f64, f64)>) -> String {
        match interval {
            Some(interval) => Self::format_interval(interval),
            None => "undefined".to_string(),
        }
    }

    /// Print a table with column widths fitted to the widest cell.
    fn print_table(
        writer: &mut impl Write,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> io::Result<()> {
        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let header_row = header
            .iter()
            .zip(widths.iter().copied())
            .map(|(title, width)| format!("{:<width$}", title))
            .collect::<Vec<_>>()
            .join(" | ");

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(header_row.len()))?;
        writeln!(writer, "{}", header_row)?;
        writeln!(writer, "{}", "-".repeat(header_row.len()))?;
        for row in rows {
            let line = row
                .iter()
                .zip(widths.iter().copied())
                .map(|(cell, width)| format!("{:<width$}", cell))
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    fn print_title(&self, writer: &mut impl Write, metric: Metric) -> io::Result<()> {
        let title = format!("Comparison of {}", metric);
        if self.use_colors {
            writeln!(writer, "{}", title.bold())
        } else {
            writeln!(writer, "{}", title)
        }
    }

    fn print_normality(
        &self,
        writer: &mut impl Write,
        comparison: &MetricComparison,
    ) -> io::Result<()> {
        for (label, result) in [
            ("before", &comparison.normality_before),
            ("after", &comparison.normality_after),
        ] {
            writeln!(
                writer,
                "Shapiro-Wilk for {}: W = {:.5}, p = {:.5}",
                label, result.statistic, result.p_value
            )?;
        }
        Ok(())
    }

    fn print_descriptive_table(
        &self,
        writer: &mut impl Write,
        comparison: &MetricComparison,
    ) -> io::Result<()> {
        let before = comparison.before.rounded();
        let after = comparison.after.rounded();

        let rows = vec![
            vec![
                "Mean".to_string(),
                Self::format_value(before.mean),
                Self::format_value(after.mean),
            ],
            vec![
                "Standard Deviation".to_string(),
                Self::format_value(before.std_dev),
                Self::format_value(after.std_dev),
            ],
            vec![
                "Median".to_string(),
                Self::format_value(before.median),
                Self::format_value(after.median),
            ],
            vec![
                "Variance".to_string(),
                Self::format_value(before.variance),
                Self::format_value(after.variance),
            ],
            vec![
                "Coefficient of Variation".to_string(),
                Self::format_optional(before.coefficient_of_variation),
                Self::format_optional(after.coefficient_of_variation),
            ],
        ];

        Self::print_table(writer, &["Metric", "Before", "After"], &rows)
    }

    fn print_comparison_table(
        &self,
        writer: &mut impl Write,
        comparison: &MetricComparison,
    ) -> io::Result<()> {
        let report = comparison.report.rounded();

        let rows = vec![
            vec![
                "Variance Ratio".to_string(),
                Self::format_optional(report.variance_ratio),
            ],
            vec![
                "Confidence Level".to_string(),
                Self::format_value(report.confidence_level),
            ],
            vec![
                "Alpha Level".to_string(),
                Self::format_value(report.alpha_level),
            ],
            vec!["Z Score".to_string(), Self::format_value(report.z_score)],
            vec![
                "Pooled Estimate of Common Standard Deviation".to_string(),
                Self::format_value(report.pooled_std),
            ],
            vec![
                "Standard Error".to_string(),
                Self::format_value(report.standard_error),
            ],
            vec![
                "Error Margin".to_string(),
                Self::format_value(report.margin_of_error),
            ],
            vec![
                "Confidence Interval Range".to_string(),
                Self::format_value(round3(2.0 * comparison.report.margin_of_error)),
            ],
            vec![
                "Mean Difference".to_string(),
                Self::format_value(report.mean_difference),
            ],
            vec![
                "Confidence Interval of Mean Difference".to_string(),
                Self::format_interval(report.ci_mean_difference),
            ],
            vec![
                "Confidence Interval of Mean Percent Change".to_string(),
                Self::format_optional_interval(report.ci_mean_percent_change),
            ],
        ];

        Self::print_table(writer, &["Metric", "Value"], &rows)
    }

    fn print_warnings(&self, writer: &mut impl Write, warnings: &[Warning]) -> io::Result<()> {
        if warnings.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        for warning in warnings {
            let message = match warning {
                Warning::HighCoefficientOfVariation {
                    side,
                    coefficient_of_variation,
                } => format!(
                    "Warning: Coefficient of variation for \"{}\" is high: {}%",
                    side,
                    Self::format_value(round3(coefficient_of_variation * 100.0))
                ),
                Warning::VarianceRatioDoubled { cv_ratio } => format!(
                    "Warning: Variance ratio is more than double: {}%",
                    Self::format_value(round3(cv_ratio * 100.0))
                ),
            };
            if self.use_colors {
                writeln!(writer, "{}", message.yellow())?;
            } else {
                writeln!(writer, "{}", message)?;
            }
        }
        Ok(())
    }

    /// Render the full report into a writer.
    pub fn render(
        &self,
        writer: &mut impl Write,
        metric: Metric,
        comparison: &MetricComparison,
    ) -> io::Result<()> {
        self.print_title(writer, metric)?;
        if self.verbose {
            self.print_normality(writer, comparison)?;
        }
        self.print_descriptive_table(writer, comparison)?;
        self.print_comparison_table(writer, comparison)?;
        self.print_warnings(writer, &comparison.report.warnings)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, metric: Metric, comparison: &MetricComparison) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.render(&mut writer, metric, comparison)?;
        Ok(())
    }
}
