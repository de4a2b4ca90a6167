use anyhow::{Context, Result};
use clap::Parser;
use macrobench_compare::{
    compare_samples, extract_runs, load_document, Cli, Config, Reporter, TerminalReporter,
};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default(Path::new(&cli.config))?;
    cli.apply_to_config(&mut config);

    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    let metric = cli.command.metric();
    let (before_path, after_path) = cli.command.paths();

    if cli.verbose {
        eprintln!(
            "Comparing {} between {} and {}",
            metric,
            before_path.display(),
            after_path.display()
        );
    }

    let before_document = load_document(before_path)
        .with_context(|| format!("Failed to load before run from {}", before_path.display()))?;
    let after_document = load_document(after_path)
        .with_context(|| format!("Failed to load after run from {}", after_path.display()))?;

    let before = extract_runs(&before_document, metric)
        .context("Failed to extract metric runs from the before document")?;
    let after = extract_runs(&after_document, metric)
        .context("Failed to extract metric runs from the after document")?;

    if cli.verbose {
        eprintln!(
            "Extracted {} before and {} after iterations",
            before.len(),
            after.len()
        );
    }

    let comparison = compare_samples(&before, &after, &config.analysis_options())
        .context("Comparison failed")?;

    let reporter = if config.report.colors {
        TerminalReporter::new()
    } else {
        TerminalReporter::without_colors()
    }
    .with_verbose(cli.verbose);
    reporter.report(metric, &comparison)?;

    Ok(())
}
