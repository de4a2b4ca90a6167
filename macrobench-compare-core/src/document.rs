//! Benchmark document model and metric extraction.
//!
//! Result files produced by the macro-benchmark harness are JSON documents
//! shaped as `{ "benchmarks": [ { "metrics": { <key>: { "runs": [..] } } } ] }`.
//! The extractor reads the run values for one of the supported metrics out of
//! an already-parsed document; reading the file and parsing the JSON is the
//! caller's job.

use serde_json::Value;
use thiserror::Error;

use crate::sample::Sample;

/// Errors produced by metric extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A required key was absent or had the wrong shape.
    #[error("Malformed benchmark data: missing or invalid `{path}`")]
    MalformedBenchmarkData { path: String },
}

/// The metrics supported by the comparison tool.
///
/// Each variant maps to the key the macro-benchmark harness uses in its
/// result JSON. Keeping this a closed set documents the supported metrics
/// and rules out free-form key typos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Cold startup time to initial display, in milliseconds.
    TimeToInitialDisplay,
    /// Average time spent tracking a gesture, in milliseconds.
    TrackGestureAverage,
    /// Maximum heap size observed while tracking a gesture, in kilobytes.
    TrackGestureHeapMax,
    /// Average time to generate an SVG attachment, in milliseconds.
    GenerateSvgAverage,
}

impl Metric {
    /// The metric's key in the benchmark result JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::TimeToInitialDisplay => "timeToInitialDisplayMs",
            Metric::TrackGestureAverage => "msrTrackGestureMsAverage",
            Metric::TrackGestureHeapMax => "memoryHeapSizeMaxKb",
            Metric::GenerateSvgAverage => "msrGenerateSvgMsAverage",
        }
    }

    /// All supported metrics.
    pub fn all() -> [Metric; 4] {
        [
            Metric::TimeToInitialDisplay,
            Metric::TrackGestureAverage,
            Metric::TrackGestureHeapMax,
            Metric::GenerateSvgAverage,
        ]
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Extract the ordered run values for `metric` from a parsed result document.
///
/// Reads `benchmarks[0].metrics.<key>.runs`. The document is only read,
/// never mutated.
///
/// # Errors
///
/// Returns [`ExtractError::MalformedBenchmarkData`] naming the offending
/// path if any step of the key path is absent or of the wrong shape, or if
/// `runs` contains a non-numeric element.
pub fn extract_runs(document: &Value, metric: Metric) -> Result<Sample, ExtractError> {
    let malformed = |path: String| ExtractError::MalformedBenchmarkData { path };

    let benchmarks = document
        .get("benchmarks")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("benchmarks".to_string()))?;
    let first = benchmarks
        .first()
        .ok_or_else(|| malformed("benchmarks[0]".to_string()))?;
    let metrics = first
        .get("metrics")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("benchmarks[0].metrics".to_string()))?;
    let entry = metrics
        .get(metric.key())
        .ok_or_else(|| malformed(format!("benchmarks[0].metrics.{}", metric.key())))?;
    let runs = entry
        .get("runs")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(format!("benchmarks[0].metrics.{}.runs", metric.key())))?;

    let mut values = Vec::with_capacity(runs.len());
    for (index, run) in runs.iter().enumerate() {
        let value = run.as_f64().ok_or_else(|| {
            malformed(format!(
                "benchmarks[0].metrics.{}.runs[{}]",
                metric.key(),
                index
            ))
        })?;
        values.push(value);
    }

    Ok(Sample::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document_with_runs(key: &str, runs: Value) -> Value {
        json!({
            "benchmarks": [
                {
                    "name": "sh.measure.android.benchmark",
                    "metrics": {
                        (key): { "runs": runs }
                    }
                }
            ]
        })
    }

    #[test]
    fn test_extract_startup_runs() {
        let document = document_with_runs("timeToInitialDisplayMs", json!([312.5, 298.1, 305.0]));
        let sample = extract_runs(&document, Metric::TimeToInitialDisplay).unwrap();
        assert_eq!(sample.values(), &[312.5, 298.1, 305.0]);
    }

    #[test]
    fn test_extraction_preserves_order() {
        let document = document_with_runs("msrTrackGestureMsAverage", json!([3.0, 1.0, 2.0]));
        let sample = extract_runs(&document, Metric::TrackGestureAverage).unwrap();
        assert_eq!(sample.values(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_extraction_accepts_integer_runs() {
        let document = document_with_runs("memoryHeapSizeMaxKb", json!([4096, 4100, 4098]));
        let sample = extract_runs(&document, Metric::TrackGestureHeapMax).unwrap();
        assert_eq!(sample.values(), &[4096.0, 4100.0, 4098.0]);
    }

    #[test]
    fn test_extraction_does_not_mutate_document() {
        let document = document_with_runs("msrGenerateSvgMsAverage", json!([10.0, 11.0, 12.0]));
        let snapshot = document.clone();
        let _ = extract_runs(&document, Metric::GenerateSvgAverage).unwrap();
        assert_eq!(document, snapshot);
    }

    #[test]
    fn test_missing_benchmarks_key() {
        let document = json!({ "metrics": {} });
        let err = extract_runs(&document, Metric::TimeToInitialDisplay).unwrap_err();
        assert!(err.to_string().contains("`benchmarks`"));
    }

    #[test]
    fn test_empty_benchmarks_array() {
        let document = json!({ "benchmarks": [] });
        let err = extract_runs(&document, Metric::TimeToInitialDisplay).unwrap_err();
        assert!(err.to_string().contains("benchmarks[0]"));
    }

    #[test]
    fn test_missing_metric_key() {
        let document = document_with_runs("timeToInitialDisplayMs", json!([1.0]));
        let err = extract_runs(&document, Metric::GenerateSvgAverage).unwrap_err();
        assert!(err
            .to_string()
            .contains("benchmarks[0].metrics.msrGenerateSvgMsAverage"));
    }

    #[test]
    fn test_runs_not_an_array() {
        let document = document_with_runs("timeToInitialDisplayMs", json!("not runs"));
        let err = extract_runs(&document, Metric::TimeToInitialDisplay).unwrap_err();
        assert!(err
            .to_string()
            .contains("benchmarks[0].metrics.timeToInitialDisplayMs.runs"));
    }

    #[test]
    fn test_non_numeric_run_value() {
        let document = document_with_runs("timeToInitialDisplayMs", json!([1.0, "two", 3.0]));
        let err = extract_runs(&document, Metric::TimeToInitialDisplay).unwrap_err();
        assert!(err.to_string().contains("runs[1]"));
    }

    #[test]
    fn test_metric_keys_are_distinct() {
        let keys: std::collections::HashSet<&str> =
            Metric::all().iter().map(Metric::key).collect();
        assert_eq!(keys.len(), 4);
    }
}
