//! Metrics summary written at the end of a headless run.
//!
//! Reports are exported as pretty JSON so CI can diff pick behavior between
//! revisions.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Run identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601)
    pub timestamp: String,

    /// Overall result
    pub result: TestResult,

    /// Picking metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picking: Option<PickingMetrics>,

    /// Execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Run completed
    Pass,
    /// Run failed
    Fail,
    /// Run was skipped
    Skip,
}

/// Ray picking counters and timings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickingMetrics {
    /// Frames simulated
    pub frames: u64,
    /// Boxes in the picking world at the end of the run
    pub obb_count: usize,
    /// Rays cast into the world
    pub rays_cast: u64,
    /// Rays that hit a bound box
    pub hits: u64,
    /// Rays that hit nothing
    pub misses: u64,
    /// Picks skipped because no ray could be built
    pub skipped: u64,
    /// Times the selected object changed
    pub selection_changes: u64,
    /// Average ray test time (microseconds)
    pub avg_ray_test_us: f64,
    /// Slowest ray test (microseconds)
    pub max_ray_test_us: f64,
}

impl PickingMetrics {
    /// Record the duration of one ray test.
    pub fn record_ray_test(&mut self, micros: f64) {
        let previous = self.rays_cast as f64;
        self.rays_cast += 1;
        self.avg_ray_test_us = (self.avg_ray_test_us * previous + micros) / self.rays_cast as f64;
        self.max_ray_test_us = self.max_ray_test_us.max(micros);
    }

    /// Fraction of cast rays that hit something.
    pub fn hit_rate(&self) -> f64 {
        if self.rays_cast == 0 {
            0.0
        } else {
            self.hits as f64 / self.rays_cast as f64
        }
    }
}

/// Execution metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total run duration (seconds)
    pub duration_seconds: f64,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with a run name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                picking: None,
                test_execution: TestExecutionMetrics {
                    duration_seconds: 0.0,
                },
            },
        }
    }

    /// Set result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set picking metrics
    pub fn picking(mut self, metrics: PickingMetrics) -> Self {
        self.report.picking = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
