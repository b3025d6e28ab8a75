//! Metrics collection for gateway operations.
//!
//! This module records, through the `metrics` crate macros:
//! - Version probe attempts and their outcome
//! - Connection cache hits and misses
//! - Per-operation latency histograms and error counters
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a recorder in the hosting process)
//! - Persistent storage of metrics
//!
//! # Invariants
//! - All metrics use consistent label names: `operation`, `kind`, `major_version`, `outcome`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use std::time::Duration;

use crate::error::ClientError;

/// Metric name for version probe attempts.
pub const METRIC_PROBE_ATTEMPTS: &str = "scope_probe_attempts_total";

/// Metric name for connection cache hits.
pub const METRIC_CACHE_HITS: &str = "scope_connection_cache_hits_total";

/// Metric name for connection cache misses.
pub const METRIC_CACHE_MISSES: &str = "scope_connection_cache_misses_total";

/// Metric name for operation duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "scope_request_duration_seconds";

/// Metric name for operation error counter.
pub const METRIC_REQUEST_ERRORS: &str = "scope_request_errors_total";

/// Outcome label of a single version probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Failure,
}

impl ProbeOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::Failure => "failure",
        }
    }
}

/// Metrics collector for gateway operations.
///
/// A thin wrapper around the `metrics` macros with consistent labels.
///
/// # Example
///
/// ```rust,ignore
/// use scope_client::metrics::MetricsCollector;
///
/// let collector = MetricsCollector::new();
/// collector.record_operation("search", Duration::from_millis(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one version probe against a cluster.
    pub fn record_probe(&self, major_version: u32, outcome: ProbeOutcome) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_PROBE_ATTEMPTS,
            "major_version" => major_version.to_string(),
            "outcome" => outcome.as_str(),
        )
        .increment(1);
    }

    pub fn record_cache_hit(&self) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_CACHE_HITS).increment(1);
    }

    pub fn record_cache_miss(&self) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_CACHE_MISSES).increment(1);
    }

    /// Record how long an operation took, whether it succeeded or not.
    pub fn record_operation(&self, operation: &'static str, duration: Duration) {
        if !self.enabled {
            return;
        }

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "operation" => operation,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a failed operation, labelled by error kind.
    pub fn record_error(&self, operation: &'static str, error: &ClientError) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUEST_ERRORS,
            "operation" => operation,
            "kind" => error.kind().as_str(),
        )
        .increment(1);
    }
}
