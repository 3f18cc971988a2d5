/*!
 * Structured Tracing
 * Subscriber setup and timed spans using the tracing crate
 *
 * Features:
 * - JSON-formatted logs for structured parsing
 * - Span timing for allocation bursts
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Bursts slower than this are reported at warn level
const SLOW_WORKLOAD: Duration = Duration::from_millis(100);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - ARENA_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Timed span around a batch of arena operations
pub struct WorkloadSpan {
    span: tracing::Span,
    start: Instant,
    name: String,
    operations: usize,
}

impl WorkloadSpan {
    pub fn new(name: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "workload",
            workload = name,
            operations = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            name: name.to_string(),
            operations: 0,
        }
    }

    /// Count operations performed inside the span
    pub fn record_operations(&mut self, count: usize) {
        self.operations += count;
        self.span.record("operations", self.operations);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for WorkloadSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration > SLOW_WORKLOAD {
            warn!(
                workload = %self.name,
                operations = self.operations,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow workload"
            );
        } else {
            debug!(
                workload = %self.name,
                operations = self.operations,
                duration_us = duration.as_micros() as u64,
                "workload completed"
            );
        }
    }
}

/// Open a timed workload span
pub fn span_workload(name: &str) -> WorkloadSpan {
    WorkloadSpan::new(name)
}
