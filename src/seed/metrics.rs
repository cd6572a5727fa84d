//! Run summary for a seeder run.

use std::time::Duration;
use tracing::info;

/// What a seeder run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Templates handed to the run.
    pub templates_loaded: usize,
    /// Templates whose rules compiled.
    pub templates_compiled: usize,
    /// Templates skipped because their rules failed to compile.
    pub templates_failed: usize,
    /// Payloads delivered to the sink.
    pub payloads_sent: u64,
    /// Cycles skipped because the rendered payload was invalid.
    pub render_failures: u64,
    /// Whether the run stopped early on a shutdown signal.
    pub cancelled: bool,
    /// Total time taken.
    pub total_duration: Duration,
}

impl RunSummary {
    /// Calculate payloads per second.
    pub fn payloads_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.payloads_sent as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Whether every template compiled and every cycle rendered.
    pub fn is_clean(&self) -> bool {
        self.templates_failed == 0 && self.render_failures == 0 && !self.cancelled
    }

    pub fn log(&self) {
        info!(
            "Seeder run {}: {} payloads from {}/{} templates in {:?} ({:.2} payloads/sec)",
            if self.cancelled { "cancelled" } else { "complete" },
            self.payloads_sent,
            self.templates_compiled,
            self.templates_loaded,
            self.total_duration,
            self.payloads_per_second()
        );
        if self.templates_failed > 0 || self.render_failures > 0 {
            info!(
                "Skipped {} template(s) with rule errors and {} invalid payload(s)",
                self.templates_failed, self.render_failures
            );
        }
    }
}
