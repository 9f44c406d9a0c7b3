//! Global atomic counters for cla-gate observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::Verdict;

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters — no allocations, no locking.
pub struct Metrics {
    evaluations: AtomicU64,
    verdicts_pass: AtomicU64,
    verdicts_fail: AtomicU64,
    verdicts_pending: AtomicU64,
    label_update_failures: AtomicU64,
    events_dropped: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            evaluations: AtomicU64::new(0),
            verdicts_pass: AtomicU64::new(0),
            verdicts_fail: AtomicU64::new(0),
            verdicts_pending: AtomicU64::new(0),
            label_update_failures: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
        }
    }

    pub fn inc_evaluations(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "evaluations", "counter incremented");
    }

    /// Count one derived verdict under its kind.
    pub fn record_verdict(&self, verdict: &Verdict) {
        let counter = match verdict {
            Verdict::Pass(_) => &self.verdicts_pass,
            Verdict::Fail(_) => &self.verdicts_fail,
            Verdict::Pending(_) => &self.verdicts_pending,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "verdicts", verdict = verdict.label(), "counter incremented");
    }

    pub fn inc_label_update_failures(&self) {
        self.label_update_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "label_update_failures", "counter incremented");
    }

    pub fn inc_events_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "events_dropped", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            evaluations = self.evaluations(),
            verdicts_pass = self.verdicts_pass(),
            verdicts_fail = self.verdicts_fail(),
            verdicts_pending = self.verdicts_pending(),
            label_update_failures = self.label_update_failures(),
            events_dropped = self.events_dropped(),
        );
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn verdicts_pass(&self) -> u64 {
        self.verdicts_pass.load(Ordering::Relaxed)
    }

    pub fn verdicts_fail(&self) -> u64 {
        self.verdicts_fail.load(Ordering::Relaxed)
    }

    pub fn verdicts_pending(&self) -> u64 {
        self.verdicts_pending.load(Ordering::Relaxed)
    }

    pub fn label_update_failures(&self) -> u64 {
        self.label_update_failures.load(Ordering::Relaxed)
    }

    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
        self.verdicts_pass.store(0, Ordering::Relaxed);
        self.verdicts_fail.store(0, Ordering::Relaxed);
        self.verdicts_pending.store(0, Ordering::Relaxed);
        self.label_update_failures.store(0, Ordering::Relaxed);
        self.events_dropped.store(0, Ordering::Relaxed);
    }
}
