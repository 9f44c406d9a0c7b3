//! Structured observability hooks for CLA evaluations.
//!
//! This module provides:
//! - Evaluation-scoped tracing spans via `EvaluationSpan`
//! - Emission functions for the key lifecycle events: evaluation start,
//!   verdict, label update failure, dropped event
//!
//! Events are emitted at `info!` level unless noted (filter with `CLA_GATE_LOG`).

use tracing::{info, warn};

use crate::domain::{PullRequestRef, Verdict};

/// Span covering one evaluation.
///
/// Every evaluation gets a fresh `evaluation_id` so overlapping evaluations
/// of the same PR can be told apart in the logs. The span is attached to the
/// evaluation future with `Instrument`, not entered, so it stays correct
/// across `.await` points.
///
/// # Example
///
/// ```ignore
/// let span = EvaluationSpan::new(&pr);
/// evaluate(&pr).instrument(span.span()).await;
/// ```
pub struct EvaluationSpan {
    evaluation_id: String,
    span: tracing::Span,
}

impl EvaluationSpan {
    pub fn new(pr: &PullRequestRef) -> Self {
        let evaluation_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "cla.evaluation",
            evaluation_id = %evaluation_id,
            pr = %pr,
        );
        Self {
            evaluation_id,
            span,
        }
    }

    pub fn evaluation_id(&self) -> &str {
        &self.evaluation_id
    }

    pub fn span(&self) -> tracing::Span {
        self.span.clone()
    }
}

/// Emit event: evaluation started with the trigger that caused it.
pub fn emit_evaluation_started(pr: &PullRequestRef, trigger: &str) {
    info!(event = "evaluation.started", pr = %pr, trigger = %trigger);
}

/// Emit event: verdict derived for a PR.
pub fn emit_verdict(pr: &PullRequestRef, verdict: &Verdict, contributors: usize) {
    info!(
        event = "evaluation.verdict",
        pr = %pr,
        verdict = verdict.label(),
        contributors = contributors,
        names = ?verdict.names(),
    );
}

/// Emit event: a label add/remove failed (warning level).
pub fn emit_label_update_failed(
    pr: &PullRequestRef,
    label: &str,
    action: &str,
    error: &dyn std::fmt::Display,
) {
    warn!(
        event = "labels.update_failed",
        pr = %pr,
        label = %label,
        action = %action,
        error = %error,
    );
}

/// Emit event: an inbound event was dropped (warning level).
pub fn emit_event_dropped(org: &str, repo: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "event.dropped", org = %org, repo = %repo, reason = %reason);
}
