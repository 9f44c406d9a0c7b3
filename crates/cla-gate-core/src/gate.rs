//! The CLA gate: extraction -> aggregation -> reconciliation for one PR.
//!
//! Each call to [`ClaGate::evaluate`] re-derives the verdict from the PR's
//! current commits and labels; nothing is persisted between evaluations.
//! Overlapping evaluations of the same PR are tolerated, correctness rests on
//! the platform's idempotent label and comment mutations.

use std::sync::Arc;

use tracing::{info, warn, Instrument};

use crate::aggregation::aggregate;
use crate::config::{GateConfig, RepoPolicy};
use crate::contributors::extract_contributors;
use crate::domain::{PullRequestRef, Verdict};
use crate::error::{GateError, Result};
use crate::metrics::METRICS;
use crate::obs::{self, EvaluationSpan};
use crate::platform::{Platform, SignatureChecker};
use crate::reconcile::{ReconcileOutcome, Reconciler};

/// Terminal state of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// Commits could not be fetched; the retry prompt was posted.
    CommitsUnavailable,
    /// The PR has no commits; the "no commits" comment was posted.
    NoCommits,
    /// Some identity is unknown; the retry prompt was posted, no labels touched.
    Pending(Vec<String>),
    /// Labels could not be fetched; the retry prompt was posted.
    LabelsUnavailable,
    Passed(ReconcileOutcome),
    Failed(ReconcileOutcome),
}

/// Result of a `/cla cancel` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The commenter lacks write permission.
    NotPermitted,
    PermissionCheckFailed,
    LabelsUnavailable,
    /// The signed label was not on the PR; nothing changed.
    LabelAbsent,
    Removed,
    /// Removal failed; the failure comment was posted.
    RemoveFailed,
}

/// Runs CLA evaluations against a platform and a signature service.
pub struct ClaGate<P: ?Sized, S: ?Sized> {
    platform: Arc<P>,
    checker: Arc<S>,
    config: Arc<GateConfig>,
}

impl<P, S> ClaGate<P, S>
where
    P: Platform + ?Sized,
    S: SignatureChecker + ?Sized,
{
    pub fn new(platform: Arc<P>, checker: Arc<S>, config: Arc<GateConfig>) -> Self {
        Self {
            platform,
            checker,
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The policy that applies to `org/repo`.
    pub fn policy_for(&self, org: &str, repo: &str) -> Result<&RepoPolicy> {
        self.config
            .policy_for(org, repo)
            .ok_or_else(|| GateError::NoPolicy {
                org: org.to_string(),
                repo: repo.to_string(),
            })
    }

    /// Evaluate the PR and reconcile its labels and comments.
    pub async fn evaluate(&self, pr: &PullRequestRef, policy: &RepoPolicy) -> EvaluationOutcome {
        let span = EvaluationSpan::new(pr);
        self.evaluate_in_span(pr, policy).instrument(span.span()).await
    }

    async fn evaluate_in_span(
        &self,
        pr: &PullRequestRef,
        policy: &RepoPolicy,
    ) -> EvaluationOutcome {
        METRICS.inc_evaluations();
        let templates = &self.config.templates;

        let commits = match self.platform.pull_request_commits(pr).await {
            Ok(commits) => commits,
            Err(e) => {
                warn!(error = %e, "fetching commits failed");
                self.post(pr, &templates.comment_command_trigger).await;
                return EvaluationOutcome::CommitsUnavailable;
            }
        };

        let identities = extract_contributors(&commits, policy);
        if identities.is_empty() {
            self.post(pr, &templates.comment_pr_no_commits).await;
            return EvaluationOutcome::NoCommits;
        }

        let report = match aggregate(&identities, policy, self.checker.as_ref()).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "aggregation rejected the contributor list");
                self.post(pr, &templates.comment_pr_no_commits).await;
                return EvaluationOutcome::NoCommits;
            }
        };

        let verdict = report.verdict();
        METRICS.record_verdict(&verdict);
        obs::emit_verdict(pr, &verdict, report.total());

        if let Verdict::Pending(unknown) = &verdict {
            self.post(pr, &templates.comment_command_trigger).await;
            return EvaluationOutcome::Pending(unknown.clone());
        }

        let labels = match self.platform.pull_request_labels(pr).await {
            Ok(labels) => labels,
            Err(e) => {
                warn!(error = %e, "fetching labels failed");
                self.post(pr, &templates.comment_command_trigger).await;
                return EvaluationOutcome::LabelsUnavailable;
            }
        };

        let reconciler = Reconciler::new(self.platform.as_ref(), pr, policy, templates);
        let outcome = reconciler.apply(&verdict, &labels).await;
        match verdict {
            Verdict::Fail(_) => EvaluationOutcome::Failed(outcome),
            _ => EvaluationOutcome::Passed(outcome),
        }
    }

    /// Withdraw the signed label on request of `commenter`.
    ///
    /// Only commenters with write permission may cancel. The signed label is
    /// removed when present; the unsigned label is never touched.
    pub async fn cancel(
        &self,
        pr: &PullRequestRef,
        policy: &RepoPolicy,
        commenter: &str,
    ) -> CancelOutcome {
        match self.platform.has_write_permission(pr, commenter).await {
            Ok(true) => {}
            Ok(false) => {
                info!(pr = %pr, commenter = %commenter, "cla cancel ignored, no write permission");
                return CancelOutcome::NotPermitted;
            }
            Err(e) => {
                warn!(pr = %pr, commenter = %commenter, error = %e, "permission check failed");
                return CancelOutcome::PermissionCheckFailed;
            }
        }

        let labels = match self.platform.pull_request_labels(pr).await {
            Ok(labels) => labels,
            Err(e) => {
                warn!(pr = %pr, error = %e, "fetching labels failed");
                return CancelOutcome::LabelsUnavailable;
            }
        };
        if !labels.iter().any(|l| *l == policy.cla_label_yes) {
            return CancelOutcome::LabelAbsent;
        }

        match self
            .platform
            .remove_labels(pr, &[policy.cla_label_yes.clone()])
            .await
        {
            Ok(()) => {
                info!(pr = %pr, commenter = %commenter, label = %policy.cla_label_yes, "cla label cancelled");
                CancelOutcome::Removed
            }
            Err(e) => {
                obs::emit_label_update_failed(pr, &policy.cla_label_yes, "remove", &e);
                METRICS.inc_label_update_failures();
                self.post(pr, &self.config.templates.comment_update_label_failed)
                    .await;
                CancelOutcome::RemoveFailed
            }
        }
    }

    async fn post(&self, pr: &PullRequestRef, body: &str) {
        if let Err(e) = self.platform.create_comment(pr, body).await {
            warn!(pr = %pr, error = %e, "posting comment failed");
        }
    }
}
