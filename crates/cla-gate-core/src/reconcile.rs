//! Label and comment reconciliation.
//!
//! Given a verdict, brings the PR's CLA labels in line with it and posts
//! exactly one outcome comment. Stale guidance comments (bodies carrying the
//! guide or pass marker) are deleted before the new outcome comment is
//! posted, so the fresh comment survives the cleanup.
//!
//! Label mutations rely on the platform being idempotent; nothing here
//! locks or retries.

use tracing::{debug, warn};

use crate::config::{CommentTemplates, RepoPolicy, NEED_SIGN_SLOT};
use crate::domain::{PullRequestRef, Verdict};
use crate::metrics::METRICS;
use crate::obs;
use crate::platform::Platform;

/// What a reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing to reconcile (pending verdict or empty unsigned list).
    Skipped,
    /// The wanted label was applied and the outcome comment posted.
    Applied { comment: String },
    /// Adding the wanted label failed; the failure comment was posted.
    LabelUpdateFailed,
}

/// Render `names` through `user_mark_format`, joined with `", "`.
pub fn render_names(templates: &CommentTemplates, names: &[String]) -> String {
    names
        .iter()
        .map(|name| {
            templates
                .user_mark_format
                .replace(&templates.placeholder_committer, name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The "all signed" comment for `signed`.
pub fn all_signed_comment(templates: &CommentTemplates, signed: &[String]) -> String {
    templates
        .comment_all_signed
        .replace(&templates.placeholder_committer, &render_names(templates, signed))
}

/// The "needs signing" guidance comment for `unsigned`.
///
/// The template's slots take the rendered names, the sign URL and the FAQ
/// URL, in that order.
pub fn need_sign_comment(
    templates: &CommentTemplates,
    policy: &RepoPolicy,
    unsigned: &[String],
) -> String {
    let names = render_names(templates, unsigned);
    fill_slots(
        &templates.comment_some_need_sign,
        &[names.as_str(), policy.sign_url.as_str(), policy.faq_url.as_str()],
    )
}

/// Fill each [`NEED_SIGN_SLOT`] of `template` with the next value, in one
/// pass. Inserted values are never rescanned; surplus slots stay verbatim.
fn fill_slots(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;
    while let Some(at) = rest.find(NEED_SIGN_SLOT) {
        out.push_str(&rest[..at]);
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str(NEED_SIGN_SLOT),
        }
        rest = &rest[at + NEED_SIGN_SLOT.len()..];
    }
    out.push_str(rest);
    out
}

/// Whether `body` is a guidance comment that a new verdict supersedes.
pub fn is_guidance_comment(templates: &CommentTemplates, body: &str) -> bool {
    body.contains(&templates.placeholder_cla_sign_guide_title)
        || body.contains(&templates.placeholder_cla_sign_pass_title)
}

/// Reconciles one pull request against a verdict.
pub struct Reconciler<'a, P: Platform + ?Sized> {
    platform: &'a P,
    pr: &'a PullRequestRef,
    policy: &'a RepoPolicy,
    templates: &'a CommentTemplates,
}

impl<'a, P: Platform + ?Sized> Reconciler<'a, P> {
    pub fn new(
        platform: &'a P,
        pr: &'a PullRequestRef,
        policy: &'a RepoPolicy,
        templates: &'a CommentTemplates,
    ) -> Self {
        Self {
            platform,
            pr,
            policy,
            templates,
        }
    }

    /// Dispatch on the verdict. `Pending` performs no mutation.
    pub async fn apply(&self, verdict: &Verdict, labels: &[String]) -> ReconcileOutcome {
        match verdict {
            Verdict::Pass(signed) => self.pass(signed, labels).await,
            Verdict::Fail(unsigned) => self.fail(unsigned, labels).await,
            Verdict::Pending(_) => ReconcileOutcome::Skipped,
        }
    }

    /// Move the PR to the signed state.
    pub async fn pass(&self, signed: &[String], labels: &[String]) -> ReconcileOutcome {
        let applied = self
            .swap_labels(&self.policy.cla_label_no, &self.policy.cla_label_yes, labels)
            .await;
        if !applied {
            return self.label_update_failed().await;
        }

        let comment = all_signed_comment(self.templates, signed);
        self.remove_guidance_comments().await;
        self.post(&comment).await;
        ReconcileOutcome::Applied { comment }
    }

    /// Move the PR to the unsigned state. No-op when `unsigned` is empty.
    pub async fn fail(&self, unsigned: &[String], labels: &[String]) -> ReconcileOutcome {
        if unsigned.is_empty() {
            debug!(pr = %self.pr, "no unsigned contributors, nothing to reconcile");
            return ReconcileOutcome::Skipped;
        }

        let applied = self
            .swap_labels(&self.policy.cla_label_yes, &self.policy.cla_label_no, labels)
            .await;
        if !applied {
            return self.label_update_failed().await;
        }

        let comment = need_sign_comment(self.templates, self.policy, unsigned);
        self.remove_guidance_comments().await;
        self.post(&comment).await;
        ReconcileOutcome::Applied { comment }
    }

    /// Delete every comment carrying the guide or pass marker. Best-effort:
    /// a listing failure skips cleanup, delete failures are only logged.
    /// Returns how many comments were deleted.
    pub async fn remove_guidance_comments(&self) -> usize {
        let comments = match self.platform.list_comments(self.pr).await {
            Ok(comments) => comments,
            Err(e) => {
                warn!(pr = %self.pr, error = %e, "listing comments failed, skipping cleanup");
                return 0;
            }
        };

        let mut deleted = 0;
        for comment in comments
            .iter()
            .filter(|c| is_guidance_comment(self.templates, &c.body))
        {
            match self.platform.delete_comment(self.pr, &comment.id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!(pr = %self.pr, comment_id = %comment.id, error = %e, "deleting guidance comment failed")
                }
            }
        }
        deleted
    }

    /// Remove `stale` if the PR carries it, then add `wanted`.
    ///
    /// A failed removal posts the failure comment but does not stop the add.
    /// Returns whether `wanted` was applied.
    async fn swap_labels(&self, stale: &str, wanted: &str, labels: &[String]) -> bool {
        if labels.iter().any(|l| l == stale) {
            if let Err(e) = self
                .platform
                .remove_labels(self.pr, &[stale.to_string()])
                .await
            {
                obs::emit_label_update_failed(self.pr, stale, "remove", &e);
                METRICS.inc_label_update_failures();
                self.post(&self.templates.comment_update_label_failed).await;
            }
        }

        match self
            .platform
            .add_labels(self.pr, &[wanted.to_string()])
            .await
        {
            Ok(()) => true,
            Err(e) => {
                obs::emit_label_update_failed(self.pr, wanted, "add", &e);
                METRICS.inc_label_update_failures();
                false
            }
        }
    }

    async fn label_update_failed(&self) -> ReconcileOutcome {
        self.post(&self.templates.comment_update_label_failed).await;
        ReconcileOutcome::LabelUpdateFailed
    }

    async fn post(&self, body: &str) {
        if let Err(e) = self.platform.create_comment(self.pr, body).await {
            warn!(pr = %self.pr, error = %e, "posting comment failed");
        }
    }
}
