//! Thin adapters from inbound webhook events to [`ClaGate`] calls.
//!
//! The host framework owns ingestion and dispatch; it deserializes its
//! payloads into [`PullRequestEvent`] / [`CommentEvent`] and hands them to
//! [`handle_pull_request_event`] / [`handle_comment_event`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let gate = ClaGate::new(platform, checker, config);
//! let event: PullRequestEvent = serde_json::from_slice(&body)?;
//! handle_pull_request_event(&gate, &event).await;
//! ```

use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use crate::command::ClaCommand;
use crate::domain::PullRequestRef;
use crate::gate::{CancelOutcome, ClaGate, EvaluationOutcome};
use crate::metrics::METRICS;
use crate::obs;
use crate::platform::{Platform, SignatureChecker};

/// Platforms send PR numbers as integers or strings.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// A pull request lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestEvent {
    pub org: String,
    pub repo: String,
    #[serde(deserialize_with = "number_or_string")]
    pub number: String,
    /// PR state, e.g. `opened`, `merged`, `closed`.
    pub state: String,
    /// What happened, e.g. `open`, `update`, `close`.
    pub action: String,
}

impl PullRequestEvent {
    pub fn pull_request(&self) -> PullRequestRef {
        PullRequestRef::new(&self.org, &self.repo, &self.number)
    }

    /// Only a freshly opened PR or a source update of an open PR is evaluated.
    pub fn triggers_evaluation(&self) -> bool {
        self.state == "opened" && matches!(self.action.as_str(), "open" | "update")
    }
}

/// A comment posted on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentEvent {
    pub org: String,
    pub repo: String,
    #[serde(deserialize_with = "number_or_string")]
    pub number: String,
    pub comment: String,
    /// Login of the comment author.
    pub commenter: String,
}

impl CommentEvent {
    pub fn pull_request(&self) -> PullRequestRef {
        PullRequestRef::new(&self.org, &self.repo, &self.number)
    }
}

/// What an adapter did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No policy applies to the repository.
    Dropped,
    /// The event is not a trigger.
    Ignored,
    Evaluated(EvaluationOutcome),
    Cancelled(CancelOutcome),
}

#[instrument(skip(gate, event), fields(org = %event.org, repo = %event.repo, number = %event.number))]
pub async fn handle_pull_request_event<P, S>(
    gate: &ClaGate<P, S>,
    event: &PullRequestEvent,
) -> EventOutcome
where
    P: Platform + ?Sized,
    S: SignatureChecker + ?Sized,
{
    let policy = match gate.policy_for(&event.org, &event.repo) {
        Ok(policy) => policy,
        Err(e) => {
            obs::emit_event_dropped(&event.org, &event.repo, &e);
            METRICS.inc_events_dropped();
            return EventOutcome::Dropped;
        }
    };

    if !event.triggers_evaluation() {
        debug!(state = %event.state, action = %event.action, "pull request event ignored");
        return EventOutcome::Ignored;
    }

    let pr = event.pull_request();
    obs::emit_evaluation_started(&pr, &format!("pull_request.{}", event.action));
    EventOutcome::Evaluated(gate.evaluate(&pr, policy).await)
}

#[instrument(skip(gate, event), fields(org = %event.org, repo = %event.repo, number = %event.number))]
pub async fn handle_comment_event<P, S>(gate: &ClaGate<P, S>, event: &CommentEvent) -> EventOutcome
where
    P: Platform + ?Sized,
    S: SignatureChecker + ?Sized,
{
    let policy = match gate.policy_for(&event.org, &event.repo) {
        Ok(policy) => policy,
        Err(e) => {
            obs::emit_event_dropped(&event.org, &event.repo, &e);
            METRICS.inc_events_dropped();
            return EventOutcome::Dropped;
        }
    };

    let pr = event.pull_request();
    match ClaCommand::parse(&event.comment) {
        Some(ClaCommand::CheckCla) => {
            obs::emit_evaluation_started(&pr, "comment.check_cla");
            EventOutcome::Evaluated(gate.evaluate(&pr, policy).await)
        }
        Some(ClaCommand::CancelCla) => {
            EventOutcome::Cancelled(gate.cancel(&pr, policy, &event.commenter).await)
        }
        None => EventOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_event(state: &str, action: &str) -> PullRequestEvent {
        PullRequestEvent {
            org: "openeuler".to_string(),
            repo: "kernel".to_string(),
            number: "1".to_string(),
            state: state.to_string(),
            action: action.to_string(),
        }
    }

    #[test]
    fn only_open_and_update_of_opened_prs_trigger() {
        assert!(pr_event("opened", "open").triggers_evaluation());
        assert!(pr_event("opened", "update").triggers_evaluation());
        assert!(!pr_event("opened", "close").triggers_evaluation());
        assert!(!pr_event("merged", "update").triggers_evaluation());
        assert!(!pr_event("closed", "open").triggers_evaluation());
    }

    #[test]
    fn number_accepts_integer_and_string() {
        let from_int: PullRequestEvent = serde_json::from_str(
            r#"{"org":"o","repo":"r","number":42,"state":"opened","action":"open"}"#,
        )
        .unwrap();
        let from_str: PullRequestEvent = serde_json::from_str(
            r#"{"org":"o","repo":"r","number":"42","state":"opened","action":"open"}"#,
        )
        .unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int.pull_request().to_string(), "o/r#42");
    }
}
