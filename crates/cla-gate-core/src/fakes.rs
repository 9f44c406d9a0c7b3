//! In-memory fakes for the capability traits (testing only)
//!
//! Provides `MemoryPlatform` and `StaticSignatureChecker` that satisfy the
//! trait contracts without any network access. `MemoryPlatform` models a
//! single pull request and records every call so tests can assert on the
//! exact mutation sequence.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Commit, PrComment, PullRequestRef, SignatureAnswer};
use crate::error::{PlatformError, SignatureError};
use crate::platform::{Platform, PlatformResult, SignatureChecker};

// ---------------------------------------------------------------------------
// MemoryPlatform
// ---------------------------------------------------------------------------

/// Platform operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PullRequestCommits,
    PullRequestLabels,
    AddLabels,
    RemoveLabels,
    ListComments,
    CreateComment,
    DeleteComment,
    HasWritePermission,
}

/// One recorded call against the fake, failed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    PullRequestCommits,
    PullRequestLabels,
    AddLabels(Vec<String>),
    RemoveLabels(Vec<String>),
    ListComments,
    CreateComment(String),
    DeleteComment(String),
    HasWritePermission(String),
}

impl PlatformCall {
    pub fn is_label_mutation(&self) -> bool {
        matches!(self, PlatformCall::AddLabels(_) | PlatformCall::RemoveLabels(_))
    }
}

#[derive(Debug, Default)]
struct PlatformState {
    commits: Vec<Commit>,
    labels: Vec<String>,
    comments: Vec<PrComment>,
    next_comment_id: u64,
    writers: HashSet<String>,
    failing: HashSet<Operation>,
    calls: Vec<PlatformCall>,
}

impl PlatformState {
    fn record(&mut self, call: PlatformCall, op: Operation) -> PlatformResult<()> {
        self.calls.push(call);
        if self.failing.contains(&op) {
            return Err(PlatformError::request(
                &format!("{op:?}"),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn push_comment(&mut self, body: &str) -> String {
        self.next_comment_id += 1;
        let id = self.next_comment_id.to_string();
        self.comments.push(PrComment {
            id: id.clone(),
            body: body.to_string(),
        });
        id
    }
}

/// In-memory platform holding the state of one pull request.
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    state: Mutex<PlatformState>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commits(self, commits: Vec<Commit>) -> Self {
        self.state.lock().unwrap().commits = commits;
        self
    }

    pub fn with_labels(self, labels: &[&str]) -> Self {
        self.state.lock().unwrap().labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Seed an existing comment, e.g. a stale guidance comment.
    pub fn with_comment(self, body: &str) -> Self {
        self.state.lock().unwrap().push_comment(body);
        self
    }

    /// Grant `login` write permission.
    pub fn with_writer(self, login: &str) -> Self {
        self.state.lock().unwrap().writers.insert(login.to_string());
        self
    }

    /// Make every call of `op` fail.
    pub fn failing(self, op: Operation) -> Self {
        self.state.lock().unwrap().failing.insert(op);
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.state.lock().unwrap().labels.clone()
    }

    pub fn comments(&self) -> Vec<PrComment> {
        self.state.lock().unwrap().comments.clone()
    }

    pub fn comment_bodies(&self) -> Vec<String> {
        self.comments().into_iter().map(|c| c.body).collect()
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Bodies of every `create_comment` call, including failed ones.
    pub fn posted_comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlatformCall::CreateComment(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn label_mutations(&self) -> Vec<PlatformCall> {
        self.calls()
            .into_iter()
            .filter(PlatformCall::is_label_mutation)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    async fn pull_request_commits(&self, _pr: &PullRequestRef) -> PlatformResult<Vec<Commit>> {
        let mut state = self.state.lock().unwrap();
        state.record(PlatformCall::PullRequestCommits, Operation::PullRequestCommits)?;
        Ok(state.commits.clone())
    }

    async fn pull_request_labels(&self, _pr: &PullRequestRef) -> PlatformResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.record(PlatformCall::PullRequestLabels, Operation::PullRequestLabels)?;
        Ok(state.labels.clone())
    }

    async fn add_labels(&self, _pr: &PullRequestRef, labels: &[String]) -> PlatformResult<()> {
        let mut state = self.state.lock().unwrap();
        state.record(PlatformCall::AddLabels(labels.to_vec()), Operation::AddLabels)?;
        for label in labels {
            if !state.labels.contains(label) {
                state.labels.push(label.clone());
            }
        }
        Ok(())
    }

    async fn remove_labels(&self, _pr: &PullRequestRef, labels: &[String]) -> PlatformResult<()> {
        let mut state = self.state.lock().unwrap();
        state.record(
            PlatformCall::RemoveLabels(labels.to_vec()),
            Operation::RemoveLabels,
        )?;
        state.labels.retain(|l| !labels.contains(l));
        Ok(())
    }

    async fn list_comments(&self, _pr: &PullRequestRef) -> PlatformResult<Vec<PrComment>> {
        let mut state = self.state.lock().unwrap();
        state.record(PlatformCall::ListComments, Operation::ListComments)?;
        Ok(state.comments.clone())
    }

    async fn create_comment(&self, _pr: &PullRequestRef, body: &str) -> PlatformResult<()> {
        let mut state = self.state.lock().unwrap();
        state.record(
            PlatformCall::CreateComment(body.to_string()),
            Operation::CreateComment,
        )?;
        state.push_comment(body);
        Ok(())
    }

    async fn delete_comment(&self, _pr: &PullRequestRef, comment_id: &str) -> PlatformResult<()> {
        let mut state = self.state.lock().unwrap();
        state.record(
            PlatformCall::DeleteComment(comment_id.to_string()),
            Operation::DeleteComment,
        )?;
        state.comments.retain(|c| c.id != comment_id);
        Ok(())
    }

    async fn has_write_permission(
        &self,
        _pr: &PullRequestRef,
        login: &str,
    ) -> PlatformResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.record(
            PlatformCall::HasWritePermission(login.to_string()),
            Operation::HasWritePermission,
        )?;
        Ok(state.writers.contains(login))
    }
}

// ---------------------------------------------------------------------------
// StaticSignatureChecker
// ---------------------------------------------------------------------------

/// Signature checker answering from a fixed email -> token table.
///
/// Emails without an entry fail with a transport error.
#[derive(Debug, Default)]
pub struct StaticSignatureChecker {
    answers: HashMap<String, String>,
    checked: Mutex<Vec<String>>,
}

impl StaticSignatureChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `token` (`yes`, `no`, or anything else) for `email`.
    pub fn answer(mut self, email: &str, token: &str) -> Self {
        self.answers.insert(email.to_string(), token.to_string());
        self
    }

    /// Emails looked up so far, in call order.
    pub fn checked_emails(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignatureChecker for StaticSignatureChecker {
    async fn check_signature(
        &self,
        _check_url: &str,
        email: &str,
    ) -> Result<SignatureAnswer, SignatureError> {
        self.checked.lock().unwrap().push(email.to_string());
        self.answers
            .get(email)
            .map(|token| SignatureAnswer::from_token(token))
            .ok_or_else(|| SignatureError::Transport(format!("no answer for {email}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr() -> PullRequestRef {
        PullRequestRef::new("org", "repo", "1")
    }

    #[tokio::test]
    async fn label_mutations_are_idempotent() {
        let platform = MemoryPlatform::new().with_labels(&["cla/yes"]);
        platform
            .add_labels(&pr(), &["cla/yes".to_string()])
            .await
            .unwrap();
        platform
            .remove_labels(&pr(), &["cla/no".to_string()])
            .await
            .unwrap();
        assert_eq!(platform.labels(), vec!["cla/yes"]);
        assert_eq!(platform.label_mutations().len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_recorded() {
        let platform = MemoryPlatform::new().failing(Operation::CreateComment);
        assert!(platform.create_comment(&pr(), "hi").await.is_err());
        assert!(platform.comments().is_empty());
        assert_eq!(platform.posted_comments(), vec!["hi"]);
    }

    #[tokio::test]
    async fn static_checker_records_lookups() {
        let checker = StaticSignatureChecker::new().answer("a@x.org", "yes");
        let answer = checker.check_signature("u", "a@x.org").await.unwrap();
        assert_eq!(answer, SignatureAnswer::Yes);
        assert!(checker.check_signature("u", "b@x.org").await.is_err());
        assert_eq!(checker.checked_emails(), vec!["a@x.org", "b@x.org"]);
    }
}
