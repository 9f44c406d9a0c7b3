//! Capability traits the gate is written against.
//!
//! - `Platform`: commit/label/comment CRUD and permission checks on the
//!   code-hosting platform
//! - `SignatureChecker`: the external CLA signature lookup service
//!
//! Both traits are async and runtime-agnostic. In-memory fakes live in the
//! `fakes` module.

use async_trait::async_trait;

use crate::domain::{Commit, PrComment, PullRequestRef, SignatureAnswer};
use crate::error::{PlatformError, SignatureError};

/// Result type for platform operations.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// The code-hosting platform API.
///
/// Label mutations are assumed idempotent: adding a present label or
/// removing an absent one must not fail.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Commits of the PR, in the order the platform returns them.
    async fn pull_request_commits(&self, pr: &PullRequestRef) -> PlatformResult<Vec<Commit>>;

    async fn pull_request_labels(&self, pr: &PullRequestRef) -> PlatformResult<Vec<String>>;

    async fn add_labels(&self, pr: &PullRequestRef, labels: &[String]) -> PlatformResult<()>;

    async fn remove_labels(&self, pr: &PullRequestRef, labels: &[String]) -> PlatformResult<()>;

    async fn list_comments(&self, pr: &PullRequestRef) -> PlatformResult<Vec<PrComment>>;

    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> PlatformResult<()>;

    async fn delete_comment(&self, pr: &PullRequestRef, comment_id: &str) -> PlatformResult<()>;

    /// Whether `login` may operate on the repository (write access or above).
    async fn has_write_permission(&self, pr: &PullRequestRef, login: &str)
        -> PlatformResult<bool>;
}

/// The CLA signature lookup service.
#[async_trait]
pub trait SignatureChecker: Send + Sync {
    /// Look up whether `email` signed the CLA behind `check_url`.
    async fn check_signature(
        &self,
        check_url: &str,
        email: &str,
    ) -> std::result::Result<SignatureAnswer, SignatureError>;
}
