//! Domain models for cla-gate.
//!
//! Canonical definitions for the entities one evaluation works with:
//! - `Commit`: author/committer metadata supplied by the platform
//! - `Identity`: a unique contributor, keyed by email
//! - `SignState` / `SignatureAnswer`: per-identity signature status
//! - `Verdict`: the tri-state outcome for the whole pull request

pub mod pull_request;
pub mod sign_state;

pub use pull_request::{Commit, Identity, PrComment, PullRequestRef};
pub use sign_state::{SignState, SignatureAnswer, Verdict};
