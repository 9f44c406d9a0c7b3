//! cla-gate core library
//!
//! Decides whether every contributor of a pull request signed the CLA and
//! keeps the PR's labels and guidance comment in sync with that decision.
//!
//! Pipeline, per evaluation:
//! 1. [`contributors`] collapses commits into unique identities
//! 2. [`aggregation`] classifies identities and derives a [`Verdict`]
//! 3. [`reconcile`] applies labels and posts the outcome comment
//!
//! The platform and the signature service are reached only through the
//! [`Platform`] and [`SignatureChecker`] traits.

pub mod aggregation;
pub mod command;
pub mod config;
pub mod contributors;
pub mod domain;
pub mod error;
pub mod event_adapter;
pub mod fakes;
pub mod gate;
pub mod metrics;
pub mod obs;
pub mod platform;
pub mod reconcile;
pub mod telemetry;

pub use aggregation::{aggregate, classify, SignReport};
pub use command::ClaCommand;
pub use config::{CommentTemplates, GateConfig, LitePrCommitter, RepoFilter, RepoPolicy};
pub use contributors::{collect_identities, extract_contributors, ContributorSet, ContributorSource};
pub use domain::{Commit, Identity, PrComment, PullRequestRef, SignState, SignatureAnswer, Verdict};
pub use error::{ConfigError, GateError, PlatformError, Result, SignatureError};
pub use event_adapter::{
    handle_comment_event, handle_pull_request_event, CommentEvent, EventOutcome, PullRequestEvent,
};
pub use gate::{CancelOutcome, ClaGate, EvaluationOutcome};
pub use metrics::METRICS;
pub use platform::{Platform, PlatformResult, SignatureChecker};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use telemetry::init_tracing;

/// cla-gate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
