//! Error taxonomy for cla-gate.
//!
//! Every failure is scoped to a single evaluation. The gate turns most of
//! these into a fixed PR comment or a log line; none of them is fatal to the
//! hosting process.

use thiserror::Error;

/// Errors returned by a [`crate::platform::Platform`] implementation.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform API answered with a failure.
    #[error("platform request {operation} failed: {reason}")]
    Request { operation: String, reason: String },
}

impl PlatformError {
    pub fn request(operation: &str, reason: impl Into<String>) -> Self {
        PlatformError::Request {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by a [`crate::platform::SignatureChecker`].
///
/// Aggregation never propagates these: an errored lookup is classified as
/// [`crate::domain::SignState::Unknown`].
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature service transport error: {0}")]
    Transport(String),

    #[error("signature service returned status {status}")]
    Status { status: u16 },

    #[error("signature service returned an undecodable body: {0}")]
    Decode(String),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required keys are unset or empty. All missing keys are reported at once.
    #[error("missing the following config: {}", keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    #[error("config item {index}: the repositories configuration can not be empty")]
    EmptyRepos { index: usize },

    #[error("config item {index}: invalid repo filter entry '{entry}': {reason}")]
    InvalidRepoFilter {
        index: usize,
        entry: String,
        reason: String,
    },

    #[error("template {key} is invalid: {reason}")]
    InvalidTemplate { key: &'static str, reason: String },

    #[error("unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Core gate errors.
#[derive(Debug, Error)]
pub enum GateError {
    /// Aggregation was asked to evaluate a PR with no contributing identity.
    #[error("no contributors to evaluate")]
    NoContributors,

    /// No configured policy applies to the repository.
    #[error("no config for this repo: {org}/{repo}")]
    NoPolicy { org: String, repo: String },

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Result type for core gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_lists_every_key() {
        let err = ConfigError::MissingKeys {
            keys: vec!["cla_label_yes".to_string(), "sign_url".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing the following config: cla_label_yes, sign_url"
        );
    }

    #[test]
    fn no_policy_names_the_repo() {
        let err = GateError::NoPolicy {
            org: "openeuler".to_string(),
            repo: "kernel".to_string(),
        };
        assert!(err.to_string().contains("openeuler/kernel"));
    }

    #[test]
    fn platform_error_wraps_into_gate_error() {
        let err: GateError = PlatformError::request("add_labels", "403 Forbidden").into();
        let msg = err.to_string();
        assert!(msg.contains("add_labels"));
        assert!(msg.contains("403 Forbidden"));
    }
}
