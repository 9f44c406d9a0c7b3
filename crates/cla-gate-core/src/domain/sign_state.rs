//! Signature answers, per-identity sign state, and the aggregate verdict.

use serde::{Deserialize, Serialize};

/// Raw answer of the signature lookup service for one email.
///
/// The service is not trusted to be binary: anything other than an exact
/// `yes` or `no` lands in [`SignatureAnswer::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAnswer {
    Yes,
    No,
    Other(String),
}

impl SignatureAnswer {
    /// Parse a wire token. Matching is exact: `"Yes"` or `" yes"` is `Other`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "yes" => SignatureAnswer::Yes,
            "no" => SignatureAnswer::No,
            other => SignatureAnswer::Other(other.to_string()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            SignatureAnswer::Yes => "yes",
            SignatureAnswer::No => "no",
            SignatureAnswer::Other(token) => token,
        }
    }
}

/// Classification of one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignState {
    Signed,
    Unsigned,
    Unknown,
}

impl From<&SignatureAnswer> for SignState {
    fn from(answer: &SignatureAnswer) -> Self {
        match answer {
            SignatureAnswer::Yes => SignState::Signed,
            SignatureAnswer::No => SignState::Unsigned,
            SignatureAnswer::Other(_) => SignState::Unknown,
        }
    }
}

/// Aggregate outcome for one pull request, carrying the names relevant to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "names", rename_all = "snake_case")]
pub enum Verdict {
    /// Every identity signed. Carries the signer names.
    Pass(Vec<String>),
    /// At least one identity could not be classified. Carries those names.
    Pending(Vec<String>),
    /// No unknowns, at least one unsigned identity. Carries the unsigned names.
    Fail(Vec<String>),
}

impl Verdict {
    pub fn names(&self) -> &[String] {
        match self {
            Verdict::Pass(names) | Verdict::Pending(names) | Verdict::Fail(names) => names,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass(_) => "pass",
            Verdict::Pending(_) => "pending",
            Verdict::Fail(_) => "fail",
        }
    }
}
