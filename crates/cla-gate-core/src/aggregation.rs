//! Sign-state aggregation.
//!
//! Classifies every contributing identity as signed, unsigned, or unknown and
//! derives the PR [`Verdict`]. The signature service is not trusted to be
//! binary: errors and unrecognised answers are unknown, never signed or
//! unsigned.
//!
//! Verdict priority: any unknown -> `Pending`; else any unsigned -> `Fail`;
//! else `Pass`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RepoPolicy;
use crate::domain::{Identity, SignState, Verdict};
use crate::error::{GateError, Result};
use crate::platform::SignatureChecker;

/// Identities partitioned by sign state, each partition in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignReport {
    pub signed: Vec<Identity>,
    pub unsigned: Vec<Identity>,
    pub unknown: Vec<Identity>,
}

impl SignReport {
    fn push(&mut self, state: SignState, identity: Identity) {
        match state {
            SignState::Signed => self.signed.push(identity),
            SignState::Unsigned => self.unsigned.push(identity),
            SignState::Unknown => self.unknown.push(identity),
        }
    }

    pub fn total(&self) -> usize {
        self.signed.len() + self.unsigned.len() + self.unknown.len()
    }

    pub fn verdict(&self) -> Verdict {
        if !self.unknown.is_empty() {
            Verdict::Pending(names(&self.unknown))
        } else if !self.unsigned.is_empty() {
            Verdict::Fail(names(&self.unsigned))
        } else {
            Verdict::Pass(names(&self.signed))
        }
    }
}

fn names(identities: &[Identity]) -> Vec<String> {
    identities.iter().map(|i| i.name.clone()).collect()
}

/// Classify a single identity. The lite committer and empty emails are never
/// sent to the service.
pub async fn classify<S: SignatureChecker + ?Sized>(
    identity: &Identity,
    policy: &RepoPolicy,
    checker: &S,
) -> SignState {
    if policy.is_unverifiable(&identity.email) {
        debug!(email = %identity.email, "unverifiable email, skipping signature lookup");
        return SignState::Unknown;
    }

    match checker
        .check_signature(&policy.check_url, &identity.email)
        .await
    {
        Ok(answer) => SignState::from(&answer),
        Err(e) => {
            warn!(email = %identity.email, error = %e, "signature lookup failed");
            SignState::Unknown
        }
    }
}

/// Look up every identity, one at a time, and partition them.
///
/// Rejects an empty identity list: a PR with no contributors cannot be
/// evaluated.
pub async fn aggregate<S: SignatureChecker + ?Sized>(
    identities: &[Identity],
    policy: &RepoPolicy,
    checker: &S,
) -> Result<SignReport> {
    if identities.is_empty() {
        return Err(GateError::NoContributors);
    }

    let mut report = SignReport::default();
    for identity in identities {
        let state = classify(identity, policy, checker).await;
        report.push(state, identity.clone());
    }
    Ok(report)
}
