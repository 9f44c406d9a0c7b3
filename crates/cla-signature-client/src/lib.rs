//! HTTP client for the CLA signature lookup service.
//!
//! Implements [`SignatureChecker`] over `reqwest`. The service is queried as
//! `GET {check_url}?email=<email>` and answers
//! `{"data": {"signed": <bool>}}`. Any other status, a transport error, or an
//! undecodable body is returned as a [`SignatureError`], which the gate
//! classifies as unknown.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cla_gate_core::{SignatureAnswer, SignatureChecker, SignatureError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct SignatureClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SignatureClientConfig {
    fn default() -> Self {
        SignatureClientConfig {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("cla-gate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SignatureClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SignStateBody {
    data: SignStateData,
}

#[derive(Debug, Deserialize)]
struct SignStateData {
    signed: bool,
}

/// `reqwest`-backed signature checker.
pub struct HttpSignatureChecker {
    http_client: reqwest::Client,
}

impl HttpSignatureChecker {
    pub fn new(config: SignatureClientConfig) -> Result<Self, SignatureError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SignatureError::Transport(e.to_string()))?;
        Ok(HttpSignatureChecker { http_client })
    }
}

#[async_trait]
impl SignatureChecker for HttpSignatureChecker {
    async fn check_signature(
        &self,
        check_url: &str,
        email: &str,
    ) -> Result<SignatureAnswer, SignatureError> {
        let response = self
            .http_client
            .get(check_url)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| SignatureError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignatureError::Status {
                status: status.as_u16(),
            });
        }

        let body: SignStateBody = response
            .json()
            .await
            .map_err(|e| SignatureError::Decode(e.to_string()))?;
        debug!(email = %email, signed = body.data.signed, "signature lookup answered");

        Ok(if body.data.signed {
            SignatureAnswer::Yes
        } else {
            SignatureAnswer::No
        })
    }
}
