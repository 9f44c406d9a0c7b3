//! Tracing setup for the `cla-gate` binary.
//!
//! `cla-gate check` and `cla-gate contributors` print their reports as JSON on
//! stdout, so every log line goes to stderr. `CLA_GATE_LOG` takes an
//! `EnvFilter` directive; without it only the gate's own crates log at the
//! requested level and dependencies (reqwest, hyper) stay at `warn`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the default filter.
pub const LOG_ENV: &str = "CLA_GATE_LOG";

const GATE_CRATES: [&str; 3] = ["cla_gate_core", "cla_signature_client", "cla_gate"];

/// Default directive: dependencies at `warn`, gate crates at `level`.
pub fn default_directive(level: Level) -> String {
    let mut directive = String::from("warn");
    for krate in GATE_CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive.to_lowercase()
}

/// Install the global subscriber. Later calls are no-ops.
///
/// With `json`, each line is one JSON object carrying the enclosing
/// evaluation span (and so its `evaluation_id`).
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    // a subscriber is already installed (tests, embedding hosts)
    result.ok();
}
