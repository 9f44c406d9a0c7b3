//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use cla_gate_core::fakes::{MemoryPlatform, StaticSignatureChecker};
use cla_gate_core::{ClaGate, GateConfig, PullRequestRef, RepoPolicy};

pub const GUIDE_MARKER: &str = "| CLA Signature Guide |";
pub const PASS_MARKER: &str = "| CLA Signature Pass |";
pub const RETRY: &str = "CLA state unknown, comment /check-cla to retry.";
pub const NO_COMMITS: &str = "This pull request has no commits.";
pub const LABEL_FAILED: &str = "Updating the CLA label failed, comment /check-cla to retry.";

pub const LABEL_YES: &str = "cla/yes";
pub const LABEL_NO: &str = "cla/no";

const CONFIG: &str = r#"
user_mark_format = "@{{committer}}"
comment_command_trigger = "CLA state unknown, comment /check-cla to retry."
comment_pr_no_commits = "This pull request has no commits."
comment_all_signed = "| CLA Signature Pass |\n{{committer}}, thanks for your pull request."
comment_some_need_sign = "| CLA Signature Guide |\n%s must sign at %s, see %s."
comment_update_label_failed = "Updating the CLA label failed, comment /check-cla to retry."
placeholder_committer = "{{committer}}"
placeholder_cla_sign_guide_title = "| CLA Signature Guide |"
placeholder_cla_sign_pass_title = "| CLA Signature Pass |"

[[config_items]]
repos = ["acme"]
cla_label_yes = "cla/yes"
cla_label_no = "cla/no"
check_url = "https://cla.example.org/api/check/acme"
sign_url = "https://cla.example.org/sign/acme"
faq_url = "https://cla.example.org/faq"

[[config_items]]
repos = ["lite/portal"]
cla_label_yes = "cla/yes"
cla_label_no = "cla/no"
check_url = "https://cla.example.org/api/check/lite"
sign_url = "https://cla.example.org/sign/lite"
faq_url = "https://cla.example.org/faq"
check_by_committer = true
lite_pr_committer = { email = "lite-bot@example.org", name = "lite-bot" }
"#;

pub fn config() -> GateConfig {
    let config = GateConfig::from_toml_str(CONFIG).unwrap();
    config.validate().unwrap();
    config
}

/// Policy for `acme/*`, checked by author.
pub fn author_policy() -> RepoPolicy {
    config().policy_for("acme", "widgets").unwrap().clone()
}

/// Policy for `lite/portal`, checked by committer with a lite committer.
pub fn committer_policy() -> RepoPolicy {
    config().policy_for("lite", "portal").unwrap().clone()
}

pub fn pr() -> PullRequestRef {
    PullRequestRef::new("acme", "widgets", "7")
}

pub type TestGate = ClaGate<MemoryPlatform, StaticSignatureChecker>;

pub fn gate(
    platform: MemoryPlatform,
    checker: StaticSignatureChecker,
) -> (TestGate, Arc<MemoryPlatform>, Arc<StaticSignatureChecker>) {
    let platform = Arc::new(platform);
    let checker = Arc::new(checker);
    let gate = ClaGate::new(platform.clone(), checker.clone(), Arc::new(config()));
    (gate, platform, checker)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}
