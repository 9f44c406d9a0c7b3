//! Gate configuration: global comment templates plus per-repository policies.
//!
//! Loaded from TOML or JSON (chosen by file extension) and validated before
//! use. Every required string key must be non-empty; missing keys are
//! reported together in one [`ConfigError::MissingKeys`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Positional slot in `comment_some_need_sign`, filled in order with the
/// rendered names, the sign URL and the FAQ URL.
pub const NEED_SIGN_SLOT: &str = "%s";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    #[serde(default)]
    pub config_items: Vec<RepoPolicy>,

    #[serde(flatten)]
    pub templates: CommentTemplates,
}

/// Global comment templates and the placeholder tokens substituted into them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentTemplates {
    /// Format of one rendered contributor, e.g. `@{{committer}}`.
    #[serde(default)]
    pub user_mark_format: String,
    /// Posted when the sign state is undecidable; asks for `/check-cla`.
    #[serde(default)]
    pub comment_command_trigger: String,
    #[serde(default)]
    pub comment_pr_no_commits: String,
    #[serde(default)]
    pub comment_all_signed: String,
    /// Up to three [`NEED_SIGN_SLOT`]s: names, sign URL, FAQ URL.
    #[serde(default)]
    pub comment_some_need_sign: String,
    #[serde(default)]
    pub comment_update_label_failed: String,
    /// Token replaced by contributor names.
    #[serde(default)]
    pub placeholder_committer: String,
    /// Marker carried by "needs signing" guidance comments.
    #[serde(default)]
    pub placeholder_cla_sign_guide_title: String,
    /// Marker carried by "all signed" comments.
    #[serde(default)]
    pub placeholder_cla_sign_pass_title: String,
}

/// Which repositories a policy applies to.
///
/// `repos` entries are either an org (`openeuler`) or a full repo
/// (`openeuler/kernel`). `excluded_repos` entries are full repos and win over
/// an included org.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoFilter {
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(default)]
    pub excluded_repos: Vec<String>,
}

impl RepoFilter {
    pub fn applies_to(&self, org: &str, repo: &str) -> bool {
        let full = format!("{org}/{repo}");
        if self.excluded_repos.iter().any(|r| *r == full) {
            return false;
        }
        self.repos.iter().any(|r| r == org || *r == full)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.repos.is_empty() {
            return Err(ConfigError::EmptyRepos { index });
        }
        for entry in &self.repos {
            check_filter_entry(index, entry, false)?;
        }
        for entry in &self.excluded_repos {
            check_filter_entry(index, entry, true)?;
        }
        Ok(())
    }
}

fn check_filter_entry(index: usize, entry: &str, must_be_full: bool) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRepoFilter {
        index,
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = entry.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid("empty path segment"));
    }
    match (parts.len(), must_be_full) {
        (1, false) | (2, _) => Ok(()),
        (1, true) => Err(invalid("excluded entries must be org/repo")),
        _ => Err(invalid("expected org or org/repo")),
    }
}

/// Placeholder identity used by lightweight PR-creation flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LitePrCommitter {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Per-repository CLA policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoPolicy {
    #[serde(flatten)]
    pub filter: RepoFilter,

    /// Label applied when every contributor signed.
    #[serde(default)]
    pub cla_label_yes: String,
    /// Label applied when some contributor has not signed.
    #[serde(default)]
    pub cla_label_no: String,
    /// Signature lookup endpoint; queried as `{check_url}?email=<email>`.
    #[serde(default)]
    pub check_url: String,
    #[serde(default)]
    pub sign_url: String,
    #[serde(default)]
    pub faq_url: String,
    /// Check committers instead of authors.
    #[serde(default)]
    pub check_by_committer: bool,
    /// Required when `check_by_committer` is set.
    #[serde(default)]
    pub lite_pr_committer: LitePrCommitter,
}

impl RepoPolicy {
    /// Whether `email` must be classified unknown without asking the service.
    pub fn is_unverifiable(&self, email: &str) -> bool {
        email.is_empty() || email == self.lite_pr_committer.email
    }

    fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = missing_of(&[
            ("cla_label_yes", &self.cla_label_yes),
            ("cla_label_no", &self.cla_label_no),
            ("check_url", &self.check_url),
            ("sign_url", &self.sign_url),
            ("faq_url", &self.faq_url),
        ]);
        if self.check_by_committer {
            missing.extend(missing_of(&[
                ("lite_pr_committer.email", &self.lite_pr_committer.email),
                ("lite_pr_committer.name", &self.lite_pr_committer.name),
            ]));
        }
        missing
    }
}

impl CommentTemplates {
    fn missing_keys(&self) -> Vec<&'static str> {
        missing_of(&[
            ("user_mark_format", &self.user_mark_format),
            ("comment_command_trigger", &self.comment_command_trigger),
            ("comment_pr_no_commits", &self.comment_pr_no_commits),
            ("comment_all_signed", &self.comment_all_signed),
            ("comment_some_need_sign", &self.comment_some_need_sign),
            ("comment_update_label_failed", &self.comment_update_label_failed),
            ("placeholder_committer", &self.placeholder_committer),
            (
                "placeholder_cla_sign_guide_title",
                &self.placeholder_cla_sign_guide_title,
            ),
            (
                "placeholder_cla_sign_pass_title",
                &self.placeholder_cla_sign_pass_title,
            ),
        ])
    }
}

fn missing_of(fields: &[(&'static str, &String)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| *key)
        .collect()
}

impl GateConfig {
    /// Read and validate a config file. `.toml` and `.json` are supported.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&raw)?,
            Some("json") => serde_json::from_str(&raw)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Check every repo policy, then the global templates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, item) in self.config_items.iter().enumerate() {
            item.filter.validate(index)?;
            let missing = item.missing_keys();
            if !missing.is_empty() {
                return Err(ConfigError::MissingKeys {
                    keys: missing
                        .into_iter()
                        .map(|k| format!("config_items[{index}].{k}"))
                        .collect(),
                });
            }
        }

        let missing = self.templates.missing_keys();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys {
                keys: missing.into_iter().map(str::to_string).collect(),
            });
        }

        if !self.templates.comment_some_need_sign.contains(NEED_SIGN_SLOT) {
            return Err(ConfigError::InvalidTemplate {
                key: "comment_some_need_sign",
                reason: format!("needs a {NEED_SIGN_SLOT} slot for the unsigned contributors"),
            });
        }
        Ok(())
    }

    /// The first policy whose filter applies to `org/repo`.
    pub fn policy_for(&self, org: &str, repo: &str) -> Option<&RepoPolicy> {
        self.config_items
            .iter()
            .find(|item| item.filter.applies_to(org, repo))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
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
repos = ["openeuler"]
excluded_repos = ["openeuler/infra"]
cla_label_yes = "openeuler-cla/yes"
cla_label_no = "openeuler-cla/no"
check_url = "https://clasign.example.org/api/v1/individual-signing/openeuler"
sign_url = "https://clasign.example.org/sign/openeuler"
faq_url = "https://clasign.example.org/faq"

[[config_items]]
repos = ["src-openeuler/glibc", "openeuler/infra"]
cla_label_yes = "cla/yes"
cla_label_no = "cla/no"
check_url = "https://clasign.example.org/api/v1/individual-signing/src"
sign_url = "https://clasign.example.org/sign/src"
faq_url = "https://clasign.example.org/faq"
check_by_committer = true
lite_pr_committer = { email = "lite-bot@example.org", name = "lite-bot" }
"#;

    pub(crate) fn sample() -> GateConfig {
        GateConfig::from_toml_str(SAMPLE).unwrap()
    }

    #[test]
    fn sample_is_valid() {
        let config = sample();
        config.validate().unwrap();
        assert_eq!(config.config_items.len(), 2);
    }

    #[test]
    fn policy_resolution_honours_exclusions() {
        let config = sample();
        let kernel = config.policy_for("openeuler", "kernel").unwrap();
        assert_eq!(kernel.cla_label_yes, "openeuler-cla/yes");

        let infra = config.policy_for("openeuler", "infra").unwrap();
        assert_eq!(infra.cla_label_yes, "cla/yes");
        assert!(infra.check_by_committer);

        assert!(config.policy_for("src-openeuler", "kernel").is_none());
        assert!(config.policy_for("other", "glibc").is_none());
    }

    #[test]
    fn missing_template_keys_are_reported_together() {
        let mut config = sample();
        config.templates.comment_all_signed.clear();
        config.templates.placeholder_committer.clear();
        let err = config.validate().unwrap_err();
        match err {
            ConfigError::MissingKeys { keys } => {
                assert_eq!(keys, vec!["comment_all_signed", "placeholder_committer"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn need_sign_template_without_slot_rejected() {
        let mut config = sample();
        config.templates.comment_some_need_sign =
            "| CLA Signature Guide | {{committer}} must sign at {{sign_url}}".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTemplate {
                key: "comment_some_need_sign",
                ..
            }
        ));
    }

    #[test]
    fn check_by_committer_requires_lite_committer() {
        let mut config = sample();
        config.config_items[1].lite_pr_committer = LitePrCommitter::default();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("config_items[1].lite_pr_committer.email"));
        assert!(err.contains("config_items[1].lite_pr_committer.name"));
    }

    #[test]
    fn empty_repos_rejected() {
        let mut config = sample();
        config.config_items[0].filter.repos.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRepos { index: 0 })
        ));
    }

    #[test]
    fn malformed_filter_entries_rejected() {
        let mut config = sample();
        config.config_items[0].filter.excluded_repos = vec!["openeuler".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepoFilter { .. })
        ));

        let mut config = sample();
        config.config_items[0].filter.repos = vec!["a/b/c".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepoFilter { .. })
        ));
    }

    #[test]
    fn unverifiable_emails() {
        let config = sample();
        let policy = &config.config_items[1];
        assert!(policy.is_unverifiable(""));
        assert!(policy.is_unverifiable("lite-bot@example.org"));
        assert!(!policy.is_unverifiable("Lite-Bot@example.org"));
    }

    #[test]
    fn load_reads_toml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("gate.toml");
        std::fs::write(&toml_path, SAMPLE).unwrap();
        let from_toml = GateConfig::load(&toml_path).unwrap();

        let json_path = dir.path().join("gate.json");
        std::fs::write(&json_path, serde_json::to_string(&from_toml).unwrap()).unwrap();
        let from_json = GateConfig::load(&json_path).unwrap();
        assert_eq!(from_toml, from_json);

        let yaml_path = dir.path().join("gate.yaml");
        std::fs::write(&yaml_path, "").unwrap();
        assert!(matches!(
            GateConfig::load(&yaml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
