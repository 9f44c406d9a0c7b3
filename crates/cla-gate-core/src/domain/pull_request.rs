//! Pull request addressing and commit metadata.

use serde::{Deserialize, Serialize};

/// Addresses one pull request on the code-hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub org: String,
    pub repo: String,
    pub number: String,
}

impl PullRequestRef {
    pub fn new(org: impl Into<String>, repo: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            number: number.into(),
        }
    }

    /// `org/repo`, the form repo filters match against.
    pub fn full_repo(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.org, self.repo, self.number)
    }
}

/// Author and committer metadata of a single PR commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub committer_name: String,
    #[serde(default)]
    pub committer_email: String,
}

impl Commit {
    /// Commit whose author and committer are the same person.
    pub fn by(name: &str, email: &str) -> Self {
        Self {
            author_name: name.to_string(),
            author_email: email.to_string(),
            committer_name: name.to_string(),
            committer_email: email.to_string(),
        }
    }

    pub fn author(&self) -> Identity {
        Identity::new(&self.author_name, &self.author_email)
    }

    pub fn committer(&self) -> Identity {
        Identity::new(&self.committer_name, &self.committer_email)
    }
}

/// A contributing identity. Unique by `email` within one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

/// A PR comment as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrComment {
    pub id: String,
    pub body: String,
}
