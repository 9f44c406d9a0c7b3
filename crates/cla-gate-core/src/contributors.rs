//! Contributor extraction.
//!
//! Collapses a PR's commit list into the ordered set of unique identities
//! whose signature must be checked. Identities are keyed by exact email
//! (no case folding, no trimming); the first name seen for an email is kept
//! and first-occurrence order is preserved.

use std::collections::HashSet;

use crate::config::RepoPolicy;
use crate::domain::{Commit, Identity};

/// Which commit fields identify a contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorSource {
    Author,
    Committer,
}

impl ContributorSource {
    pub fn for_policy(policy: &RepoPolicy) -> Self {
        if policy.check_by_committer {
            ContributorSource::Committer
        } else {
            ContributorSource::Author
        }
    }

    fn pick(self, commit: &Commit) -> (&str, &str) {
        match self {
            ContributorSource::Author => (commit.author_name.as_str(), commit.author_email.as_str()),
            ContributorSource::Committer => (
                commit.committer_name.as_str(),
                commit.committer_email.as_str(),
            ),
        }
    }
}

/// Insertion-ordered set of identities, unique by email.
#[derive(Debug, Default)]
pub struct ContributorSet {
    seen: HashSet<String>,
    ordered: Vec<Identity>,
}

impl ContributorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the email is already present. Returns whether it was new.
    pub fn insert(&mut self, name: &str, email: &str) -> bool {
        if !self.seen.insert(email.to_string()) {
            return false;
        }
        self.ordered.push(Identity::new(name, email));
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<Identity> {
        self.ordered
    }
}

/// Extract the unique contributing identities of `commits` per `policy`.
///
/// Zero commits yield an empty list; callers must not aggregate it.
pub fn extract_contributors(commits: &[Commit], policy: &RepoPolicy) -> Vec<Identity> {
    collect_identities(commits, ContributorSource::for_policy(policy))
}

pub fn collect_identities(commits: &[Commit], source: ContributorSource) -> Vec<Identity> {
    let mut set = ContributorSet::new();
    for commit in commits {
        let (name, email) = source.pick(commit);
        set.insert(name, email);
    }
    set.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(author: (&str, &str), committer: (&str, &str)) -> Commit {
        Commit {
            author_name: author.0.to_string(),
            author_email: author.1.to_string(),
            committer_name: committer.0.to_string(),
            committer_email: committer.1.to_string(),
        }
    }

    fn emails(ids: &[Identity]) -> Vec<&str> {
        ids.iter().map(|i| i.email.as_str()).collect()
    }

    #[test]
    fn dedup_keeps_first_name_and_order() {
        let commits = vec![
            Commit::by("bob", "b@x.org"),
            Commit::by("alice", "a@x.org"),
            Commit::by("Bobby", "b@x.org"),
            Commit::by("carol", "c@x.org"),
            Commit::by("Alice L.", "a@x.org"),
        ];
        let ids = collect_identities(&commits, ContributorSource::Author);
        assert_eq!(
            ids,
            vec![
                Identity::new("bob", "b@x.org"),
                Identity::new("alice", "a@x.org"),
                Identity::new("carol", "c@x.org"),
            ]
        );
    }

    #[test]
    fn email_equality_is_exact() {
        let commits = vec![
            Commit::by("alice", "a@x.org"),
            Commit::by("alice", "A@x.org"),
            Commit::by("alice", " a@x.org"),
        ];
        let ids = collect_identities(&commits, ContributorSource::Author);
        assert_eq!(emails(&ids), vec!["a@x.org", "A@x.org", " a@x.org"]);
    }

    #[test]
    fn source_toggle_switches_fields() {
        let commits = vec![
            commit(("alice", "a@x.org"), ("merge-bot", "bot@x.org")),
            commit(("bob", "b@x.org"), ("merge-bot", "bot@x.org")),
        ];

        let mut policy = crate::config::tests::sample().config_items[0].clone();
        policy.check_by_committer = false;
        let by_author = extract_contributors(&commits, &policy);
        assert_eq!(emails(&by_author), vec!["a@x.org", "b@x.org"]);

        policy.check_by_committer = true;
        let by_committer = extract_contributors(&commits, &policy);
        assert_eq!(by_committer, vec![Identity::new("merge-bot", "bot@x.org")]);
    }

    #[test]
    fn no_commits_no_identities() {
        assert!(collect_identities(&[], ContributorSource::Committer).is_empty());
    }

    #[test]
    fn empty_email_is_one_identity() {
        let commits = vec![Commit::by("ghost", ""), Commit::by("phantom", "")];
        let ids = collect_identities(&commits, ContributorSource::Author);
        assert_eq!(ids, vec![Identity::new("ghost", "")]);
    }

    #[test]
    fn contributor_set_insert_reports_novelty() {
        let mut set = ContributorSet::new();
        assert!(set.is_empty());
        assert!(set.insert("a", "a@x.org"));
        assert!(!set.insert("a2", "a@x.org"));
        assert_eq!(set.len(), 1);
    }
}
