mod client;
mod types;

pub use client::{GithubClient, PAGE_SIZE};
pub use types::{CommitRecord, OrgRepo};

use std::collections::BTreeMap;

use crate::error::Result;

/// RepoHost defines the remote source interface.
///
/// Per-repository lookups are total: an inaccessible or empty repository is
/// a normal case, surfaced as an empty map or `None`, so callers never need
/// per-repository error branching. Only the organization listing can fail.
pub trait RepoHost {
    fn list_org_repos(&self, org: &str) -> Result<Vec<OrgRepo>>;

    /// Language breakdown for one repository: language name to byte count.
    fn languages(&self, repo: &OrgRepo) -> BTreeMap<String, i64>;

    /// The chronologically oldest commit reachable in the repository's
    /// default history, if any.
    fn initial_commit(&self, repo: &OrgRepo) -> Option<CommitRecord>;
}
