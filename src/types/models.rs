use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One GitHub repository. The id is the remote system's identifier and is
/// used as the primary key; nothing is generated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fork: bool,
    pub forks_count: i64,
    pub has_downloads: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub html_url: String,
    pub open_issues_count: i64,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    /// Null for repositories that have never been pushed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub size: i64,
    pub stargazers_count: i64,
    pub url: String,
    pub watchers_count: i64,
}

/// One (repository, language) pair from the platform's language breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub repo_id: i64,
    pub name: String,
    pub size_in_bytes: i64,
}

/// A repository's earliest reachable commit. At most one row per repository;
/// a repository with no discoverable initial commit has no row at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialCommit {
    pub repo_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub committed_by: String,
    pub committed_at: DateTime<Utc>,
}

/// One chunk's worth of rows, the bulk loader's unit of insertion.
#[derive(Debug, Clone, Default)]
pub struct RowBatch {
    pub repos: Vec<Repo>,
    pub languages: Vec<Language>,
    pub commits: Vec<InitialCommit>,
}
