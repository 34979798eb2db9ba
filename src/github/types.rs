use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One repository as returned by `GET /orgs/{org}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgRepo {
    pub id: i64,
    pub name: String,
    /// "owner/name", the path segment for per-repository endpoints.
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub has_downloads: bool,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_wiki: bool,
    pub html_url: String,
    #[serde(default)]
    pub open_issues_count: i64,
    #[serde(default)]
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub stargazers_count: i64,
    pub url: String,
    #[serde(default)]
    pub watchers_count: i64,
}

/// One entry of `GET /repos/{full_name}/commits`.
#[derive(Debug, Deserialize)]
pub struct CommitItem {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub message: Option<String>,
    pub committer: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
pub struct GitActor {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A commit flattened to the fields the pipeline persists.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub sha: String,
    pub message: Option<String>,
    pub committed_by: String,
    pub committed_at: DateTime<Utc>,
}

impl CommitItem {
    /// Flatten the wire shape. Commits without a committer identity cannot
    /// satisfy the commit row's required columns and count as absent.
    pub fn into_record(self) -> Option<CommitRecord> {
        let committer = self.commit.committer?;
        Some(CommitRecord {
            sha: self.sha,
            message: self.commit.message,
            committed_by: committer.name?,
            committed_at: committer.date?,
        })
    }
}
