mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{InitialCommit, Language, Repo, RowBatch};

/// Per-language repository counts, split by visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageUsage {
    pub name: String,
    pub private_repos: i64,
    pub public_repos: i64,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Create the schema if absent. Safe to call on every run.
    fn initialize(&self) -> Result<()>;

    /// Write a full run's batches inside exactly one transaction: for each
    /// batch, its repo rows, then its language rows, then its commit rows.
    /// Any failure rolls back the whole run.
    fn populate(&self, batches: &[RowBatch]) -> Result<()>;

    fn count_repos(&self) -> Result<i64>;
    fn count_languages(&self) -> Result<i64>;
    fn count_commits(&self) -> Result<i64>;

    fn get_repo(&self, id: i64) -> Result<Option<Repo>>;
    fn list_repo_languages(&self, repo_id: i64) -> Result<Vec<Language>>;
    fn get_initial_commit(&self, repo_id: i64) -> Result<Option<InitialCommit>>;

    // Report queries
    fn language_repo_counts(&self) -> Result<Vec<LanguageUsage>>;

    /// Age in days of every repo with a known initial commit and push time:
    /// last push minus initial commit.
    fn repo_ages_days(&self, private: bool) -> Result<Vec<f64>>;
}
