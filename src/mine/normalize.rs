//! Pure projections from the fetched triple list to the three row lists.
//!
//! All three are total, deterministic, and order-preserving; they do no I/O.

use super::RepoData;
use crate::types::{InitialCommit, Language, Repo};

pub fn repo_rows(data: &[RepoData]) -> Vec<Repo> {
    data.iter()
        .map(|entry| {
            let repo = &entry.repo;
            Repo {
                id: repo.id,
                name: repo.name.clone(),
                description: repo.description.clone(),
                fork: repo.fork,
                forks_count: repo.forks_count,
                has_downloads: repo.has_downloads,
                has_issues: repo.has_issues,
                has_wiki: repo.has_wiki,
                html_url: repo.html_url.clone(),
                open_issues_count: repo.open_issues_count,
                private: repo.private,
                created_at: repo.created_at,
                pushed_at: repo.pushed_at,
                updated_at: repo.updated_at,
                size: repo.size,
                stargazers_count: repo.stargazers_count,
                url: repo.url.clone(),
                watchers_count: repo.watchers_count,
            }
        })
        .collect()
}

/// One row per (repository, language) pair; a repository with an empty
/// breakdown contributes no rows.
pub fn language_rows(data: &[RepoData]) -> Vec<Language> {
    data.iter()
        .flat_map(|entry| {
            entry.languages.iter().map(|(name, size)| Language {
                repo_id: entry.repo.id,
                name: name.clone(),
                size_in_bytes: *size,
            })
        })
        .collect()
}

/// One row per repository with a discoverable initial commit; absence means
/// no row, never a placeholder.
pub fn commit_rows(data: &[RepoData]) -> Vec<InitialCommit> {
    data.iter()
        .filter_map(|entry| {
            entry.initial_commit.as_ref().map(|commit| InitialCommit {
                repo_id: entry.repo.id,
                sha: Some(commit.sha.clone()),
                message: commit.message.clone(),
                committed_by: commit.committed_by.clone(),
                committed_at: commit.committed_at,
            })
        })
        .collect()
}
