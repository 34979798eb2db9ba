//! The fetch → normalize → load pipeline.

pub mod load;
pub mod normalize;

pub use load::{CHUNK_SIZE, batches, populate};

use std::collections::BTreeMap;

use crate::error::Result;
use crate::github::{CommitRecord, OrgRepo, RepoHost};

/// Everything fetched for one repository: the repository itself, its
/// language breakdown (possibly empty), and its initial commit (if any).
#[derive(Debug)]
pub struct RepoData {
    pub repo: OrgRepo,
    pub languages: BTreeMap<String, i64>,
    pub initial_commit: Option<CommitRecord>,
}

/// Fetch the full triple list for one organization: one listing call plus
/// two per-repository calls, all sequential. A failing listing aborts the
/// run; per-repository absence is absorbed by the host adapter.
pub fn fetch_org_data(host: &dyn RepoHost, org: &str) -> Result<Vec<RepoData>> {
    let repos = host.list_org_repos(org)?;

    Ok(repos
        .into_iter()
        .map(|repo| {
            let languages = host.languages(&repo);
            let initial_commit = host.initial_commit(&repo);
            tracing::debug!(
                repo = %repo.full_name,
                languages = languages.len(),
                has_initial_commit = initial_commit.is_some(),
                "fetched repo data"
            );
            RepoData {
                repo,
                languages,
                initial_commit,
            }
        })
        .collect())
}
