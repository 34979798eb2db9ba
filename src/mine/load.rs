//! Bulk loading of fetched data into the store.

use super::RepoData;
use super::normalize::{commit_rows, language_rows, repo_rows};
use crate::error::Result;
use crate::github::PAGE_SIZE;
use crate::store::Store;
use crate::types::RowBatch;

/// Rows are written in batches of this many repositories to keep individual
/// insert statements bounded; fixed to the remote API's page size.
pub const CHUNK_SIZE: usize = PAGE_SIZE;

/// Chunk the triple list and project each chunk into its row batch.
///
/// Chunking happens before projection so a batch's language and commit rows
/// always reference repositories inserted in the same batch, and the loader
/// performs `ceil(N / CHUNK_SIZE)` insert batches per entity type.
pub fn batches(data: &[RepoData]) -> Vec<RowBatch> {
    data.chunks(CHUNK_SIZE)
        .map(|chunk| RowBatch {
            repos: repo_rows(chunk),
            languages: language_rows(chunk),
            commits: commit_rows(chunk),
        })
        .collect()
}

/// Write the whole run inside exactly one transaction: for each batch,
/// its repo rows, then its language rows, then its commit rows. Any insert
/// failure rolls back everything.
pub fn populate(store: &dyn Store, data: &[RepoData]) -> Result<()> {
    let batches = batches(data);
    tracing::debug!(
        repos = data.len(),
        batches = batches.len(),
        "populating store"
    );
    store.populate(&batches)
}
