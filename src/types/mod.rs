mod models;

pub use models::{InitialCommit, Language, Repo, RowBatch};
