//! # repomine
//!
//! Mines repository metadata for one GitHub organization and persists it
//! into a SQLite database: every repository, its language breakdown, and
//! its initial commit (as a proxy for the repository's true age).
//!
//! The pipeline is three sequential phases: fetch the data from the GitHub
//! API, normalize it into row lists, and bulk-load everything inside a
//! single transaction. Reports read the populated database afterwards.
//!
//! ```rust,ignore
//! use repomine::github::GithubClient;
//! use repomine::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("repos.db")?;
//! store.initialize()?;
//!
//! let client = GithubClient::new(Some("token".into()))?;
//! let data = repomine::mine::fetch_org_data(&client, "acme")?;
//! repomine::mine::populate(&store, &data)?;
//! ```

pub mod config;
pub mod error;
pub mod github;
pub mod mine;
pub mod progress;
pub mod store;
pub mod types;
