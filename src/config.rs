use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Everything a mining run needs, resolved once at startup and passed by
/// reference into the orchestrator and loader.
#[derive(Debug, Clone)]
pub struct MineConfig {
    pub database: PathBuf,
    pub organization: String,
    /// Opaque API credential; unauthenticated runs work for public orgs.
    pub token: Option<String>,
    pub api_url: String,
}

impl MineConfig {
    /// Resolve configuration from CLI flags, falling back to the process
    /// environment (`DATABASE`, `GITHUB_ORGANIZATION`, `GITHUB_API_TOKEN`).
    pub fn resolve(
        database: Option<PathBuf>,
        organization: Option<String>,
        token: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let database = database
            .or_else(|| env::var("DATABASE").ok().map(PathBuf::from))
            .ok_or_else(|| {
                Error::Config("no database path; pass --database or set DATABASE".into())
            })?;

        let organization = organization
            .or_else(|| env_nonempty("GITHUB_ORGANIZATION"))
            .ok_or_else(|| {
                Error::Config(
                    "no organization; pass --org or set GITHUB_ORGANIZATION".into(),
                )
            })?;

        let token = token.or_else(|| env_nonempty("GITHUB_API_TOKEN"));

        Ok(Self {
            database,
            organization,
            token,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
