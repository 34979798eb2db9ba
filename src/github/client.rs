use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, LINK};
use serde::de::DeserializeOwned;

use super::types::CommitItem;
use super::{CommitRecord, OrgRepo, RepoHost};
use crate::config::DEFAULT_API_URL;
use crate::error::{Error, Result};

/// GitHub's default pagination page size; also the bulk loader's chunk size.
pub const PAGE_SIZE: usize = 30;

pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("repomine/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.get(url).send()?;
        if resp.status().is_success() {
            Ok(resp.json()?)
        } else {
            Err(api_error(resp))
        }
    }

    /// Commits come newest-first; with `per_page=1` the `rel="last"` page
    /// holds exactly the oldest commit. No Link header means the first page
    /// already is the last one.
    fn oldest_commit(&self, full_name: &str) -> Result<Option<CommitRecord>> {
        let url = format!("{}/repos/{}/commits?per_page=1", self.base_url, full_name);
        let resp = self.get(&url).send()?;
        if !resp.status().is_success() {
            return Err(api_error(resp));
        }

        let last_page = resp
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(last_page_url);
        let first_page: Vec<CommitItem> = resp.json()?;

        let oldest = match last_page {
            Some(last_url) => self
                .fetch_json::<Vec<CommitItem>>(&last_url)?
                .into_iter()
                .next_back(),
            None => first_page.into_iter().next(),
        };

        Ok(oldest.and_then(CommitItem::into_record))
    }
}

impl RepoHost for GithubClient {
    fn list_org_repos(&self, org: &str) -> Result<Vec<OrgRepo>> {
        let mut repos = Vec::new();
        for page in 1usize.. {
            let url = format!(
                "{}/orgs/{}/repos?per_page={}&page={}",
                self.base_url, org, PAGE_SIZE, page
            );
            let batch: Vec<OrgRepo> = self.fetch_json(&url)?;
            let short_page = batch.len() < PAGE_SIZE;
            repos.extend(batch);
            if short_page {
                break;
            }
        }
        tracing::debug!(org, count = repos.len(), "listed organization repos");
        Ok(repos)
    }

    fn languages(&self, repo: &OrgRepo) -> BTreeMap<String, i64> {
        let url = format!("{}/repos/{}/languages", self.base_url, repo.full_name);
        match self.fetch_json(&url) {
            Ok(breakdown) => breakdown,
            Err(err) => {
                tracing::warn!(repo = %repo.full_name, %err, "language breakdown unavailable");
                BTreeMap::new()
            }
        }
    }

    fn initial_commit(&self, repo: &OrgRepo) -> Option<CommitRecord> {
        match self.oldest_commit(&repo.full_name) {
            Ok(commit) => commit,
            Err(err) => {
                tracing::warn!(repo = %repo.full_name, %err, "initial commit unavailable");
                None
            }
        }
    }
}

fn api_error(resp: reqwest::blocking::Response) -> Error {
    let status = resp.status().as_u16();
    let url = resp.url().to_string();
    let message = resp
        .text()
        .ok()
        .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
        .and_then(|value| value["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| "no details provided".to_string());
    Error::Api {
        status,
        url,
        message,
    }
}

/// Extract the `rel="last"` target from an RFC 8288 Link header.
fn last_page_url(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_last = parts
            .any(|param| param.trim().eq_ignore_ascii_case(r#"rel="last""#));
        if is_last {
            return Some(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_url_finds_rel_last() {
        let header = r#"<https://api.github.com/repositories/1/commits?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1/commits?per_page=1&page=17>; rel="last""#;
        assert_eq!(
            last_page_url(header).as_deref(),
            Some("https://api.github.com/repositories/1/commits?per_page=1&page=17")
        );
    }

    #[test]
    fn last_page_url_ignores_other_rels() {
        let header = r#"<https://api.github.com/x?page=2>; rel="next""#;
        assert_eq!(last_page_url(header), None);
    }
}
