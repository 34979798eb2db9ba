//! CLI integration tests for the repomine binary.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;

use repomine::store::{SqliteStore, Store};
use repomine::types::{InitialCommit, Language, Repo, RowBatch};

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("repos.db")
    }

    fn seed(&self) {
        let store = SqliteStore::new(self.db_path()).expect("open store");
        store.initialize().expect("initialize");

        let created = Utc.with_ymd_and_hms(2014, 5, 1, 12, 0, 0).unwrap();
        let pushed = Utc.with_ymd_and_hms(2016, 2, 3, 9, 30, 0).unwrap();

        let repo = Repo {
            id: 1,
            name: "widget".to_string(),
            description: Some("a widget".to_string()),
            fork: false,
            forks_count: 0,
            has_downloads: true,
            has_issues: true,
            has_wiki: false,
            html_url: "https://github.com/acme/widget".to_string(),
            open_issues_count: 0,
            private: false,
            created_at: created,
            pushed_at: Some(pushed),
            updated_at: pushed,
            size: 128,
            stargazers_count: 3,
            url: "https://api.github.com/repos/acme/widget".to_string(),
            watchers_count: 3,
        };

        store
            .populate(&[RowBatch {
                repos: vec![repo],
                languages: vec![Language {
                    repo_id: 1,
                    name: "Rust".to_string(),
                    size_in_bytes: 1200,
                }],
                commits: vec![InitialCommit {
                    repo_id: 1,
                    sha: Some("c1".to_string()),
                    message: Some("initial import".to_string()),
                    committed_by: "Dev One".to_string(),
                    committed_at: created,
                }],
            }])
            .expect("seed database");
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("repomine").expect("failed to find binary");
        cmd.env_remove("DATABASE")
            .env_remove("GITHUB_ORGANIZATION")
            .env_remove("GITHUB_API_TOKEN");
        cmd
    }
}

#[test]
fn report_languages_prints_the_table() {
    let ctx = TestContext::new();
    ctx.seed();

    ctx.cmd()
        .args(["report", "languages", "--database"])
        .arg(ctx.db_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LANGUAGE"))
        .stdout(predicate::str::contains("Rust"));
}

#[test]
fn report_ages_prints_both_visibilities() {
    let ctx = TestContext::new();
    ctx.seed();

    ctx.cmd()
        .args(["report", "ages", "--database"])
        .arg(ctx.db_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Public repos by age:"))
        .stdout(predicate::str::contains("Private repos by age:"));
}

#[test]
fn report_fails_without_a_database_file() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["report", "languages", "--database"])
        .arg(ctx.db_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn mine_requires_an_organization() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["mine", "--database"])
        .arg(ctx.db_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_ORGANIZATION"));
}

#[test]
fn mine_requires_a_database() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["mine", "--org", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE"));
}
