//! End-to-end pipeline tests: fake remote host, real SQLite store.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use repomine::error::Result;
use repomine::github::{CommitRecord, OrgRepo, RepoHost};
use repomine::mine::{self, CHUNK_SIZE, RepoData};
use repomine::store::{SqliteStore, Store};

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn org_repo(id: i64, name: &str, private: bool) -> OrgRepo {
    OrgRepo {
        id,
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        description: None,
        fork: false,
        forks_count: 0,
        has_downloads: true,
        has_issues: true,
        has_wiki: false,
        html_url: format!("https://github.com/acme/{name}"),
        open_issues_count: 0,
        private,
        created_at: ts(2014, 5, 1),
        pushed_at: Some(ts(2016, 2, 3)),
        updated_at: ts(2016, 2, 3),
        size: 10,
        stargazers_count: 0,
        url: format!("https://api.github.com/repos/acme/{name}"),
        watchers_count: 0,
    }
}

fn commit(sha: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        message: Some("initial import".to_string()),
        committed_by: "Dev One".to_string(),
        committed_at: ts(2014, 5, 2),
    }
}

struct FakeHost {
    repos: Vec<OrgRepo>,
    languages: BTreeMap<i64, BTreeMap<String, i64>>,
    commits: BTreeMap<i64, CommitRecord>,
}

impl RepoHost for FakeHost {
    fn list_org_repos(&self, _org: &str) -> Result<Vec<OrgRepo>> {
        Ok(self.repos.clone())
    }

    fn languages(&self, repo: &OrgRepo) -> BTreeMap<String, i64> {
        self.languages.get(&repo.id).cloned().unwrap_or_default()
    }

    fn initial_commit(&self, repo: &OrgRepo) -> Option<CommitRecord> {
        self.commits.get(&repo.id).cloned()
    }
}

fn open_store(dir: &Path) -> SqliteStore {
    let store = SqliteStore::new(dir.join("repos.db")).expect("open store");
    store.initialize().expect("initialize schema");
    store
}

#[test]
fn end_to_end_two_repos() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());

    let host = FakeHost {
        repos: vec![org_repo(1, "alpha", false), org_repo(2, "beta", true)],
        languages: BTreeMap::from([(1, BTreeMap::from([("X".to_string(), 100)]))]),
        commits: BTreeMap::from([(1, commit("c1"))]),
    };

    let data = mine::fetch_org_data(&host, "acme").expect("fetch");
    assert_eq!(data.len(), 2);

    mine::populate(&store, &data).expect("populate");

    assert_eq!(store.count_repos().unwrap(), 2);
    assert_eq!(store.count_languages().unwrap(), 1);
    assert_eq!(store.count_commits().unwrap(), 1);

    let alpha = store.get_repo(1).unwrap().expect("alpha row");
    assert_eq!(alpha.name, "alpha");
    assert!(!alpha.private);

    let languages = store.list_repo_languages(1).unwrap();
    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0].name, "X");
    assert_eq!(languages[0].size_in_bytes, 100);

    let initial = store.get_initial_commit(1).unwrap().expect("alpha commit");
    assert_eq!(initial.sha.as_deref(), Some("c1"));
    assert_eq!(initial.committed_at, ts(2014, 5, 2));

    // The private repo contributes no language or commit rows.
    assert!(store.list_repo_languages(2).unwrap().is_empty());
    assert!(store.get_initial_commit(2).unwrap().is_none());
}

#[test]
fn chunked_load_drops_and_duplicates_nothing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());

    let count = 2 * CHUNK_SIZE + 5;
    let data: Vec<RepoData> = (0..count as i64)
        .map(|id| RepoData {
            repo: org_repo(id, &format!("repo-{id}"), id % 2 == 0),
            languages: BTreeMap::from([("Rust".to_string(), id * 10)]),
            initial_commit: Some(commit(&format!("sha-{id}"))),
        })
        .collect();

    assert_eq!(mine::batches(&data).len(), 3);

    mine::populate(&store, &data).expect("populate");

    assert_eq!(store.count_repos().unwrap(), count as i64);
    assert_eq!(store.count_languages().unwrap(), count as i64);
    assert_eq!(store.count_commits().unwrap(), count as i64);

    // Spot-check both ends of the run.
    assert!(store.get_repo(0).unwrap().is_some());
    let last = store.get_repo(count as i64 - 1).unwrap().expect("last repo");
    assert_eq!(last.name, format!("repo-{}", count - 1));
    assert_eq!(
        store
            .get_initial_commit(count as i64 - 1)
            .unwrap()
            .unwrap()
            .sha
            .as_deref(),
        Some(format!("sha-{}", count - 1).as_str())
    );
}

#[test]
fn failure_in_last_chunk_rolls_back_the_whole_run() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());

    let mut data: Vec<RepoData> = (0..(CHUNK_SIZE as i64) * 2)
        .map(|id| RepoData {
            repo: org_repo(id, &format!("repo-{id}"), false),
            languages: BTreeMap::new(),
            initial_commit: None,
        })
        .collect();

    // Duplicate primary key in the final chunk.
    data.push(RepoData {
        repo: org_repo(0, "dupe", false),
        languages: BTreeMap::new(),
        initial_commit: None,
    });

    let err = mine::populate(&store, &data);
    assert!(err.is_err());

    assert_eq!(store.count_repos().unwrap(), 0);
    assert_eq!(store.count_languages().unwrap(), 0);
    assert_eq!(store.count_commits().unwrap(), 0);
}

#[test]
fn second_run_fails_on_duplicate_ids_and_keeps_first_run() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());

    let data = vec![RepoData {
        repo: org_repo(7, "only", false),
        languages: BTreeMap::from([("C".to_string(), 42)]),
        initial_commit: Some(commit("c7")),
    }];

    mine::populate(&store, &data).expect("first run");
    assert!(mine::populate(&store, &data).is_err());

    assert_eq!(store.count_repos().unwrap(), 1);
    assert_eq!(store.count_languages().unwrap(), 1);
    assert_eq!(store.count_commits().unwrap(), 1);
}

#[test]
fn initialize_is_idempotent() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());
    store.initialize().expect("second initialize");
    assert_eq!(store.count_repos().unwrap(), 0);
}

#[test]
fn report_queries_split_by_visibility() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open_store(temp_dir.path());

    let data = vec![
        RepoData {
            repo: org_repo(1, "pub-rust", false),
            languages: BTreeMap::from([("Rust".to_string(), 100)]),
            initial_commit: Some(commit("a")),
        },
        RepoData {
            repo: org_repo(2, "priv-rust", true),
            languages: BTreeMap::from([("Rust".to_string(), 50), ("Shell".to_string(), 5)]),
            initial_commit: Some(commit("b")),
        },
    ];
    mine::populate(&store, &data).expect("populate");

    let usage = store.language_repo_counts().unwrap();
    let rust = usage.iter().find(|u| u.name == "Rust").expect("rust row");
    assert_eq!(rust.private_repos, 1);
    assert_eq!(rust.public_repos, 1);
    let shell = usage.iter().find(|u| u.name == "Shell").expect("shell row");
    assert_eq!(shell.private_repos, 1);
    assert_eq!(shell.public_repos, 0);

    // Both fixtures: committed 2014-05-02, pushed 2016-02-03 → ~642 days.
    let public_ages = store.repo_ages_days(false).unwrap();
    assert_eq!(public_ages.len(), 1);
    assert!((public_ages[0] - 642.0).abs() < 1.5);

    let private_ages = store.repo_ages_days(true).unwrap();
    assert_eq!(private_ages.len(), 1);
}
