use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Transaction, params, params_from_iter};

use super::schema::SCHEMA;
use super::{LanguageUsage, Store};
use crate::error::{Error, Result};
use crate::types::{InitialCommit, Language, Repo, RowBatch};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// "(?,?,...),(?,?,...)" for `rows` rows of `cols` columns each.
fn values_clause(rows: usize, cols: usize) -> String {
    let row = format!("({})", vec!["?"; cols].join(", "));
    vec![row; rows].join(", ")
}

fn insert_repos(tx: &Transaction, rows: &[Repo]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "INSERT INTO repos (id, name, description, fork, forks_count, has_downloads,
            has_issues, has_wiki, html_url, open_issues_count, private, created_at,
            pushed_at, updated_at, size, stargazers_count, url, watchers_count)
         VALUES {}",
        values_clause(rows.len(), 18)
    );

    let mut values: Vec<Value> = Vec::with_capacity(rows.len() * 18);
    for repo in rows {
        values.push(Value::from(repo.id));
        values.push(Value::from(repo.name.clone()));
        values.push(Value::from(repo.description.clone()));
        values.push(Value::from(repo.fork));
        values.push(Value::from(repo.forks_count));
        values.push(Value::from(repo.has_downloads));
        values.push(Value::from(repo.has_issues));
        values.push(Value::from(repo.has_wiki));
        values.push(Value::from(repo.html_url.clone()));
        values.push(Value::from(repo.open_issues_count));
        values.push(Value::from(repo.private));
        values.push(Value::from(format_datetime(&repo.created_at)));
        values.push(Value::from(repo.pushed_at.as_ref().map(format_datetime)));
        values.push(Value::from(format_datetime(&repo.updated_at)));
        values.push(Value::from(repo.size));
        values.push(Value::from(repo.stargazers_count));
        values.push(Value::from(repo.url.clone()));
        values.push(Value::from(repo.watchers_count));
    }

    tx.execute(&sql, params_from_iter(values))?;
    Ok(())
}

fn insert_languages(tx: &Transaction, rows: &[Language]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "INSERT INTO languages (repo_id, name, size_in_bytes) VALUES {}",
        values_clause(rows.len(), 3)
    );

    let mut values: Vec<Value> = Vec::with_capacity(rows.len() * 3);
    for language in rows {
        values.push(Value::from(language.repo_id));
        values.push(Value::from(language.name.clone()));
        values.push(Value::from(language.size_in_bytes));
    }

    tx.execute(&sql, params_from_iter(values))?;
    Ok(())
}

fn insert_commits(tx: &Transaction, rows: &[InitialCommit]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "INSERT INTO commits (repo_id, sha, message, committed_by, committed_at) VALUES {}",
        values_clause(rows.len(), 5)
    );

    let mut values: Vec<Value> = Vec::with_capacity(rows.len() * 5);
    for commit in rows {
        values.push(Value::from(commit.repo_id));
        values.push(Value::from(commit.sha.clone()));
        values.push(Value::from(commit.message.clone()));
        values.push(Value::from(commit.committed_by.clone()));
        values.push(Value::from(format_datetime(&commit.committed_at)));
    }

    tx.execute(&sql, params_from_iter(values))?;
    Ok(())
}

fn repo_from_row(row: &rusqlite::Row) -> rusqlite::Result<Repo> {
    Ok(Repo {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        fork: row.get(3)?,
        forks_count: row.get(4)?,
        has_downloads: row.get(5)?,
        has_issues: row.get(6)?,
        has_wiki: row.get(7)?,
        html_url: row.get(8)?,
        open_issues_count: row.get(9)?,
        private: row.get(10)?,
        created_at: parse_datetime(&row.get::<_, String>(11)?),
        pushed_at: row
            .get::<_, Option<String>>(12)?
            .map(|s| parse_datetime(&s)),
        updated_at: parse_datetime(&row.get::<_, String>(13)?),
        size: row.get(14)?,
        stargazers_count: row.get(15)?,
        url: row.get(16)?,
        watchers_count: row.get(17)?,
    })
}

const REPO_COLUMNS: &str = "id, name, description, fork, forks_count, has_downloads, \
     has_issues, has_wiki, html_url, open_issues_count, private, created_at, \
     pushed_at, updated_at, size, stargazers_count, url, watchers_count";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn populate(&self, batches: &[RowBatch]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        for batch in batches {
            insert_repos(&tx, &batch.repos)?;
            insert_languages(&tx, &batch.languages)?;
            insert_commits(&tx, &batch.commits)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn count_repos(&self) -> Result<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM repos", [], |row| row.get(0))
            .map_err(Error::from)
    }

    fn count_languages(&self) -> Result<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM languages", [], |row| row.get(0))
            .map_err(Error::from)
    }

    fn count_commits(&self) -> Result<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM commits", [], |row| row.get(0))
            .map_err(Error::from)
    }

    fn get_repo(&self, id: i64) -> Result<Option<Repo>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {REPO_COLUMNS} FROM repos WHERE id = ?1"),
            params![id],
            repo_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_repo_languages(&self, repo_id: i64) -> Result<Vec<Language>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT repo_id, name, size_in_bytes FROM languages
             WHERE repo_id = ?1 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![repo_id], |row| {
            Ok(Language {
                repo_id: row.get(0)?,
                name: row.get(1)?,
                size_in_bytes: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_initial_commit(&self, repo_id: i64) -> Result<Option<InitialCommit>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT repo_id, sha, message, committed_by, committed_at
             FROM commits WHERE repo_id = ?1",
            params![repo_id],
            |row| {
                Ok(InitialCommit {
                    repo_id: row.get(0)?,
                    sha: row.get(1)?,
                    message: row.get(2)?,
                    committed_by: row.get(3)?,
                    committed_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn language_repo_counts(&self) -> Result<Vec<LanguageUsage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT l.name,
                    SUM(CASE WHEN r.private THEN 1 ELSE 0 END),
                    SUM(CASE WHEN r.private THEN 0 ELSE 1 END)
             FROM languages l
             JOIN repos r ON r.id = l.repo_id
             GROUP BY l.name
             ORDER BY l.name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(LanguageUsage {
                name: row.get(0)?,
                private_repos: row.get(1)?,
                public_repos: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn repo_ages_days(&self, private: bool) -> Result<Vec<f64>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT julianday(r.pushed_at) - julianday(c.committed_at)
             FROM repos r
             JOIN commits c ON c.repo_id = r.id
             WHERE r.private = ?1 AND r.pushed_at IS NOT NULL",
        )?;

        let rows = stmt.query_map(params![private], |row| row.get::<_, f64>(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
