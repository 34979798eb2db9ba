pub const SCHEMA: &str = r#"
-- Repositories, keyed by the remote system's identifier
CREATE TABLE IF NOT EXISTS repos (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    fork INTEGER NOT NULL DEFAULT 0,
    forks_count INTEGER NOT NULL DEFAULT 0,
    has_downloads INTEGER NOT NULL DEFAULT 0,
    has_issues INTEGER NOT NULL DEFAULT 0,
    has_wiki INTEGER NOT NULL DEFAULT 0,
    html_url TEXT NOT NULL,
    open_issues_count INTEGER NOT NULL DEFAULT 0,
    private INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    pushed_at TEXT,              -- NULL for never-pushed repos
    updated_at TEXT NOT NULL,
    size INTEGER NOT NULL DEFAULT 0,
    stargazers_count INTEGER NOT NULL DEFAULT 0,
    url TEXT NOT NULL,
    watchers_count INTEGER NOT NULL DEFAULT 0
);

-- Language breakdown: one row per (repo, language) pair
CREATE TABLE IF NOT EXISTS languages (
    repo_id INTEGER NOT NULL REFERENCES repos(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    size_in_bytes INTEGER NOT NULL DEFAULT 0
);

-- Initial commits: at most one row per repo, by construction
CREATE TABLE IF NOT EXISTS commits (
    repo_id INTEGER NOT NULL REFERENCES repos(id) ON DELETE CASCADE,
    sha TEXT,
    message TEXT,
    committed_by TEXT NOT NULL,
    committed_at TEXT NOT NULL
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_languages_repo ON languages(repo_id);
CREATE INDEX IF NOT EXISTS idx_languages_name ON languages(name);
CREATE INDEX IF NOT EXISTS idx_commits_repo ON commits(repo_id);
"#;
