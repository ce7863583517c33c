use rusqlite::Connection;

/// Table layout applied when a database is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Disciplines, descriptors and saved observations (`riza.db`).
    Catalogue,
    /// Users and the activity log (`admin.db`).
    Admin,
}

const CATALOGUE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS disciplines (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS descriptors (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    discipline_id INTEGER NOT NULL REFERENCES disciplines(id),
    dimension     TEXT NOT NULL,
    process_verb  TEXT NOT NULL,
    level         TEXT NOT NULL,
    text          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_descriptors_discipline ON descriptors(discipline_id);

CREATE TABLE IF NOT EXISTS observations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student       TEXT,
    class_name    TEXT,
    discipline    TEXT,
    situation     TEXT,
    observation   TEXT,
    dimension     TEXT,
    process       TEXT,
    level         TEXT,
    descriptor_id INTEGER,
    created_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_observations_created ON observations(created_at);
"#;

const ADMIN_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_salt TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'teacher',
    status        TEXT NOT NULL DEFAULT 'active',
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER,
    user_name     TEXT,
    activity_type TEXT NOT NULL,
    details       TEXT,
    timestamp     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(activity_type);
CREATE INDEX IF NOT EXISTS idx_activities_timestamp ON activities(timestamp);
"#;

impl Schema {
    pub fn ddl(&self) -> &'static str {
        match self {
            Schema::Catalogue => CATALOGUE_DDL,
            Schema::Admin => ADMIN_DDL,
        }
    }

    /// Creates any missing tables and indexes.
    pub fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(self.ddl())
    }
}
