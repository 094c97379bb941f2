//! SQLite schema for the faculty registry

use crate::guard::IntegrityGuard;

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Get the table definitions
    pub fn create_tables() -> &'static str {
        r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- People (AUTOINCREMENT: ids are never reused)
CREATE TABLE IF NOT EXISTS person (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    surname TEXT NOT NULL,
    type TEXT NOT NULL
        CHECK (type IN ('student', 'phd_candidate', 'lecturer', 'other'))
);

-- Publications
CREATE TABLE IF NOT EXISTS publication (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    place TEXT NOT NULL,
    type TEXT NOT NULL
        CHECK (type IN ('book', 'article', 'report', 'thesis', 'other'))
);

-- Authorship (many-to-many person <-> publication)
CREATE TABLE IF NOT EXISTS authorship (
    person_id INTEGER NOT NULL REFERENCES person(id),
    publication_id INTEGER NOT NULL REFERENCES publication(id),
    PRIMARY KEY (person_id, publication_id)
);

CREATE INDEX IF NOT EXISTS idx_authorship_publication ON authorship(publication_id);
"#
    }

    /// Full schema: tables followed by the authorship guard triggers
    pub fn create_all() -> String {
        format!("{}\n{}", Self::create_tables(), IntegrityGuard::triggers())
    }

    /// Get migration SQL between versions
    pub fn migration(_from: u32, _to: u32) -> Option<&'static str> {
        // Only version 1 exists
        None
    }
}
