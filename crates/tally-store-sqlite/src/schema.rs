//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per (subject, category) pair; value only ever increases.
CREATE TABLE IF NOT EXISTS score_records (
    subject    TEXT NOT NULL,
    category   TEXT NOT NULL,
    value      INTEGER NOT NULL,
    updated_at TEXT NOT NULL,    -- ISO 8601 UTC; server-assigned
    PRIMARY KEY (subject, category)
);

-- History is strictly append-only.
-- No UPDATE is ever issued against this table; DELETE only via forget().
CREATE TABLE IF NOT EXISTS history_entries (
    subject        TEXT NOT NULL,
    category       TEXT NOT NULL,
    previous_value INTEGER,          -- NULL exactly for a pair's first entry
    new_value      INTEGER NOT NULL,
    delta          INTEGER NOT NULL,
    recorded_at    TEXT NOT NULL,    -- ISO 8601 UTC; server-assigned
    sequence       INTEGER NOT NULL, -- 1-based, dense per pair
    PRIMARY KEY (subject, category, sequence),
    CHECK (previous_value IS NULL OR new_value >= previous_value)
);

CREATE INDEX IF NOT EXISTS score_records_category_idx
    ON score_records(category);

PRAGMA user_version = 1;
";
