//! SQL schema for the Silsilah SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname      TEXT    NOT NULL,
    gender_id     INTEGER NOT NULL CHECK (gender_id IN (1, 2)), -- 1 male, 2 female
    father_id     INTEGER REFERENCES users(id),
    mother_id     INTEGER REFERENCES users(id),
    parent_id     INTEGER REFERENCES couples(id),
    username      TEXT    UNIQUE,  -- NULL for placeholder users
    password_hash TEXT,            -- argon2 PHC string
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL,
    CHECK (father_id IS NULL OR father_id != id),
    CHECK (mother_id IS NULL OR mother_id != id)
);

-- Marriages. Rows are never deleted.
CREATE TABLE IF NOT EXISTS couples (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    husband_id  INTEGER NOT NULL REFERENCES users(id),
    wife_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT    NOT NULL,
    UNIQUE (husband_id, wife_id),
    CHECK  (husband_id != wife_id)
);

CREATE INDEX IF NOT EXISTS users_father_idx  ON users(father_id);
CREATE INDEX IF NOT EXISTS users_mother_idx  ON users(mother_id);
CREATE INDEX IF NOT EXISTS couples_wife_idx  ON couples(wife_id);

PRAGMA user_version = 1;
";
