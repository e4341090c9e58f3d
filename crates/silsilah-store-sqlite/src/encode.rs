//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, genders as their numeric
//! `gender_id`, ids as SQLite integers.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use silsilah_core::user::{Gender, Id, Marriage, User};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> i64 { g.id() }

pub fn decode_gender(id: i64) -> Result<Gender> { Ok(Gender::from_id(id)?) }

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, nickname, gender_id, father_id, mother_id, \
                                parent_id, username, created_at, updated_at";

/// Column list matching [`RawMarriage::from_row`].
pub const MARRIAGE_COLUMNS: &str = "id, husband_id, wife_id, created_at";

/// A `users` row as read from SQLite, before decoding.
pub struct RawUser {
  pub id:         Id,
  pub nickname:   String,
  pub gender_id:  i64,
  pub father_id:  Option<Id>,
  pub mother_id:  Option<Id>,
  pub parent_id:  Option<Id>,
  pub username:   Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      nickname:   row.get(1)?,
      gender_id:  row.get(2)?,
      father_id:  row.get(3)?,
      mother_id:  row.get(4)?,
      parent_id:  row.get(5)?,
      username:   row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         self.id,
      nickname:   self.nickname,
      gender:     decode_gender(self.gender_id)?,
      father_id:  self.father_id,
      mother_id:  self.mother_id,
      parent_id:  self.parent_id,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `couples` row as read from SQLite, before decoding.
pub struct RawMarriage {
  pub id:         Id,
  pub husband_id: Id,
  pub wife_id:    Id,
  pub created_at: String,
}

impl RawMarriage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      husband_id: row.get(1)?,
      wife_id:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_marriage(self) -> Result<Marriage> {
    Ok(Marriage {
      id:         self.id,
      husband_id: self.husband_id,
      wife_id:    self.wife_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
