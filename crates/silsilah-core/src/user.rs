//! Users and marriages — the two row types of the family graph.
//!
//! A user is either login-capable (it has a `username`) or a placeholder
//! created solely to stand for a named relative. A marriage pairs a husband
//! with a wife and is what a child's `parent_id` points at.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Row identifier shared by users and marriages.
pub type Id = i64;

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Stored as `gender_id`: `1` for male, `2` for female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// The numeric `gender_id` column value.
  pub fn id(self) -> i64 {
    match self {
      Self::Male => 1,
      Self::Female => 2,
    }
  }

  pub fn from_id(id: i64) -> Result<Self> {
    match id {
      1 => Ok(Self::Male),
      2 => Ok(Self::Female),
      other => Err(Error::UnknownGender(other.to_string())),
    }
  }

  /// Parse the `gender_id` as submitted by a form (`"1"` or `"2"`).
  pub fn from_field(raw: &str) -> Result<Self> {
    let raw = raw.trim();
    raw
      .parse::<i64>()
      .map_err(|_| Error::UnknownGender(raw.to_owned()))
      .and_then(Self::from_id)
  }

  pub fn opposite(self) -> Self {
    match self {
      Self::Male => Self::Female,
      Self::Female => Self::Male,
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Male => f.write_str("male"),
      Self::Female => f.write_str("female"),
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A person in the family graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         Id,
  /// Display name.
  pub nickname:   String,
  pub gender:     Gender,
  /// Always references a male user.
  pub father_id:  Option<Id>,
  /// Always references a female user.
  pub mother_id:  Option<Id>,
  /// The marriage that produced this user, when known.
  pub parent_id:  Option<Id>,
  /// `None` for placeholder users.
  pub username:   Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn is_placeholder(&self) -> bool { self.username.is_none() }
}

/// Input to [`crate::store::FamilyStore::register_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub nickname:      String,
  pub gender:        Gender,
  pub username:      Option<String>,
  /// argon2 PHC string; only meaningful together with `username`.
  pub password_hash: Option<String>,
}

impl NewUser {
  /// A user with no login credentials.
  pub fn placeholder(nickname: impl Into<String>, gender: Gender) -> Self {
    Self {
      nickname: nickname.into(),
      gender,
      username: None,
      password_hash: None,
    }
  }

  pub fn with_login(
    nickname: impl Into<String>,
    gender: Gender,
    username: impl Into<String>,
    password_hash: impl Into<String>,
  ) -> Self {
    Self {
      nickname:      nickname.into(),
      gender,
      username:      Some(username.into()),
      password_hash: Some(password_hash.into()),
    }
  }
}

/// The stored login of a user, as needed to verify a password.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user_id:       Id,
  pub password_hash: String,
}

// ─── Marriage ────────────────────────────────────────────────────────────────

/// A row of the `couples` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marriage {
  pub id:         Id,
  pub husband_id: Id,
  pub wife_id:    Id,
  pub created_at: DateTime<Utc>,
}

impl Marriage {
  pub fn involves(&self, user_id: Id) -> bool {
    self.husband_id == user_id || self.wife_id == user_id
  }

  /// The other party of the marriage, if `user_id` is one of the two.
  pub fn partner_of(&self, user_id: Id) -> Option<Id> {
    if self.husband_id == user_id {
      Some(self.wife_id)
    } else if self.wife_id == user_id {
      Some(self.husband_id)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gender_ids_match_column_values() {
    assert_eq!(Gender::Male.id(), 1);
    assert_eq!(Gender::Female.id(), 2);
    assert_eq!(Gender::from_id(2).unwrap(), Gender::Female);
    assert!(matches!(Gender::from_id(3), Err(Error::UnknownGender(_))));
  }

  #[test]
  fn gender_from_form_field() {
    assert_eq!(Gender::from_field(" 1 ").unwrap(), Gender::Male);
    assert!(matches!(
      Gender::from_field("male"),
      Err(Error::UnknownGender(s)) if s == "male"
    ));
  }

  #[test]
  fn gender_serialises_lowercase() {
    assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
  }

  #[test]
  fn marriage_partner_lookup() {
    let m = Marriage {
      id:         7,
      husband_id: 1,
      wife_id:    2,
      created_at: Utc::now(),
    };
    assert_eq!(m.partner_of(1), Some(2));
    assert_eq!(m.partner_of(2), Some(1));
    assert_eq!(m.partner_of(3), None);
    assert!(!m.involves(3));
  }
}
