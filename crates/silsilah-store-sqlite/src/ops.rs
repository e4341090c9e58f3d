//! Synchronous statements run on the `tokio-rusqlite` thread.
//!
//! Every function takes a plain [`Connection`]; mutating callers pass the
//! current transaction, which derefs to one.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, params};
use silsilah_core::{
  Error as FamilyError,
  input::{NewChild, Relative},
  profile::{FamilyProfile, Spouse},
  user::{Credentials, Gender, Id, Marriage, NewUser, User},
};

use crate::{
  Result,
  encode::{
    MARRIAGE_COLUMNS, RawMarriage, RawUser, USER_COLUMNS, encode_dt,
    encode_gender,
  },
};

/// Parent references written together with a new user row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lineage {
  pub father_id: Option<Id>,
  pub mother_id: Option<Id>,
  pub parent_id: Option<Id>,
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn find_user(conn: &Connection, id: Id) -> Result<Option<User>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      params![id],
      RawUser::from_row,
    )
    .optional()?
    .map(RawUser::into_user)
    .transpose()
}

pub fn require_user(conn: &Connection, id: Id) -> Result<User> {
  find_user(conn, id)?.ok_or_else(|| FamilyError::UserNotFound(id).into())
}

pub fn list_users(conn: &Connection, gender: Option<Gender>) -> Result<Vec<User>> {
  let gender_id = gender.map(encode_gender);
  let mut stmt = conn.prepare(&format!(
    "SELECT {USER_COLUMNS} FROM users
     WHERE ?1 IS NULL OR gender_id = ?1
     ORDER BY id"
  ))?;
  let raws = stmt
    .query_map(params![gender_id], RawUser::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawUser::into_user).collect()
}

pub fn insert_user(
  conn: &Connection,
  input: &NewUser,
  lineage: Lineage,
) -> Result<User> {
  let now = Utc::now();
  let at_str = encode_dt(now);

  conn.execute(
    "INSERT INTO users (
       nickname, gender_id, father_id, mother_id, parent_id,
       username, password_hash, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    params![
      input.nickname,
      encode_gender(input.gender),
      lineage.father_id,
      lineage.mother_id,
      lineage.parent_id,
      input.username,
      input.password_hash,
      at_str,
    ],
  )?;

  Ok(User {
    id:         conn.last_insert_rowid(),
    nickname:   input.nickname.clone(),
    gender:     input.gender,
    father_id:  lineage.father_id,
    mother_id:  lineage.mother_id,
    parent_id:  lineage.parent_id,
    username:   input.username.clone(),
    created_at: now,
    updated_at: now,
  })
}

pub fn credentials(conn: &Connection, username: &str) -> Result<Option<Credentials>> {
  Ok(
    conn
      .query_row(
        "SELECT id, password_hash FROM users
         WHERE username = ?1 AND password_hash IS NOT NULL",
        params![username],
        |row| {
          Ok(Credentials {
            user_id:       row.get(0)?,
            password_hash: row.get(1)?,
          })
        },
      )
      .optional()?,
  )
}

/// Resolve a [`Relative`] to a user of the required gender, creating a
/// placeholder for [`Relative::New`].
fn resolve_relative(
  conn: &Connection,
  acting: &User,
  relative: Relative,
  gender: Gender,
) -> Result<User> {
  match relative {
    Relative::Existing(id) if id == acting.id => {
      Err(FamilyError::SelfReference.into())
    }
    Relative::Existing(id) => {
      let user = require_user(conn, id)?;
      if user.gender != gender {
        return Err(
          FamilyError::GenderMismatch { user_id: id, expected: gender }.into(),
        );
      }
      Ok(user)
    }
    Relative::New(nickname) => insert_user(
      conn,
      &NewUser::placeholder(nickname, gender),
      Lineage::default(),
    ),
  }
}

// ─── Parents ─────────────────────────────────────────────────────────────────

/// Set `father_id` (for [`Gender::Male`]) or `mother_id` (for
/// [`Gender::Female`]) of the acting user.
pub fn set_parent(
  conn: &Connection,
  acting_user_id: Id,
  relative: Relative,
  gender: Gender,
) -> Result<User> {
  let acting = require_user(conn, acting_user_id)?;
  let parent = resolve_relative(conn, &acting, relative, gender)?;

  let (column, current) = match gender {
    Gender::Male => ("father_id", acting.father_id),
    Gender::Female => ("mother_id", acting.mother_id),
  };

  // Relinking the same parent leaves the row untouched, `updated_at`
  // included.
  if current == Some(parent.id) {
    return Ok(acting);
  }

  // A marriage no longer matching the new parent stops being the user's
  // origin.
  let parent_id = match acting.parent_id {
    Some(marriage_id) => find_marriage(conn, marriage_id)?.and_then(|m| {
      let side = match gender {
        Gender::Male => m.husband_id,
        Gender::Female => m.wife_id,
      };
      (side == parent.id).then_some(m.id)
    }),
    None => None,
  };

  conn.execute(
    &format!(
      "UPDATE users SET {column} = ?1, parent_id = ?2, updated_at = ?3
       WHERE id = ?4"
    ),
    params![parent.id, parent_id, encode_dt(Utc::now()), acting.id],
  )?;

  require_user(conn, acting.id)
}

// ─── Spouses ─────────────────────────────────────────────────────────────────

pub fn find_marriage(conn: &Connection, id: Id) -> Result<Option<Marriage>> {
  conn
    .query_row(
      &format!("SELECT {MARRIAGE_COLUMNS} FROM couples WHERE id = ?1"),
      params![id],
      RawMarriage::from_row,
    )
    .optional()?
    .map(RawMarriage::into_marriage)
    .transpose()
}

fn find_couple(conn: &Connection, husband_id: Id, wife_id: Id) -> Result<Option<Marriage>> {
  conn
    .query_row(
      &format!(
        "SELECT {MARRIAGE_COLUMNS} FROM couples
         WHERE husband_id = ?1 AND wife_id = ?2"
      ),
      params![husband_id, wife_id],
      RawMarriage::from_row,
    )
    .optional()?
    .map(RawMarriage::into_marriage)
    .transpose()
}

pub fn marriages_of(conn: &Connection, user_id: Id) -> Result<Vec<Marriage>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {MARRIAGE_COLUMNS} FROM couples
     WHERE husband_id = ?1 OR wife_id = ?1
     ORDER BY id"
  ))?;
  let raws = stmt
    .query_map(params![user_id], RawMarriage::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawMarriage::into_marriage).collect()
}

/// Marry the acting user, who must be of `acting_gender`, to a relative of
/// the opposite gender. An existing marriage of the same pair is returned
/// as-is.
pub fn set_spouse(
  conn: &Connection,
  acting_user_id: Id,
  relative: Relative,
  acting_gender: Gender,
) -> Result<Marriage> {
  let acting = require_user(conn, acting_user_id)?;
  if acting.gender != acting_gender {
    return Err(FamilyError::ActingGender { expected: acting_gender }.into());
  }

  let spouse = resolve_relative(conn, &acting, relative, acting_gender.opposite())?;
  let (husband_id, wife_id) = match acting_gender {
    Gender::Male => (acting.id, spouse.id),
    Gender::Female => (spouse.id, acting.id),
  };

  if let Some(existing) = find_couple(conn, husband_id, wife_id)? {
    return Ok(existing);
  }

  let now = Utc::now();
  conn.execute(
    "INSERT INTO couples (husband_id, wife_id, created_at) VALUES (?1, ?2, ?3)",
    params![husband_id, wife_id, encode_dt(now)],
  )?;

  Ok(Marriage {
    id: conn.last_insert_rowid(),
    husband_id,
    wife_id,
    created_at: now,
  })
}

// ─── Children ────────────────────────────────────────────────────────────────

pub fn add_child(conn: &Connection, acting_user_id: Id, child: NewChild) -> Result<User> {
  let acting = require_user(conn, acting_user_id)?;

  let lineage = match child.marriage_id {
    // Without a marriage the acting user is the father.
    None if acting.gender == Gender::Male => Lineage {
      father_id: Some(acting.id),
      ..Lineage::default()
    },
    None => return Err(FamilyError::MarriageRequired.into()),
    Some(marriage_id) => {
      let marriage = find_marriage(conn, marriage_id)?
        .ok_or(FamilyError::MarriageNotFound(marriage_id))?;
      if !marriage.involves(acting.id) {
        return Err(
          FamilyError::NotPartOfMarriage { marriage_id, user_id: acting.id }
            .into(),
        );
      }
      Lineage {
        father_id: Some(marriage.husband_id),
        mother_id: Some(marriage.wife_id),
        parent_id: Some(marriage.id),
      }
    }
  };

  insert_user(
    conn,
    &NewUser::placeholder(child.nickname, child.gender),
    lineage,
  )
}

// ─── Profile ─────────────────────────────────────────────────────────────────

fn children_of(conn: &Connection, user_id: Id) -> Result<Vec<User>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {USER_COLUMNS} FROM users
     WHERE father_id = ?1 OR mother_id = ?1
     ORDER BY id"
  ))?;
  let raws = stmt
    .query_map(params![user_id], RawUser::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawUser::into_user).collect()
}

pub fn profile(conn: &Connection, user_id: Id) -> Result<Option<FamilyProfile>> {
  let Some(user) = find_user(conn, user_id)? else {
    return Ok(None);
  };

  let father = user.father_id.map(|id| require_user(conn, id)).transpose()?;
  let mother = user.mother_id.map(|id| require_user(conn, id)).transpose()?;

  let spouses = marriages_of(conn, user_id)?
    .into_iter()
    .filter_map(|marriage| {
      marriage.partner_of(user_id).map(|partner_id| {
        require_user(conn, partner_id).map(|partner| Spouse { marriage, partner })
      })
    })
    .collect::<Result<Vec<_>>>()?;

  let children = children_of(conn, user_id)?;

  Ok(Some(FamilyProfile { user, father, mother, spouses, children }))
}
