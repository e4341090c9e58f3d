//! The materialised family view of one user.
//!
//! Never stored; assembled on read from the `users` and `couples` tables.

use serde::{Deserialize, Serialize};

use crate::user::{Id, Marriage, User};

/// A marriage seen from one side, with the other party resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spouse {
  pub marriage: Marriage,
  pub partner:  User,
}

/// The computed read model behind the profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyProfile {
  pub user:     User,
  pub father:   Option<User>,
  pub mother:   Option<User>,
  /// Wives of a male user, husbands of a female one; oldest marriage first.
  pub spouses:  Vec<Spouse>,
  /// Every user whose father or mother is `user`, ordered by id.
  pub children: Vec<User>,
}

impl FamilyProfile {
  /// Children born of the given marriage.
  pub fn children_of(&self, marriage_id: Id) -> impl Iterator<Item = &User> {
    self
      .children
      .iter()
      .filter(move |c| c.parent_id == Some(marriage_id))
  }
}
