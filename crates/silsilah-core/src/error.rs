//! Error types for `silsilah-core`.
//!
//! Every variant is either a *not found* condition (a referenced row does not
//! exist) or a *validation* condition (the request is malformed or would break
//! a gender/relationship invariant). Both reject the whole operation.

use thiserror::Error;

use crate::user::{Gender, Id};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Id),

  #[error("marriage not found: {0}")]
  MarriageNotFound(Id),

  #[error("user {user_id} must be {expected}")]
  GenderMismatch { user_id: Id, expected: Gender },

  #[error("only a {expected} user can do this")]
  ActingGender { expected: Gender },

  #[error("a name is required when no existing user is picked")]
  MissingName,

  #[error("malformed id: {0:?}")]
  MalformedId(String),

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("a user cannot be their own relative")]
  SelfReference,

  #[error("marriage {marriage_id} does not involve user {user_id}")]
  NotPartOfMarriage { marriage_id: Id, user_id: Id },

  #[error("a marriage must be picked to add a child")]
  MarriageRequired,
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::UserNotFound(_) | Self::MarriageNotFound(_))
  }

  pub fn is_validation(&self) -> bool { !self.is_not_found() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by store backends' error types so higher layers can tell a
/// rejected operation apart from an infrastructure failure.
pub trait StoreError: std::error::Error {
  /// The domain error behind this failure, if it is one.
  fn as_family(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn as_family(&self) -> Option<&Error> { Some(self) }
}
