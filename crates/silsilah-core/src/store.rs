//! The `FamilyStore` trait.
//!
//! Implemented by storage backends (e.g. `silsilah-store-sqlite`). The web
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  error::StoreError,
  input::{NewChild, Relative},
  profile::FamilyProfile,
  user::{Credentials, Gender, Id, Marriage, NewUser, User},
};

/// Abstraction over a family graph backend.
///
/// Every mutating method is scoped to an explicit acting user and is atomic:
/// when it returns an error, nothing it would have written is visible.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: StoreError + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user, with or without login credentials.
  fn register_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// List users ordered by id, optionally restricted to one gender.
  fn list_users(
    &self,
    gender: Option<Gender>,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Look up the stored password hash for a login name.
  fn credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Parents ───────────────────────────────────────────────────────────

  /// Point the acting user's `father_id` at an existing or new male user.
  /// Returns the updated acting user.
  fn set_father(
    &self,
    acting_user_id: Id,
    father: Relative,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Point the acting user's `mother_id` at an existing or new female user.
  /// Returns the updated acting user.
  fn set_mother(
    &self,
    acting_user_id: Id,
    mother: Relative,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Spouses ───────────────────────────────────────────────────────────

  /// Marry a male acting user to an existing or new female user.
  ///
  /// Linking a pair that is already married returns the existing marriage.
  fn set_wife(
    &self,
    acting_user_id: Id,
    wife: Relative,
  ) -> impl Future<Output = Result<Marriage, Self::Error>> + Send + '_;

  /// Marry a female acting user to an existing or new male user.
  fn set_husband(
    &self,
    acting_user_id: Id,
    husband: Relative,
  ) -> impl Future<Output = Result<Marriage, Self::Error>> + Send + '_;

  // ── Children ──────────────────────────────────────────────────────────

  /// Create a child of the acting user, optionally attributed to one of the
  /// acting user's marriages. Returns the new child.
  fn add_child(
    &self,
    acting_user_id: Id,
    child: NewChild,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a marriage by id. Returns `None` if not found.
  fn get_marriage(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Marriage>, Self::Error>> + Send + '_;

  /// All marriages the user is part of, oldest first.
  fn marriages_of(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Vec<Marriage>, Self::Error>> + Send + '_;

  /// Materialise a [`FamilyProfile`]. Returns `None` if the user does not
  /// exist.
  fn profile(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Option<FamilyProfile>, Self::Error>> + Send + '_;
}
