//! Form handlers for the profile page.
//!
//! | Method | Path | Fields |
//! |--------|------|--------|
//! | `POST` | `/profile/father` | `set_father`, `set_father_id` |
//! | `POST` | `/profile/mother` | `set_mother`, `set_mother_id` |
//! | `POST` | `/profile/wife` | `set_wife`, `set_wife_id` |
//! | `POST` | `/profile/husband` | `set_husband`, `set_husband_id` |
//! | `POST` | `/profile/children` | `add_child_name`, `add_child_gender_id`, `add_child_parent_id` |
//!
//! Every field arrives as an optional string; blank means "not given". On
//! success each handler answers `303 See Other` back to `/profile`.

use axum::{
  extract::{Form, State, rejection::FormRejection},
  response::Redirect,
};
use serde::Deserialize;
use silsilah_core::{
  input::{NewChild, Relative},
  store::FamilyStore,
};

use crate::{
  AppState,
  auth::ActingUser,
  error::Error,
  handlers::back_to_profile,
};

// ─── Father ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FatherForm {
  pub set_father:    Option<String>,
  pub set_father_id: Option<String>,
}

/// `POST /profile/father`
pub async fn set_father<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  form: Result<Form<FatherForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Form(form) = form?;
  let father =
    Relative::from_fields(form.set_father.as_deref(), form.set_father_id.as_deref())?;
  let user = state
    .store
    .set_father(user_id, father)
    .await
    .map_err(Error::from_store)?;
  tracing::info!(user_id, father_id = ?user.father_id, "father updated");
  Ok(back_to_profile())
}

// ─── Mother ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MotherForm {
  pub set_mother:    Option<String>,
  pub set_mother_id: Option<String>,
}

/// `POST /profile/mother`
pub async fn set_mother<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  form: Result<Form<MotherForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Form(form) = form?;
  let mother =
    Relative::from_fields(form.set_mother.as_deref(), form.set_mother_id.as_deref())?;
  let user = state
    .store
    .set_mother(user_id, mother)
    .await
    .map_err(Error::from_store)?;
  tracing::info!(user_id, mother_id = ?user.mother_id, "mother updated");
  Ok(back_to_profile())
}

// ─── Wife ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WifeForm {
  pub set_wife:    Option<String>,
  pub set_wife_id: Option<String>,
}

/// `POST /profile/wife` — acting user must be male.
pub async fn set_wife<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  form: Result<Form<WifeForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Form(form) = form?;
  let wife = Relative::from_fields(form.set_wife.as_deref(), form.set_wife_id.as_deref())?;
  let marriage = state
    .store
    .set_wife(user_id, wife)
    .await
    .map_err(Error::from_store)?;
  tracing::info!(user_id, marriage_id = marriage.id, wife_id = marriage.wife_id, "wife set");
  Ok(back_to_profile())
}

// ─── Husband ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HusbandForm {
  pub set_husband:    Option<String>,
  pub set_husband_id: Option<String>,
}

/// `POST /profile/husband` — acting user must be female.
pub async fn set_husband<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  form: Result<Form<HusbandForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Form(form) = form?;
  let husband =
    Relative::from_fields(form.set_husband.as_deref(), form.set_husband_id.as_deref())?;
  let marriage = state
    .store
    .set_husband(user_id, husband)
    .await
    .map_err(Error::from_store)?;
  tracing::info!(
    user_id,
    marriage_id = marriage.id,
    husband_id = marriage.husband_id,
    "husband set"
  );
  Ok(back_to_profile())
}

// ─── Children ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChildForm {
  pub add_child_name:      Option<String>,
  pub add_child_gender_id: Option<String>,
  /// Marriage id; blank attributes the child to the acting user alone.
  pub add_child_parent_id: Option<String>,
}

/// `POST /profile/children`
pub async fn add_child<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
  form: Result<Form<ChildForm>, FormRejection>,
) -> Result<Redirect, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Form(form) = form?;
  let child = NewChild::from_fields(
    form.add_child_name.as_deref(),
    form.add_child_gender_id.as_deref(),
    form.add_child_parent_id.as_deref(),
  )?;
  let child = state
    .store
    .add_child(user_id, child)
    .await
    .map_err(Error::from_store)?;
  tracing::info!(user_id, child_id = child.id, parent_id = ?child.parent_id, "child added");
  Ok(back_to_profile())
}
