//! JSON read endpoints backing the profile page and its pickers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile` | Acting user's [`FamilyProfile`] |
//! | `GET`  | `/profile/marriages` | Options for `add_child_parent_id` |
//! | `GET`  | `/users` | Optional `?gender=male\|female` |
//! | `GET`  | `/users/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use serde::Deserialize;
use silsilah_core::{
  profile::FamilyProfile,
  store::FamilyStore,
  user::{Gender, Id, Marriage, User},
};

use crate::{AppState, auth::ActingUser, error::Error};

/// `GET /profile`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
) -> Result<Json<FamilyProfile>, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  load_profile(&state, user_id).await.map(Json)
}

/// `GET /profile/marriages`
pub async fn marriages<S>(
  State(state): State<AppState<S>>,
  ActingUser(user_id): ActingUser,
) -> Result<Json<Vec<Marriage>>, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let marriages = state
    .store
    .marriages_of(user_id)
    .await
    .map_err(Error::from_store)?;
  Ok(Json(marriages))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub gender: Option<Gender>,
}

/// `GET /users[?gender=<gender>]`
pub async fn list_users<S>(
  State(state): State<AppState<S>>,
  _acting: ActingUser,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<User>>, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Query(params) = params?;
  let users = state
    .store
    .list_users(params.gender)
    .await
    .map_err(Error::from_store)?;
  Ok(Json(users))
}

/// `GET /users/{id}`
pub async fn user_profile<S>(
  State(state): State<AppState<S>>,
  _acting: ActingUser,
  id: Result<Path<Id>, PathRejection>,
) -> Result<Json<FamilyProfile>, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  let Path(id) = id?;
  load_profile(&state, id).await.map(Json)
}

async fn load_profile<S>(state: &AppState<S>, user_id: Id) -> Result<FamilyProfile, Error>
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .profile(user_id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| Error::NotFound(format!("user {user_id} not found")))
}
