//! HTTP Basic-auth extractor resolving the acting user.
//!
//! Login-capable users carry a username and an argon2 PHC hash in the
//! `users` table; placeholder users can never authenticate.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use silsilah_core::{store::FamilyStore, user::Id};

use crate::{AppState, error::Error};

/// The authenticated user on whose profile a request operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Id);

/// Produce the argon2 PHC string stored in `users.password_hash`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Verify Basic credentials against the store and return the user id.
pub async fn verify_auth<S>(headers: &HeaderMap, store: &S) -> Result<Id, Error>
where
  S: FamilyStore,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let stored = store
    .credentials(username)
    .await
    .map_err(Error::from_store)?
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&stored.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(stored.user_id)
}

impl<S> FromRequestParts<AppState<S>> for ActingUser
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user_id = verify_auth(&parts.headers, state.store.as_ref()).await?;
    Ok(ActingUser(user_id))
  }
}
