//! HTTP layer for Silsilah.
//!
//! Exposes an axum [`Router`] serving the profile forms and JSON read
//! endpoints, backed by any [`FamilyStore`]. Every route requires HTTP Basic
//! credentials of a login-capable user, who becomes the acting user.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use silsilah_core::store::FamilyStore;
use tower_http::trace::TraceLayer;

use handlers::{forms, read};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: FamilyStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FamilyStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Profile page
    .route("/profile",           get(read::profile::<S>))
    .route("/profile/marriages", get(read::marriages::<S>))
    .route("/profile/father",    post(forms::set_father::<S>))
    .route("/profile/mother",    post(forms::set_mother::<S>))
    .route("/profile/wife",      post(forms::set_wife::<S>))
    .route("/profile/husband",   post(forms::set_husband::<S>))
    .route("/profile/children",  post(forms::add_child::<S>))
    // Pickers
    .route("/users",             get(read::list_users::<S>))
    .route("/users/{id}",        get(read::user_profile::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}


// ─── Integration tests ────────────────────────────────────────────────────────
