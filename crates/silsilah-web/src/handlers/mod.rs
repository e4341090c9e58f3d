pub mod forms;
pub mod read;

use axum::response::Redirect;

/// Where every successful form submission lands.
pub(crate) const PROFILE_PATH: &str = "/profile";

pub(crate) fn back_to_profile() -> Redirect { Redirect::to(PROFILE_PATH) }
