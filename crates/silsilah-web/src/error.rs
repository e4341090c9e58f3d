//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  extract::rejection::{FormRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use silsilah_core::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("invalid input: {0}")]
  Validation(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Classify a backend error: rejected operations keep their domain meaning,
  /// everything else is an internal failure.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreError + Send + Sync + 'static,
  {
    match e.as_family() {
      Some(family) => family.clone().into(),
      None => Error::Store(Box::new(e)),
    }
  }
}

impl From<silsilah_core::Error> for Error {
  fn from(e: silsilah_core::Error) -> Self {
    if e.is_not_found() {
      Error::NotFound(e.to_string())
    } else {
      Error::Validation(e.to_string())
    }
  }
}

// Malformed requests turned away by the extractors are validation failures
// like any other bad input.

impl From<FormRejection> for Error {
  fn from(r: FormRejection) -> Self { Error::Validation(r.body_text()) }
}

impl From<QueryRejection> for Error {
  fn from(r: QueryRejection) -> Self { Error::Validation(r.body_text()) }
}

impl From<PathRejection> for Error {
  fn from(r: PathRejection) -> Self { Error::Validation(r.body_text()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"silsilah\""),
      );
    }
    res
  }
}
