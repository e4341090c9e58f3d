//! Error type for `silsilah-store-sqlite`.

use silsilah_core::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation was rejected; nothing was written.
  #[error(transparent)]
  Family(#[from] silsilah_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn as_family(&self) -> Option<&silsilah_core::Error> {
    match self {
      Self::Family(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
