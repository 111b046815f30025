//! Error type for `outbreak-store-sqlite`.

use rusqlite::ffi;
use thiserror::Error;

use outbreak_core::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] outbreak_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl StoreError for Error {
  fn domain(&self) -> Option<&outbreak_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      Self::Database(_) => None,
    }
  }

  fn is_unique_violation(&self) -> bool {
    match self {
      Self::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => matches!(
        e.extended_code,
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
      ),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
