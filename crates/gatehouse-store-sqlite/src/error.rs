//! Error type for `gatehouse-store-sqlite`.

use gatehouse_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("email is already registered")]
  EmailTaken,

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown role in database: {0:?}")]
  UnknownRole(String),
}

impl Error {
  /// Classify a failed write to `users`. The only UNIQUE column there is
  /// `email`.
  pub(crate) fn from_identity_write(e: tokio_rusqlite::Error) -> Self {
    match &e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _))
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
      {
        Error::EmailTaken
      }
      _ => Error::Database(e),
    }
  }
}

impl StoreError for Error {
  fn is_email_taken(&self) -> bool { matches!(self, Error::EmailTaken) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
