//! Error taxonomy shared by every Gatehouse operation.
//!
//! Each variant is a distinct, enumerable failure kind. The HTTP layer maps
//! them to external responses through a single table; nothing here decides
//! what a caller gets to see.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of record a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Identity,
  Post,
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resource::Identity => f.write_str("user"),
      Resource::Post => f.write_str("post"),
    }
  }
}

/// A single field-level problem, as carried in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("authorization header is missing")]
  MissingCredential,

  #[error("authorization header is malformed")]
  MalformedCredential,

  /// Bad signature, expired or unparsable token. The precise cause is
  /// logged where it is known and deliberately not carried further.
  #[error("credential rejected")]
  Unauthorized,

  #[error("role not permitted")]
  Forbidden,

  #[error("requester does not own the resource")]
  OwnershipRequired,

  #[error("{0} not found")]
  NotFound(Resource),

  #[error("email already exists")]
  EmailAlreadyExists,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("old password is incorrect")]
  OldPasswordIncorrect,

  #[error("validation failed ({} field error(s))", .0.len())]
  ValidationFailed(Vec<FieldError>),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store or infrastructure failure.
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Internal(Box::new(e))
  }

  /// A validation failure on a single field.
  pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
    Error::ValidationFailed(vec![FieldError::new(field, message)])
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
