use thiserror::Error;

/// Why a credential was refused or could not be produced.
///
/// Only the interceptor and the service itself see these variants; callers
/// outside the process get a single, uniform "unauthorized" answer.
#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("credential has expired")]
  Expired,

  #[error("credential signature does not match")]
  InvalidSignature,

  #[error("credential is malformed")]
  Malformed,

  #[error("signing secret must be at least {min} bytes, got {actual}")]
  WeakSecret { min: usize, actual: usize },

  #[error("credential lifetime must be positive, got {0}")]
  NonPositiveTtl(chrono::Duration),

  #[error("credential lifetime is out of range")]
  TtlOutOfRange,

  #[error("failed to sign credential: {0}")]
  Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum VaultError {
  #[error("password hashing failed: {0}")]
  Hash(String),
}

/// The principal's role is not in the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("role not permitted for this operation")]
pub struct Forbidden;

impl From<Forbidden> for gatehouse_core::Error {
  fn from(_: Forbidden) -> Self { gatehouse_core::Error::Forbidden }
}

impl From<VaultError> for gatehouse_core::Error {
  fn from(e: VaultError) -> Self { gatehouse_core::Error::internal(e) }
}
