//! Stateless bearer credentials (HS256 JWTs).
//!
//! A credential asserts `{subject, email, role}` until its expiry and is
//! never stored server-side. Expiry is checked here rather than by
//! `jsonwebtoken` so that `now == exp` is already expired and there is no
//! leeway window.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use gatehouse_core::{AuthenticatedPrincipal, IdentityId, Role};

use crate::{MIN_SECRET_LEN, error::CredentialError};

/// The signed claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:   i64,
  pub email: String,
  pub role:  Role,
  pub iat:   i64,
  pub exp:   i64,
}

impl From<Claims> for AuthenticatedPrincipal {
  fn from(claims: Claims) -> Self {
    AuthenticatedPrincipal {
      subject_id: IdentityId(claims.sub),
      email:      claims.email,
      role:       claims.role,
    }
  }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

/// Issues and validates credentials with one symmetric secret.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct CredentialService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl std::fmt::Debug for CredentialService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CredentialService")
      .field("ttl", &self.ttl)
      .finish_non_exhaustive()
  }
}

impl CredentialService {
  /// Build a service signing with `secret`; issued credentials live for `ttl`.
  ///
  /// `ttl` must be positive and small enough that an expiry computed from
  /// the current time is representable.
  pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, CredentialError> {
    if secret.len() < MIN_SECRET_LEN {
      return Err(CredentialError::WeakSecret {
        min:    MIN_SECRET_LEN,
        actual: secret.len(),
      });
    }
    if ttl <= Duration::zero() {
      return Err(CredentialError::NonPositiveTtl(ttl));
    }
    if Utc::now().checked_add_signed(ttl).is_none() {
      return Err(CredentialError::TtlOutOfRange);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    Ok(Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      ttl,
    })
  }

  pub fn issue(
    &self,
    subject: IdentityId,
    email: &str,
    role: Role,
  ) -> Result<IssuedCredential, CredentialError> {
    self.issue_at(subject, email, role, Utc::now())
  }

  /// Issue as if the current time were `now`.
  pub fn issue_at(
    &self,
    subject: IdentityId,
    email: &str,
    role: Role,
    now: DateTime<Utc>,
  ) -> Result<IssuedCredential, CredentialError> {
    let expires_at = now
      .checked_add_signed(self.ttl)
      .ok_or(CredentialError::TtlOutOfRange)?;
    let claims = Claims {
      sub:   subject.0,
      email: email.to_owned(),
      role,
      iat:   now.timestamp(),
      exp:   expires_at.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(CredentialError::Signing)?;

    Ok(IssuedCredential { token, expires_at })
  }

  pub fn validate(&self, token: &str) -> Result<Claims, CredentialError> {
    self.validate_at(token, Utc::now())
  }

  /// Validate as if the current time were `now`.
  pub fn validate_at(
    &self,
    token: &str,
    now: DateTime<Utc>,
  ) -> Result<Claims, CredentialError> {
    let data = decode::<Claims>(token, &self.decoding, &self.validation)
      .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => CredentialError::InvalidSignature,
        _ => CredentialError::Malformed,
      })?;

    if now.timestamp() >= data.claims.exp {
      return Err(CredentialError::Expired);
    }

    Ok(data.claims)
  }
}
