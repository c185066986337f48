//! Identity: a registered account that can authenticate.
//!
//! The password hash never leaves the process: [`Identity`] skips it when
//! serialized, and the outward-facing projection is [`PublicIdentity`].

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Opaque, store-assigned subject identifier.
#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl From<i64> for IdentityId {
  fn from(value: i64) -> Self { Self(value) }
}

impl FromStr for IdentityId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self(s.parse()?)) }
}

/// A stored identity, including its password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub id:            IdentityId,
  pub name:          String,
  pub email:         String,
  /// PHC string produced by the password vault, e.g. `$argon2id$v=19$…`.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`IdentityStore::create_identity`](crate::store::IdentityStore::create_identity).
/// Id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

/// The identity as it may be shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
  pub id:         IdentityId,
  pub name:       String,
  pub email:      String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for PublicIdentity {
  fn from(identity: &Identity) -> Self {
    Self {
      id:         identity.id,
      name:       identity.name.clone(),
      email:      identity.email.clone(),
      role:       identity.role,
      created_at: identity.created_at,
      updated_at: identity.updated_at,
    }
  }
}

impl From<Identity> for PublicIdentity {
  fn from(identity: Identity) -> Self {
    Self {
      id:         identity.id,
      name:       identity.name,
      email:      identity.email,
      role:       identity.role,
      created_at: identity.created_at,
      updated_at: identity.updated_at,
    }
  }
}
