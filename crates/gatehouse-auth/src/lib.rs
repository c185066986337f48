//! Credential issuance, password hashing and role gating for Gatehouse.
//!
//! Everything here is synchronous and store-agnostic. The HTTP layer wires
//! these pieces into request interception; services call them directly.

pub mod credential;
pub mod error;
pub mod gate;
pub mod vault;

pub use credential::{Claims, CredentialService, IssuedCredential};
pub use error::{CredentialError, Forbidden, VaultError};
pub use gate::{RoleSet, require};
pub use vault::PasswordVault;

/// Shortest signing secret accepted by [`CredentialService::new`], in bytes.
pub const MIN_SECRET_LEN: usize = 32;
