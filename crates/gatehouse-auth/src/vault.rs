//! Password hashing with argon2id.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::VaultError;

/// A well-formed argon2id hash of no real password, with the default cost
/// parameters. Checked against when there is no stored hash to check.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                          AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashes and verifies passwords. Stored hashes are PHC strings, so the
/// salt and cost parameters travel with each hash.
#[derive(Default)]
pub struct PasswordVault {
  argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordVault {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("PasswordVault")
  }
}

impl PasswordVault {
  pub fn new() -> Self { Self::default() }

  /// Hash `plaintext` with a fresh random salt.
  pub fn hash(&self, plaintext: &str) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut OsRng);
    self
      .argon2
      .hash_password(plaintext.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| VaultError::Hash(e.to_string()))
  }

  /// `true` only if `plaintext` matches `hash`. A stored hash that cannot be
  /// parsed is a mismatch, not an error.
  pub fn verify(&self, hash: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      tracing::warn!("stored password hash is not a valid PHC string");
      return false;
    };
    self
      .argon2
      .verify_password(plaintext.as_bytes(), &parsed)
      .is_ok()
  }

  /// Do the work of [`verify`](Self::verify) for an account that does not
  /// exist, so the miss costs as much as a wrong password.
  pub fn verify_decoy(&self, plaintext: &str) {
    let _ = self.verify(DECOY_HASH, plaintext);
  }
}
