//! Ownership policy for user-owned resources.
//!
//! Mutating operations fetch the resource first (absence is `NotFound`),
//! then call [`ensure_owner`] before touching it. Reads never go through
//! this check. There is no role override: an admin who does not own a post
//! cannot edit it either.

use crate::{
  Error, Result, identity::IdentityId, principal::AuthenticatedPrincipal,
};

/// A resource bound to exactly one owning identity.
pub trait Owned {
  fn owner_id(&self) -> IdentityId;
}

/// Allow the mutation only when `principal` owns `resource`.
///
/// A mismatch is [`Error::OwnershipRequired`], which callers must keep
/// distinct from `NotFound`: existence is not hidden from authenticated
/// non-owners.
pub fn ensure_owner<R>(resource: &R, principal: &AuthenticatedPrincipal) -> Result<()>
where
  R: Owned + ?Sized,
{
  if resource.owner_id() == principal.subject_id {
    Ok(())
  } else {
    Err(Error::OwnershipRequired)
  }
}
