//! Role-based authorization.
//!
//! Roles are compared for exact membership. There is no hierarchy: a route
//! open to `user` only does not admit `admin`.

use std::sync::Arc;

use gatehouse_core::{AuthenticatedPrincipal, Role};

use crate::error::Forbidden;

/// Allow the request only if the principal's role is one of `allowed`.
pub fn require(
  principal: &AuthenticatedPrincipal,
  allowed: &[Role],
) -> Result<(), Forbidden> {
  if allowed.contains(&principal.role) {
    Ok(())
  } else {
    Err(Forbidden)
  }
}

/// An owned, cheaply clonable set of allowed roles, for use as route state.
#[derive(Debug, Clone)]
pub struct RoleSet(Arc<[Role]>);

impl RoleSet {
  pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
    Self(roles.into_iter().collect())
  }

  pub fn admin_only() -> Self { Self::new([Role::Admin]) }

  pub fn permits(&self, principal: &AuthenticatedPrincipal) -> Result<(), Forbidden> {
    require(principal, &self.0)
  }
}
