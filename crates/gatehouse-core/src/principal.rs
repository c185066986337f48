//! The request-scoped authenticated principal.

use serde::Serialize;

use crate::{identity::IdentityId, role::Role};

/// Who is making the current request, as asserted by a validated credential.
///
/// Created only after a credential has been verified and discarded when the
/// request completes. It is never persisted and never rebuilt from headers
/// further down the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
  pub subject_id: IdentityId,
  pub email:      String,
  pub role:       Role,
}
