//! Role gate middleware.

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use gatehouse_auth::RoleSet;
use gatehouse_core::{AuthenticatedPrincipal, Error};
use tracing::warn;

use crate::error::ApiError;

/// Let the request through only if the principal's role is in `allowed`.
///
/// Must sit inside [`authenticate`](super::authenticate). Without a principal
/// the request is rejected as unauthorized.
pub async fn require_roles(
  State(allowed): State<RoleSet>,
  request: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let principal = request
    .extensions()
    .get::<AuthenticatedPrincipal>()
    .ok_or(Error::Unauthorized)?;

  if let Err(denied) = allowed.permits(principal) {
    warn!(
      subject = %principal.subject_id,
      role = %principal.role,
      path = %request.uri().path(),
      "role not permitted"
    );
    return Err(Error::from(denied).into());
  }

  Ok(next.run(request).await)
}
