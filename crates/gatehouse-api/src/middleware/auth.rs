//! The authentication interceptor.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  http::{HeaderMap, header::AUTHORIZATION},
  middleware::Next,
  response::Response,
};
use gatehouse_auth::CredentialService;
use gatehouse_core::{AuthenticatedPrincipal, Error};
use tracing::debug;

use crate::error::ApiError;

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The value must be exactly the scheme, one space and a non-empty token
/// with no further spaces. Anything else is malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
  let value = headers
    .get(AUTHORIZATION)
    .ok_or(Error::MissingCredential)?
    .to_str()
    .map_err(|_| Error::MalformedCredential)?;

  match value.split(' ').collect::<Vec<_>>().as_slice() {
    ["Bearer", token] if !token.is_empty() => Ok(*token),
    _ => Err(Error::MalformedCredential),
  }
}

/// Validate the bearer credential and attach the principal to the request.
///
/// Every validation failure is reported to the caller as the same
/// `Unauthorized`; the actual reason only goes to the log.
pub async fn authenticate(
  State(credentials): State<Arc<CredentialService>>,
  mut request: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let claims = {
    let token = bearer_token(request.headers())?;
    credentials.validate(token).map_err(|reason| {
      debug!(%reason, "credential rejected");
      Error::Unauthorized
    })?
  };

  request
    .extensions_mut()
    .insert(AuthenticatedPrincipal::from(claims));

  Ok(next.run(request).await)
}
