//! Request extractors: the authenticated principal, validated JSON bodies and
//! numeric path ids.

use std::str::FromStr;

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use gatehouse_core::{AuthenticatedPrincipal, Error, FieldError};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

// ─── Principal ───────────────────────────────────────────────────────────────

/// The principal placed in the request extensions by the interceptor.
///
/// Reaching a handler that asks for this without the interceptor in front of
/// it is a routing mistake; the request is rejected as unauthorized.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<AuthenticatedPrincipal>()
      .cloned()
      .map(CurrentPrincipal)
      .ok_or(ApiError(Error::Unauthorized))
  }
}

// ─── JSON body ───────────────────────────────────────────────────────────────

/// A JSON body that has been deserialised and passed its `validator` rules.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
  T: DeserializeOwned + Validate,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
      tracing::debug!(%rejection, "rejected request body");
      Error::invalid("body", "The request body must be valid JSON")
    })?;

    value
      .validate()
      .map_err(|errors| Error::ValidationFailed(field_errors(&errors)))?;

    Ok(Self(value))
  }
}

/// Flatten `validator` output into one message per field, sorted by field
/// name. Only the first failing rule of each field is reported.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
  let mut fields: Vec<FieldError> = errors
    .field_errors()
    .into_iter()
    .filter_map(|(field, errs)| {
      let first = errs.first()?;
      let message = first
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("The {field} is invalid"));
      Some(FieldError::new(field.to_string(), message))
    })
    .collect();
  fields.sort_by(|a, b| a.field.cmp(&b.field));
  fields
}

// ─── Path id ─────────────────────────────────────────────────────────────────

/// A single numeric path parameter, e.g. `{id}` or `{user_id}`.
pub struct PathId<T>(pub T);

impl<T, S> FromRequestParts<S> for PathId<T>
where
  T: FromStr + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let invalid = || ApiError(Error::invalid("id", "The provided ID is invalid"));

    let Path(raw) = Path::<String>::from_request_parts(parts, state)
      .await
      .map_err(|_| invalid())?;

    raw.parse().map(PathId).map_err(|_| invalid())
  }
}
