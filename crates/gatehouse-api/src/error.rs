//! API error type and the single table that decides what callers see.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gatehouse_core::{Error, FieldError, Resource};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by a handler, middleware or extractor.
///
/// Wraps the domain taxonomy so it can be turned into a response here.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
  /// Status, envelope message and field list for this error.
  pub fn parts(&self) -> (StatusCode, &'static str, Vec<FieldError>) {
    let one = |field: &str, message: &str| vec![FieldError::new(field, message)];

    match &self.0 {
      Error::MissingCredential => (
        StatusCode::UNAUTHORIZED,
        "Unauthorized",
        one("authorization", "Authorization header is required"),
      ),
      Error::MalformedCredential => (
        StatusCode::UNAUTHORIZED,
        "Unauthorized",
        one(
          "authorization",
          "Invalid authorization format. Use: Bearer <token>",
        ),
      ),
      Error::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        "Unauthorized",
        one("token", "Invalid or expired token"),
      ),
      Error::Forbidden => (
        StatusCode::FORBIDDEN,
        "Forbidden",
        one("permission", "You don't have permission to access this resource"),
      ),
      Error::OwnershipRequired => (
        StatusCode::FORBIDDEN,
        "Forbidden",
        one("ownership", "You don't have permission to modify this resource"),
      ),
      Error::NotFound(Resource::Post) => (
        StatusCode::NOT_FOUND,
        "Not found",
        one("post", "The post could not be found"),
      ),
      Error::NotFound(Resource::Identity) => (
        StatusCode::NOT_FOUND,
        "Not found",
        one("user", "The user could not be found"),
      ),
      Error::EmailAlreadyExists => (
        StatusCode::CONFLICT,
        "Conflict",
        one("email", "The email has already been taken"),
      ),
      Error::InvalidCredentials => (
        StatusCode::UNAUTHORIZED,
        "Login failed",
        one("credentials", "The provided credentials are invalid"),
      ),
      Error::OldPasswordIncorrect => (
        StatusCode::BAD_REQUEST,
        "Failed to change password",
        one("old_password", "The old password is incorrect"),
      ),
      Error::ValidationFailed(fields) => {
        (StatusCode::BAD_REQUEST, "Validation failed", fields.clone())
      }
      Error::Internal(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", Vec::new())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let Error::Internal(source) = &self.0 {
      tracing::error!(error = %source, "internal error");
    }

    let (status, message, fields) = self.parts();
    (status, Envelope::<()>::failure(message, fields)).into_response()
  }
}
