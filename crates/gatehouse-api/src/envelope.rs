//! The uniform JSON body every endpoint answers with.
//!
//! ```json
//! { "success": true, "message": "Login successful", "data": { … } }
//! { "success": false, "message": "Validation failed", "error": [{ "field": "email", "message": "…" }] }
//! ```

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use gatehouse_core::FieldError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub message: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<Vec<FieldError>>,
}

impl<T: Serialize> Envelope<T> {
  pub fn ok(message: &'static str, data: T) -> Self {
    Self { success: true, message, data: Some(data), error: None }
  }
}

impl Envelope<()> {
  /// A success with nothing to return, e.g. after a delete.
  pub fn done(message: &'static str) -> Self {
    Self { success: true, message, data: None, error: None }
  }

  pub fn failure(message: &'static str, fields: Vec<FieldError>) -> Self {
    Self {
      success: false,
      message,
      data: None,
      error: (!fields.is_empty()).then_some(fields),
    }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}
