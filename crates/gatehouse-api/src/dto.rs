//! Request and response bodies.
//!
//! Request forms default every field to empty so that a missing field is a
//! field-level validation error rather than a body parse failure.

use gatehouse_core::{IdentityPatch, PostPatch, PublicIdentity};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// `Some` only for a non-empty string; `null`, absent and `""` are all `None`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
  #[validate(length(min = 3, message = "The name must be at least 3 characters"))]
  pub name:             String,
  #[validate(email(message = "The email must be a valid email address"))]
  pub email:            String,
  #[validate(length(min = 6, message = "The password must be at least 6 characters"))]
  pub password:         String,
  #[validate(must_match(
    other = "password",
    message = "The password_confirm must match password"
  ))]
  pub password_confirm: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
  #[validate(email(message = "The email must be a valid email address"))]
  pub email:    String,
  #[validate(length(min = 1, message = "The password field is required"))]
  pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ChangePasswordForm {
  #[validate(length(min = 1, message = "The old_password field is required"))]
  pub old_password:         String,
  #[validate(length(
    min = 6,
    message = "The new_password must be at least 6 characters"
  ))]
  pub new_password:         String,
  #[validate(must_match(
    other = "new_password",
    message = "The new_password_confirm must match new_password"
  ))]
  pub new_password_confirm: String,
}

/// Profile or admin edit of an identity. Only supplied fields are checked.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateIdentityForm {
  #[serde(default, deserialize_with = "blank_as_none")]
  #[validate(length(min = 3, message = "The name must be at least 3 characters"))]
  pub name:  Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  #[validate(email(message = "The email must be a valid email address"))]
  pub email: Option<String>,
}

impl From<UpdateIdentityForm> for IdentityPatch {
  fn from(form: UpdateIdentityForm) -> Self { IdentityPatch::new(form.name, form.email) }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub user:  PublicIdentity,
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreatePostForm {
  #[validate(length(min = 3, message = "The title must be at least 3 characters"))]
  pub title:   String,
  #[validate(length(min = 10, message = "The content must be at least 10 characters"))]
  pub content: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostForm {
  #[serde(default, deserialize_with = "blank_as_none")]
  #[validate(length(min = 3, message = "The title must be at least 3 characters"))]
  pub title:   Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  #[validate(length(min = 10, message = "The content must be at least 10 characters"))]
  pub content: Option<String>,
}

impl From<UpdatePostForm> for PostPatch {
  fn from(form: UpdatePostForm) -> Self { PostPatch::new(form.title, form.content) }
}
