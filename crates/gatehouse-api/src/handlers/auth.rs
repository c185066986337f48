//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: `{name, email, password, password_confirm}` |
//! | `POST` | `/auth/login` | Body: `{email, password}` → `{token, user}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use gatehouse_core::Store;

use crate::{
  AppState,
  dto::{LoginForm, RegisterForm},
  envelope::Envelope,
  error::ApiError,
  extract::ValidJson,
  services::accounts,
};

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  ValidJson(form): ValidJson<RegisterForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let user = accounts::register(&state, form).await?;
  Ok((StatusCode::CREATED, Envelope::ok("User registered successfully", user)))
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ValidJson(form): ValidJson<LoginForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let session = accounts::login(&state, form).await?;
  Ok(Envelope::ok("Login successful", session))
}
