//! Handlers for the caller's own identity. All require a credential.

use axum::{extract::State, response::IntoResponse};
use gatehouse_core::Store;

use crate::{
  AppState,
  dto::{ChangePasswordForm, UpdateIdentityForm},
  envelope::Envelope,
  error::ApiError,
  extract::{CurrentPrincipal, ValidJson},
  services::accounts,
};

/// `GET /profile`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let user = accounts::find(&state, principal.subject_id).await?;
  Ok(Envelope::ok("Profile retrieved successfully", user))
}

/// `PUT /profile`, body: `{name?, email?}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ValidJson(form): ValidJson<UpdateIdentityForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let user = accounts::update(&state, principal.subject_id, form.into()).await?;
  Ok(Envelope::ok("Profile updated successfully", user))
}

/// `PUT /change-password`
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ValidJson(form): ValidJson<ChangePasswordForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  accounts::change_password(&state, &principal, form).await?;
  Ok(Envelope::done("Password changed successfully"))
}
