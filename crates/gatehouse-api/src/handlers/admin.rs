//! Handlers for `/admin/users`. The router puts these behind the
//! interceptor and an admin-only role gate.

use axum::{extract::State, response::IntoResponse};
use gatehouse_core::{IdentityId, Store};

use crate::{
  AppState,
  dto::UpdateIdentityForm,
  envelope::Envelope,
  error::ApiError,
  extract::{PathId, ValidJson},
  services::accounts,
};

/// `GET /admin/users`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let users = accounts::list(&state).await?;
  Ok(Envelope::ok("Users retrieved successfully", users))
}

/// `GET /admin/users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  PathId(id): PathId<IdentityId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let user = accounts::find(&state, id).await?;
  Ok(Envelope::ok("User retrieved successfully", user))
}

/// `PUT /admin/users/{id}`, body: `{name?, email?}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  PathId(id): PathId<IdentityId>,
  ValidJson(form): ValidJson<UpdateIdentityForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let user = accounts::update(&state, id, form.into()).await?;
  Ok(Envelope::ok("User updated successfully", user))
}

/// `DELETE /admin/users/{id}`. The store removes the user's posts too.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  PathId(id): PathId<IdentityId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  accounts::delete(&state, id).await?;
  Ok(Envelope::done("User deleted successfully"))
}
