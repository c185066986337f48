//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Guard |
//! |--------|------|-------|
//! | `GET`    | `/posts` | public |
//! | `GET`    | `/posts/{id}` | public |
//! | `GET`    | `/users/{user_id}/posts` | public |
//! | `GET`    | `/posts/my` | credential |
//! | `POST`   | `/posts` | credential |
//! | `PUT`    | `/posts/{id}` | credential, owner |
//! | `DELETE` | `/posts/{id}` | credential, owner |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use gatehouse_core::{IdentityId, PostId, Store};

use crate::{
  AppState,
  dto::{CreatePostForm, UpdatePostForm},
  envelope::Envelope,
  error::ApiError,
  extract::{CurrentPrincipal, PathId, ValidJson},
  services::posts,
};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let all = posts::list(state.store.as_ref()).await?;
  Ok(Envelope::ok("Posts retrieved successfully", all))
}

/// `GET /posts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  PathId(id): PathId<PostId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let post = posts::find(state.store.as_ref(), id).await?;
  Ok(Envelope::ok("Post retrieved successfully", post))
}

/// `GET /users/{user_id}/posts`
pub async fn list_by_owner<S>(
  State(state): State<AppState<S>>,
  PathId(owner): PathId<IdentityId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let owned = posts::list_by_owner(state.store.as_ref(), owner).await?;
  Ok(Envelope::ok("Posts retrieved successfully", owned))
}

/// `GET /posts/my`
pub async fn mine<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let owned = posts::list_by_owner(state.store.as_ref(), principal.subject_id).await?;
  Ok(Envelope::ok("Posts retrieved successfully", owned))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// `POST /posts`, body: `{title, content}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ValidJson(form): ValidJson<CreatePostForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let post = posts::create(state.store.as_ref(), &principal, form).await?;
  Ok((StatusCode::CREATED, Envelope::ok("Post created successfully", post)))
}

/// `PUT /posts/{id}`, body: `{title?, content?}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  PathId(id): PathId<PostId>,
  ValidJson(form): ValidJson<UpdatePostForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let post = posts::update(state.store.as_ref(), &principal, id, form.into()).await?;
  Ok(Envelope::ok("Post updated successfully", post))
}

/// `DELETE /posts/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  PathId(id): PathId<PostId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  posts::delete(state.store.as_ref(), &principal, id).await?;
  Ok(Envelope::done("Post deleted successfully"))
}
