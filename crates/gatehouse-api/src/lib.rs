//! HTTP surface for Gatehouse.
//!
//! Exposes an axum [`Router`] under `/api/v1` backed by any
//! [`gatehouse_core::Store`]. Requests to protected routes pass through the
//! authentication interceptor, admin routes additionally through a role gate,
//! and post mutations through the ownership policy inside the services.

pub mod dto;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod services;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  middleware::from_fn_with_state,
  routing::{get, post, put},
};
use chrono::Duration;
use gatehouse_auth::{CredentialError, CredentialService, PasswordVault, RoleSet};
use gatehouse_core::Store;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{admin, auth, posts, profile};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GATEHOUSE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// HMAC secret for credentials. At least 32 bytes.
  pub jwt_secret:       String,
  #[serde(default = "default_expire_hours")]
  pub jwt_expire_hours: i64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("gatehouse.db") }

fn default_expire_hours() -> i64 { 24 }

impl std::fmt::Debug for ServerConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServerConfig")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("store_path", &self.store_path)
      .field("jwt_secret", &"<redacted>")
      .field("jwt_expire_hours", &self.jwt_expire_hours)
      .finish()
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Store> {
  pub store:       Arc<S>,
  pub credentials: Arc<CredentialService>,
  pub vault:       Arc<PasswordVault>,
}

impl<S: Store> AppState<S> {
  /// Build state from a store and the credential settings in `config`.
  pub fn new(store: S, config: &ServerConfig) -> Result<Self, CredentialError> {
    let ttl = Duration::try_hours(config.jwt_expire_hours)
      .ok_or(CredentialError::TtlOutOfRange)?;
    let credentials = CredentialService::new(config.jwt_secret.as_bytes(), ttl)?;
    Ok(Self {
      store:       Arc::new(store),
      credentials: Arc::new(credentials),
      vault:       Arc::new(PasswordVault::new()),
    })
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full API router, mounted at `/api/v1`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: Store + Clone + 'static,
{
  let public = Router::new()
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/posts", get(posts::list::<S>))
    .route("/posts/{id}", get(posts::get_one::<S>))
    .route("/users/{user_id}/posts", get(posts::list_by_owner::<S>));

  let protected = Router::new()
    .route("/profile", get(profile::show::<S>).put(profile::update::<S>))
    .route("/change-password", put(profile::change_password::<S>))
    .route("/posts/my", get(posts::mine::<S>))
    .route("/posts", post(posts::create::<S>))
    .route("/posts/{id}", put(posts::update::<S>).delete(posts::delete::<S>))
    .route_layer(from_fn_with_state(
      state.credentials.clone(),
      middleware::authenticate,
    ));

  let admin = Router::new()
    .route("/admin/users", get(admin::list::<S>))
    .route(
      "/admin/users/{id}",
      get(admin::get_one::<S>)
        .put(admin::update::<S>)
        .delete(admin::delete::<S>),
    )
    .route_layer(from_fn_with_state(RoleSet::admin_only(), middleware::require_roles))
    .route_layer(from_fn_with_state(
      state.credentials.clone(),
      middleware::authenticate,
    ));

  Router::new()
    .nest("/api/v1", public.merge(protected).merge(admin))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
