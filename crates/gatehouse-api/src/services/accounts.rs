//! Registration, login and identity management.

use chrono::Utc;
use gatehouse_core::{
  AuthenticatedPrincipal, Error, IdentityId, IdentityPatch, NewIdentity,
  PublicIdentity, Resource, Result, Role, Store, StoreError,
};
use tracing::info;

use crate::{
  AppState,
  dto::{ChangePasswordForm, LoginForm, LoginResponse, RegisterForm},
};

/// A refused identity write. A duplicate email is the caller's conflict;
/// anything else is ours.
fn write_error<E: StoreError>(e: E) -> Error {
  if e.is_email_taken() {
    Error::EmailAlreadyExists
  } else {
    Error::internal(e)
  }
}

/// Create a `user`-role identity. Email uniqueness is checked up front and
/// again by the store on insert.
pub async fn register<S: Store>(
  state: &AppState<S>,
  form: RegisterForm,
) -> Result<PublicIdentity> {
  let existing = state
    .store
    .find_identity_by_email(form.email.clone())
    .await
    .map_err(Error::internal)?;
  if existing.is_some() {
    return Err(Error::EmailAlreadyExists);
  }

  let password_hash = state.vault.hash(&form.password)?;
  let identity = state
    .store
    .create_identity(NewIdentity {
      name: form.name,
      email: form.email,
      password_hash,
      role: Role::User,
    })
    .await
    .map_err(write_error)?;

  info!(id = %identity.id, "registered identity");
  Ok(identity.into())
}

/// Exchange email and password for a credential. Unknown email and wrong
/// password are the same error and cost the same hash check.
pub async fn login<S: Store>(
  state: &AppState<S>,
  form: LoginForm,
) -> Result<LoginResponse> {
  let found = state
    .store
    .find_identity_by_email(form.email)
    .await
    .map_err(Error::internal)?;

  let Some(identity) = found else {
    state.vault.verify_decoy(&form.password);
    return Err(Error::InvalidCredentials);
  };

  if !state.vault.verify(&identity.password_hash, &form.password) {
    return Err(Error::InvalidCredentials);
  }

  let issued = state
    .credentials
    .issue(identity.id, &identity.email, identity.role)
    .map_err(Error::internal)?;

  info!(id = %identity.id, expires_at = %issued.expires_at, "issued credential");
  Ok(LoginResponse { token: issued.token, user: identity.into() })
}

pub async fn find<S: Store>(state: &AppState<S>, id: IdentityId) -> Result<PublicIdentity> {
  state
    .store
    .find_identity_by_id(id)
    .await
    .map_err(Error::internal)?
    .map(PublicIdentity::from)
    .ok_or(Error::NotFound(Resource::Identity))
}

pub async fn list<S: Store>(state: &AppState<S>) -> Result<Vec<PublicIdentity>> {
  let identities = state.store.list_identities().await.map_err(Error::internal)?;
  Ok(identities.into_iter().map(PublicIdentity::from).collect())
}

/// Apply a name/email patch. Taking an email held by another identity is a
/// conflict; re-submitting one's own email is not.
pub async fn update<S: Store>(
  state: &AppState<S>,
  id: IdentityId,
  patch: IdentityPatch,
) -> Result<PublicIdentity> {
  let mut identity = state
    .store
    .find_identity_by_id(id)
    .await
    .map_err(Error::internal)?
    .ok_or(Error::NotFound(Resource::Identity))?;

  if let Some(email) = &patch.email {
    let holder = state
      .store
      .find_identity_by_email(email.clone())
      .await
      .map_err(Error::internal)?;
    if holder.is_some_and(|other| other.id != id) {
      return Err(Error::EmailAlreadyExists);
    }
  }

  if !patch.apply(&mut identity) {
    return Ok(identity.into());
  }

  state
    .store
    .update_identity(identity)
    .await
    .map_err(write_error)?
    .map(PublicIdentity::from)
    .ok_or(Error::NotFound(Resource::Identity))
}

/// Replace the caller's password after checking the old one. Outstanding
/// credentials stay valid until they expire.
pub async fn change_password<S: Store>(
  state: &AppState<S>,
  principal: &AuthenticatedPrincipal,
  form: ChangePasswordForm,
) -> Result<()> {
  let mut identity = state
    .store
    .find_identity_by_id(principal.subject_id)
    .await
    .map_err(Error::internal)?
    .ok_or(Error::NotFound(Resource::Identity))?;

  if !state.vault.verify(&identity.password_hash, &form.old_password) {
    return Err(Error::OldPasswordIncorrect);
  }

  identity.password_hash = state.vault.hash(&form.new_password)?;
  identity.updated_at = Utc::now();

  state
    .store
    .update_identity(identity)
    .await
    .map_err(write_error)?
    .ok_or(Error::NotFound(Resource::Identity))?;

  info!(id = %principal.subject_id, "password changed");
  Ok(())
}

pub async fn delete<S: Store>(state: &AppState<S>, id: IdentityId) -> Result<()> {
  let deleted = state.store.delete_identity(id).await.map_err(Error::internal)?;
  if !deleted {
    return Err(Error::NotFound(Resource::Identity));
  }
  info!(%id, "deleted identity");
  Ok(())
}

/// Promote an existing identity to `admin`. Used by the server binary's
/// `--grant-admin` helper.
pub async fn grant_admin<S: Store>(store: &S, email: &str) -> Result<PublicIdentity> {
  let mut identity = store
    .find_identity_by_email(email.to_owned())
    .await
    .map_err(Error::internal)?
    .ok_or(Error::NotFound(Resource::Identity))?;

  identity.role = Role::Admin;
  identity.updated_at = Utc::now();

  let updated = store
    .update_identity(identity)
    .await
    .map_err(write_error)?
    .ok_or(Error::NotFound(Resource::Identity))?;

  info!(id = %updated.id, "granted admin role");
  Ok(updated.into())
}
