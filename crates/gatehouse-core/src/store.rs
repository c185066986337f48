//! Storage traits for identities and posts.
//!
//! Implemented by backends such as `gatehouse-store-sqlite`. The auth layer
//! and the HTTP surface depend on these traits only.

use std::future::Future;

use crate::{
  identity::{Identity, IdentityId, NewIdentity},
  post::{NewPost, Post, PostId},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Store failures that callers need to tell apart from plain I/O trouble.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The write was refused because another identity already holds the email.
  fn is_email_taken(&self) -> bool;
}

// ─── Identities ──────────────────────────────────────────────────────────────

/// Persistence for identities.
///
/// Email addresses are unique per store. `create_identity` and
/// `update_identity` must refuse a write that would duplicate one, with an
/// error whose [`StoreError::is_email_taken`] is `true`. The check has to be
/// atomic with the write; a prior
/// [`find_identity_by_email`](Self::find_identity_by_email) only gives the
/// common case a cheap early answer.
pub trait IdentityStore: Send + Sync {
  type Error: StoreError;

  fn find_identity_by_id(
    &self,
    id: IdentityId,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  fn find_identity_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// All identities, oldest first.
  fn list_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + '_;

  /// Persist a new identity. Id and timestamps are assigned by the store.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Overwrite the mutable columns (name, email, password hash, role,
  /// `updated_at`) of an existing identity. Returns `None` if no identity
  /// has `identity.id`.
  fn update_identity(
    &self,
    identity: Identity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Remove an identity and every post it owns. Returns `false` if nothing
  /// was deleted.
  fn delete_identity(
    &self,
    id: IdentityId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Posts ───────────────────────────────────────────────────────────────────

pub trait PostStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_post_by_id(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Posts owned by `owner`, newest first.
  fn list_posts_by_owner(
    &self,
    owner: IdentityId,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Overwrite title, content and `updated_at`. The owner column is never
  /// rewritten. Returns `None` if the post does not exist.
  fn update_post(
    &self,
    post: Post,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  fn delete_post(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Combined ────────────────────────────────────────────────────────────────

/// A backend that persists both identities and posts.
///
/// Blanket-implemented; exists so the HTTP layer can name a single bound.
pub trait Store: IdentityStore + PostStore {}

impl<T: IdentityStore + PostStore> Store for T {}
