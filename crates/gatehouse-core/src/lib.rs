//! Core types and trait definitions for Gatehouse.
//!
//! This crate is deliberately free of HTTP, crypto and database dependencies.
//! It owns the domain model (identities, posts, roles, principals), the
//! repository contract the persistence layer implements, the error taxonomy,
//! and the ownership policy applied to user-owned resources.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod ownership;
pub mod patch;
pub mod post;
pub mod principal;
pub mod role;
pub mod store;

pub use error::{Error, FieldError, Resource, Result};
pub use identity::{Identity, IdentityId, NewIdentity, PublicIdentity};
pub use ownership::{Owned, ensure_owner};
pub use patch::{IdentityPatch, PostPatch};
pub use post::{NewPost, Post, PostId, PostView};
pub use principal::AuthenticatedPrincipal;
pub use role::Role;
pub use store::{IdentityStore, PostStore, Store, StoreError};
