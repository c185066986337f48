//! Request interception: credential checking and role gating.
//!
//! Both are `from_fn_with_state` middleware. On the admin router the role
//! gate is layered first so that the interceptor wraps it and runs first.

pub mod auth;
pub mod roles;

pub use auth::{authenticate, bearer_token};
pub use roles::require_roles;
