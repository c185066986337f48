//! Axum handlers, grouped by resource.
//!
//! Handlers only extract, call into [`crate::services`] and wrap the result
//! in an [`Envelope`](crate::envelope::Envelope).

pub mod admin;
pub mod auth;
pub mod posts;
pub mod profile;
