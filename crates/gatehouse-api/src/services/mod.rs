//! Business operations behind the HTTP handlers.
//!
//! Every function returns the domain [`gatehouse_core::Error`]; store errors
//! are boxed into `Error::Internal` here and nowhere else.

pub mod accounts;
pub mod posts;
