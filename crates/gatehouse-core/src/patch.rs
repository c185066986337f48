//! Partial-update carriers for identities and posts.
//!
//! A field that is `None` *or* an empty string is left unchanged. The two
//! cases cannot be told apart, so there is no way to clear a field through
//! a patch. That is a known limitation of the update contract and is kept
//! as-is; do not "fix" it without changing the contract with API callers.

use chrono::Utc;

use crate::{identity::Identity, post::Post};

/// `Some(value)` only if the caller actually supplied something.
fn supplied(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
  pub title:   Option<String>,
  pub content: Option<String>,
}

impl PostPatch {
  pub fn new(title: Option<String>, content: Option<String>) -> Self {
    Self { title: supplied(title), content: supplied(content) }
  }

  /// Overwrite only the supplied fields. Returns `true` if anything changed.
  pub fn apply(self, post: &mut Post) -> bool {
    let mut changed = false;
    if let Some(title) = supplied(self.title) {
      post.title = title;
      changed = true;
    }
    if let Some(content) = supplied(self.content) {
      post.content = content;
      changed = true;
    }
    if changed {
      post.updated_at = Utc::now();
    }
    changed
  }
}

// ─── Identities ──────────────────────────────────────────────────────────────

/// Profile edit. The password and role are deliberately not patchable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
  pub name:  Option<String>,
  pub email: Option<String>,
}

impl IdentityPatch {
  pub fn new(name: Option<String>, email: Option<String>) -> Self {
    Self { name: supplied(name), email: supplied(email) }
  }

  pub fn apply(self, identity: &mut Identity) -> bool {
    let mut changed = false;
    if let Some(name) = supplied(self.name) {
      identity.name = name;
      changed = true;
    }
    if let Some(email) = supplied(self.email) {
      identity.email = email;
      changed = true;
    }
    if changed {
      identity.updated_at = Utc::now();
    }
    changed
  }
}
