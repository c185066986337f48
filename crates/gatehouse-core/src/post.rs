//! Post: the user-owned resource guarded by the ownership policy.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  identity::{IdentityId, PublicIdentity},
  ownership::Owned,
};

#[derive(
  Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl From<i64> for PostId {
  fn from(value: i64) -> Self { Self(value) }
}

impl FromStr for PostId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self(s.parse()?)) }
}

/// A stored post. `owner_id` is fixed at creation; stores never rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         PostId,
  pub title:      String,
  pub content:    String,
  #[serde(rename = "user_id")]
  pub owner_id:   IdentityId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Owned for Post {
  fn owner_id(&self) -> IdentityId { self.owner_id }
}

/// A post as shown to callers: the stored fields plus the author's public
/// projection under `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
  #[serde(flatten)]
  pub post: Post,
  pub user: PublicIdentity,
}

/// Input to [`PostStore::create_post`](crate::store::PostStore::create_post).
#[derive(Debug, Clone)]
pub struct NewPost {
  pub title:    String,
  pub content:  String,
  pub owner_id: IdentityId,
}
