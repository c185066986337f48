//! Conversions between domain types and the plain values stored in SQLite.
//!
//! Timestamps are RFC 3339 strings; roles are their lowercase names.

use chrono::{DateTime, Utc};
use gatehouse_core::{Identity, IdentityId, Post, PostId, Role};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownRole(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "id, name, email, password_hash, role, created_at, updated_at";

pub const POST_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawIdentity {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawIdentity {
  /// Expects the columns in [`USER_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
      updated_at:    row.get(6)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      id:            IdentityId(self.id),
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub user_id:    i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawPost {
  /// Expects the columns in [`POST_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      user_id:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:         PostId(self.id),
      title:      self.title,
      content:    self.content,
      owner_id:   IdentityId(self.user_id),
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
