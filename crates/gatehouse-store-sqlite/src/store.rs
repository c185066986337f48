//! [`SqliteStore`]: the SQLite implementation of [`IdentityStore`] and
//! [`PostStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use gatehouse_core::{
  Identity, IdentityId, NewIdentity, NewPost, Post, PostId,
  store::{IdentityStore, PostStore},
};

use crate::{
  Error, Result,
  encode::{POST_COLUMNS, RawIdentity, RawPost, USER_COLUMNS, encode_dt, encode_role},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Identities and posts backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Identities ──────────────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  type Error = Error;

  async fn find_identity_by_id(&self, id: IdentityId) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id.0],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn find_identity_by_email(&self, email: String) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            rusqlite::params![email],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn list_identities(&self) -> Result<Vec<Identity>> {
    let raws: Vec<RawIdentity> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }

  async fn create_identity(&self, input: NewIdentity) -> Result<Identity> {
    let now = Utc::now();
    let now_str  = encode_dt(now);
    let role_str = encode_role(input.role);

    let name  = input.name.clone();
    let email = input.email.clone();
    let hash  = input.password_hash.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![name, email, hash, role_str, now_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_identity_write)?;

    Ok(Identity {
      id:            IdentityId(id),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    now,
      updated_at:    now,
    })
  }

  async fn update_identity(&self, identity: Identity) -> Result<Option<Identity>> {
    let id          = identity.id.0;
    let name        = identity.name.clone();
    let email       = identity.email.clone();
    let hash        = identity.password_hash.clone();
    let role_str    = encode_role(identity.role);
    let updated_str = encode_dt(identity.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
              SET name = ?2, email = ?3, password_hash = ?4, role = ?5, updated_at = ?6
            WHERE id = ?1",
          rusqlite::params![id, name, email, hash, role_str, updated_str],
        )?)
      })
      .await
      .map_err(Error::from_identity_write)?;

    Ok((changed > 0).then_some(identity))
  }

  async fn delete_identity(&self, id: IdentityId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    Ok(deleted > 0)
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

impl PostStore for SqliteStore {
  type Error = Error;

  async fn find_post_by_id(&self, id: PostId) -> Result<Option<Post>> {
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
            rusqlite::params![id.0],
            RawPost::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id DESC"))?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn list_posts_by_owner(&self, owner: IdentityId) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts WHERE user_id = ?1 ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner.0], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let now     = Utc::now();
    let now_str = encode_dt(now);

    let title   = input.title.clone();
    let content = input.content.clone();
    let owner   = input.owner_id.0;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (title, content, user_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![title, content, owner, now_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Post {
      id:         PostId(id),
      title:      input.title,
      content:    input.content,
      owner_id:   input.owner_id,
      created_at: now,
      updated_at: now,
    })
  }

  async fn update_post(&self, post: Post) -> Result<Option<Post>> {
    let id          = post.id.0;
    let title       = post.title.clone();
    let content     = post.content.clone();
    let updated_str = encode_dt(post.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET title = ?2, content = ?3, updated_at = ?4 WHERE id = ?1",
          rusqlite::params![id, title, content, updated_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }

    // Re-read so the caller sees the stored owner, not whatever it passed in.
    self.find_post_by_id(post.id).await
  }

  async fn delete_post(&self, id: PostId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM posts WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
