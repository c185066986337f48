//! Post operations. Reads are public; mutations go through the ownership
//! policy after the post has been found. Everything returned to callers
//! carries the author's public projection.

use std::collections::HashMap;

use gatehouse_core::{
  AuthenticatedPrincipal, Error, IdentityId, NewPost, Post, PostId, PostPatch,
  PostView, PublicIdentity, Resource, Result, Store, ensure_owner,
};
use tracing::warn;

use crate::dto::CreatePostForm;

// ─── Authors ─────────────────────────────────────────────────────────────────

async fn author<S: Store>(store: &S, owner: IdentityId) -> Result<PublicIdentity> {
  store
    .find_identity_by_id(owner)
    .await
    .map_err(Error::internal)?
    .map(PublicIdentity::from)
    .ok_or(Error::NotFound(Resource::Identity))
}

async fn view<S: Store>(store: &S, post: Post) -> Result<PostView> {
  let user = author(store, post.owner_id).await?;
  Ok(PostView { post, user })
}

/// Attach authors to a listing, looking each distinct owner up once.
async fn views<S: Store>(store: &S, posts: Vec<Post>) -> Result<Vec<PostView>> {
  let mut authors: HashMap<IdentityId, PublicIdentity> = HashMap::new();
  let mut out = Vec::with_capacity(posts.len());

  for post in posts {
    let user = match authors.get(&post.owner_id) {
      Some(user) => user.clone(),
      None => {
        let user = author(store, post.owner_id).await?;
        authors.insert(post.owner_id, user.clone());
        user
      }
    };
    out.push(PostView { post, user });
  }

  Ok(out)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub async fn list<S: Store>(store: &S) -> Result<Vec<PostView>> {
  let posts = store.list_posts().await.map_err(Error::internal)?;
  views(store, posts).await
}

pub async fn list_by_owner<S: Store>(store: &S, owner: IdentityId) -> Result<Vec<PostView>> {
  let posts = store.list_posts_by_owner(owner).await.map_err(Error::internal)?;
  views(store, posts).await
}

async fn find_post<S: Store>(store: &S, id: PostId) -> Result<Post> {
  store
    .find_post_by_id(id)
    .await
    .map_err(Error::internal)?
    .ok_or(Error::NotFound(Resource::Post))
}

pub async fn find<S: Store>(store: &S, id: PostId) -> Result<PostView> {
  let post = find_post(store, id).await?;
  view(store, post).await
}

/// Fetch the post and make sure `principal` may mutate it.
async fn find_owned<S: Store>(
  store: &S,
  principal: &AuthenticatedPrincipal,
  id: PostId,
) -> Result<Post> {
  let post = find_post(store, id).await?;
  ensure_owner(&post, principal).inspect_err(|_| {
    warn!(post = %id, requester = %principal.subject_id, "ownership check failed");
  })?;
  Ok(post)
}

// ─── Mutations ───────────────────────────────────────────────────────────────

pub async fn create<S: Store>(
  store: &S,
  principal: &AuthenticatedPrincipal,
  form: CreatePostForm,
) -> Result<PostView> {
  let post = store
    .create_post(NewPost {
      title:    form.title,
      content:  form.content,
      owner_id: principal.subject_id,
    })
    .await
    .map_err(Error::internal)?;
  view(store, post).await
}

pub async fn update<S: Store>(
  store: &S,
  principal: &AuthenticatedPrincipal,
  id: PostId,
  patch: PostPatch,
) -> Result<PostView> {
  let mut post = find_owned(store, principal, id).await?;

  if !patch.apply(&mut post) {
    return view(store, post).await;
  }

  let updated = store
    .update_post(post)
    .await
    .map_err(Error::internal)?
    .ok_or(Error::NotFound(Resource::Post))?;
  view(store, updated).await
}

pub async fn delete<S: Store>(
  store: &S,
  principal: &AuthenticatedPrincipal,
  id: PostId,
) -> Result<()> {
  find_owned(store, principal, id).await?;

  if !store.delete_post(id).await.map_err(Error::internal)? {
    return Err(Error::NotFound(Resource::Post));
  }
  Ok(())
}
