//! Router-level tests against an in-memory store.

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use gatehouse_core::{IdentityId, Role, store::IdentityStore};
use gatehouse_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

const SECRET: &str = "integration-test-secret-at-least-32-bytes";

fn config(jwt_expire_hours: i64) -> ServerConfig {
  ServerConfig {
    host: "127.0.0.1".to_string(),
    port: 8080,
    store_path: PathBuf::from(":memory:"),
    jwt_secret: SECRET.to_string(),
    jwt_expire_hours,
  }
}

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(store, &config(24)).unwrap()
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };

  let res = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn send_raw_auth(app: &Router, uri: &str, authorization: &str) -> (StatusCode, Value) {
  let req = Request::builder()
    .uri(uri)
    .header(header::AUTHORIZATION, authorization)
    .body(Body::empty())
    .unwrap();
  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> Value {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/auth/register",
    None,
    Some(json!({
      "name": name,
      "email": email,
      "password": password,
      "password_confirm": password,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["data"].clone()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/auth/login",
    None,
    Some(json!({ "email": email, "password": password })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["data"]["token"].as_str().unwrap().to_string()
}

/// Register and log in; returns `(id, token)`.
async fn sign_up(app: &Router, name: &str, email: &str) -> (i64, String) {
  let user = register(app, name, email, "secret1").await;
  let token = login(app, email, "secret1").await;
  (user["id"].as_i64().unwrap(), token)
}

async fn create_post(app: &Router, token: &str, title: &str) -> i64 {
  let (status, body) = send(
    app,
    Method::POST,
    "/api/v1/posts",
    Some(token),
    Some(json!({ "title": title, "content": "Original content" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["data"]["id"].as_i64().unwrap()
}

fn first_error(body: &Value) -> (&str, &str) {
  let err = &body["error"][0];
  (err["field"].as_str().unwrap(), err["message"].as_str().unwrap())
}

// ─── Startup ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unusable_credential_lifetime_is_refused() {
  for hours in [0, -5, i64::MAX] {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let result = AppState::new(store, &config(hours));
    assert!(result.is_err(), "{hours} hours was accepted");
  }
}

// ─── Interceptor ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_header_is_rejected() {
  let app = router(make_state().await);
  let (status, body) = send(&app, Method::GET, "/api/v1/profile", None, None).await;

  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["success"], false);
  assert_eq!(body["message"], "Unauthorized");
  assert_eq!(first_error(&body), ("authorization", "Authorization header is required"));
}

#[tokio::test]
async fn malformed_headers_are_rejected() {
  let app = router(make_state().await);
  for value in ["Bearer", "Basic xyz", "Bearer a b"] {
    let (status, body) = send_raw_auth(&app, "/api/v1/profile", value).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{value}");
    assert_eq!(
      first_error(&body),
      ("authorization", "Invalid authorization format. Use: Bearer <token>"),
      "{value}"
    );
  }
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
  let app = router(make_state().await);
  let (status, body) = send_raw_auth(&app, "/api/v1/posts/my", "Bearer not.a.token").await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(first_error(&body), ("token", "Invalid or expired token"));
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
  let state = make_state().await;
  let app = router(state.clone());
  let (id, _) = sign_up(&app, "John", "john@x.com").await;

  let stale = state
    .credentials
    .issue_at(IdentityId(id), "john@x.com", Role::User, Utc::now() - Duration::hours(25))
    .unwrap()
    .token;

  let (status, body) = send(&app, Method::GET, "/api/v1/profile", Some(&stale), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(first_error(&body).0, "token");
}

#[tokio::test]
async fn forged_role_is_unauthorized() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;

  let parts: Vec<&str> = token.split('.').collect();
  let mut claims: Value =
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
  claims["role"] = json!("admin");
  let forged = format!(
    "{}.{}.{}",
    parts[0],
    URL_SAFE_NO_PAD.encode(claims.to_string()),
    parts[2]
  );

  let (status, _) = send(&app, Method::GET, "/api/v1/admin/users", Some(&forged), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Registration and login ──────────────────────────────────────────────────

#[tokio::test]
async fn register_returns_public_projection() {
  let app = router(make_state().await);
  let user = register(&app, "John", "john@x.com", "secret1").await;

  assert_eq!(user["email"], "john@x.com");
  assert_eq!(user["role"], "user");
  assert!(user.get("password_hash").is_none());
  assert!(user.get("password").is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts() {
  let app = router(make_state().await);
  register(&app, "John", "john@x.com", "secret1").await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/auth/register",
    None,
    Some(json!({
      "name": "Johnny",
      "email": "john@x.com",
      "password": "another",
      "password_confirm": "another",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(first_error(&body), ("email", "The email has already been taken"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_for_one_email_conflict() {
  let app = router(make_state().await);

  let attempts: Vec<_> = (0..8)
    .map(|i| {
      let app = app.clone();
      tokio::spawn(async move {
        send(
          &app,
          Method::POST,
          "/api/v1/auth/register",
          None,
          Some(json!({
            "name": format!("Racer {i}"),
            "email": "race@x.com",
            "password": "secret1",
            "password_confirm": "secret1",
          })),
        )
        .await
      })
    })
    .collect();

  let mut created = 0;
  for attempt in attempts {
    let (status, body) = attempt.await.unwrap();
    match status {
      StatusCode::CREATED => created += 1,
      StatusCode::CONFLICT => {
        assert_eq!(first_error(&body), ("email", "The email has already been taken"));
      }
      other => panic!("unexpected {other}: {body}"),
    }
  }
  assert_eq!(created, 1);
}

#[tokio::test]
async fn register_reports_every_bad_field() {
  let app = router(make_state().await);
  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/auth/register",
    None,
    Some(json!({
      "name": "Jo",
      "email": "not-an-email",
      "password": "12345",
      "password_confirm": "54321",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Validation failed");
  let fields: Vec<&str> = body["error"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["field"].as_str().unwrap())
    .collect();
  assert_eq!(fields, ["email", "name", "password", "password_confirm"]);
}

#[tokio::test]
async fn invalid_json_is_a_body_error() {
  let app = router(make_state().await);
  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/v1/auth/login")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let res = app.oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);

  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(first_error(&body).0, "body");
}

#[tokio::test]
async fn bad_login_does_not_reveal_which_part_failed() {
  let app = router(make_state().await);
  register(&app, "John", "john@x.com", "secret1").await;

  for (email, password) in [("john@x.com", "wrong-pass"), ("ghost@x.com", "secret1")] {
    let (status, body) = send(
      &app,
      Method::POST,
      "/api/v1/auth/login",
      None,
      Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Login failed");
    assert_eq!(
      first_error(&body),
      ("credentials", "The provided credentials are invalid")
    );
  }
}

#[tokio::test]
async fn login_then_profile() {
  let app = router(make_state().await);
  let (id, token) = sign_up(&app, "John", "john@x.com").await;

  let (status, body) = send(&app, Method::GET, "/api/v1/profile", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["id"], id);
  assert_eq!(body["data"]["email"], "john@x.com");
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_email_taken_by_someone_else_conflicts() {
  let app = router(make_state().await);
  register(&app, "Alice", "alice@x.com", "secret1").await;
  let (_, token) = sign_up(&app, "Bob", "bob@x.com").await;

  let (status, _) = send(
    &app,
    Method::PUT,
    "/api/v1/profile",
    Some(&token),
    Some(json!({ "email": "alice@x.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, body) = send(
    &app,
    Method::PUT,
    "/api/v1/profile",
    Some(&token),
    Some(json!({ "name": "Robert", "email": "bob@x.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["name"], "Robert");
  assert_eq!(body["data"]["email"], "bob@x.com");
}

#[tokio::test]
async fn change_password_flow() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;

  let (status, body) = send(
    &app,
    Method::PUT,
    "/api/v1/change-password",
    Some(&token),
    Some(json!({
      "old_password": "not-it",
      "new_password": "secret2",
      "new_password_confirm": "secret2",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(first_error(&body), ("old_password", "The old password is incorrect"));

  let (status, body) = send(
    &app,
    Method::PUT,
    "/api/v1/change-password",
    Some(&token),
    Some(json!({
      "old_password": "secret1",
      "new_password": "secret2",
      "new_password_confirm": "secret3",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(first_error(&body).0, "new_password_confirm");

  let (status, _) = send(
    &app,
    Method::PUT,
    "/api/v1/change-password",
    Some(&token),
    Some(json!({
      "old_password": "secret1",
      "new_password": "secret2",
      "new_password_confirm": "secret2",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  login(&app, "john@x.com", "secret2").await;

  // Credentials are not revoked by a password change.
  let (status, _) = send(&app, Method::GET, "/api/v1/profile", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
}

// ─── Role gate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_require_credential_then_role() {
  let state = make_state().await;
  let app = router(state.clone());
  let (id, token) = sign_up(&app, "John", "john@x.com").await;

  let (status, body) = send(&app, Method::GET, "/api/v1/admin/users", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(first_error(&body).0, "authorization");

  let (status, body) = send(&app, Method::GET, "/api/v1/admin/users", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(
    first_error(&body),
    ("permission", "You don't have permission to access this resource")
  );

  let mut identity = state
    .store
    .find_identity_by_id(IdentityId(id))
    .await
    .unwrap()
    .unwrap();
  identity.role = Role::Admin;
  state.store.update_identity(identity).await.unwrap();

  // The old credential still says `user`.
  let (status, _) = send(&app, Method::GET, "/api/v1/admin/users", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let admin_token = login(&app, "john@x.com", "secret1").await;
  let (status, body) =
    send(&app, Method::GET, "/api/v1/admin/users", Some(&admin_token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["data"][0]["role"], "admin");
}

#[tokio::test]
async fn admin_manages_users() {
  let state = make_state().await;
  let app = router(state.clone());
  register(&app, "Admin", "admin@x.com", "secret1").await;
  accounts_grant(&state, "admin@x.com").await;
  let admin = login(&app, "admin@x.com", "secret1").await;

  let (user_id, user_token) = sign_up(&app, "John", "john@x.com").await;
  create_post(&app, &user_token, "Doomed").await;

  let uri = format!("/api/v1/admin/users/{user_id}");
  let (status, body) = send(
    &app,
    Method::PUT,
    &uri,
    Some(&admin),
    Some(json!({ "name": "Johnny" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["name"], "Johnny");
  assert_eq!(body["data"]["email"], "john@x.com");

  let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(&app, Method::GET, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(first_error(&body), ("user", "The user could not be found"));

  let (_, body) = send(&app, Method::GET, "/api/v1/posts", None, None).await;
  assert!(body["data"].as_array().unwrap().is_empty());

  let (status, body) =
    send(&app, Method::GET, "/api/v1/admin/users/abc", Some(&admin), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(first_error(&body), ("id", "The provided ID is invalid"));
}

async fn accounts_grant(state: &AppState<SqliteStore>, email: &str) {
  services::accounts::grant_admin(state.store.as_ref(), email)
    .await
    .unwrap();
}

// ─── Posts and ownership ─────────────────────────────────────────────────────

#[tokio::test]
async fn non_owner_can_read_but_not_mutate() {
  let app = router(make_state().await);
  let (_, owner) = sign_up(&app, "Owner", "owner@x.com").await;
  let (_, other) = sign_up(&app, "Other", "other@x.com").await;
  let post_id = create_post(&app, &owner, "Hello").await;
  let uri = format!("/api/v1/posts/{post_id}");

  let (status, _) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    &app,
    Method::PUT,
    &uri,
    Some(&other),
    Some(json!({ "title": "Hijacked" })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(
    first_error(&body),
    ("ownership", "You don't have permission to modify this resource")
  );

  let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (_, body) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(body["data"]["title"], "Hello");
}

#[tokio::test]
async fn missing_post_is_not_found_even_for_non_owner() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;

  let (status, body) = send(
    &app,
    Method::PUT,
    "/api/v1/posts/999",
    Some(&token),
    Some(json!({ "title": "Nothing" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(first_error(&body), ("post", "The post could not be found"));
}

#[tokio::test]
async fn partial_update_keeps_untouched_fields() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;
  let post_id = create_post(&app, &token, "Original").await;
  let uri = format!("/api/v1/posts/{post_id}");

  let (status, body) = send(
    &app,
    Method::PUT,
    &uri,
    Some(&token),
    Some(json!({ "title": "New" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["title"], "New");
  assert_eq!(body["data"]["content"], "Original content");

  let (status, body) = send(
    &app,
    Method::PUT,
    &uri,
    Some(&token),
    Some(json!({ "title": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["title"], "New");
}

#[tokio::test]
async fn owner_deletes_post() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;
  let post_id = create_post(&app, &token, "Short lived").await;
  let uri = format!("/api/v1/posts/{post_id}");

  let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Post deleted successfully");

  let (status, _) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_by_owner() {
  let app = router(make_state().await);
  let (alice_id, alice) = sign_up(&app, "Alice", "alice@x.com").await;
  let (_, bob) = sign_up(&app, "Bob", "bob@x.com").await;
  create_post(&app, &alice, "Alice one").await;
  create_post(&app, &bob, "Bob one").await;
  create_post(&app, &alice, "Alice two").await;

  let (_, body) = send(&app, Method::GET, "/api/v1/posts/my", Some(&bob), None).await;
  let mine = body["data"].as_array().unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0]["title"], "Bob one");

  let uri = format!("/api/v1/users/{alice_id}/posts");
  let (status, body) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);
  let titles: Vec<&str> = body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["title"].as_str().unwrap())
    .collect();
  assert_eq!(titles, ["Alice two", "Alice one"]);
  assert!(body["data"].as_array().unwrap().iter().all(|p| p["user_id"] == alice_id));

  let (_, body) = send(&app, Method::GET, "/api/v1/posts", None, None).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn posts_embed_their_author() {
  let app = router(make_state().await);
  let (alice_id, alice) = sign_up(&app, "Alice", "alice@x.com").await;
  let (bob_id, bob) = sign_up(&app, "Bob", "bob@x.com").await;
  let post_id = create_post(&app, &alice, "Alice one").await;
  create_post(&app, &bob, "Bob one").await;

  let (_, body) = send(&app, Method::GET, &format!("/api/v1/posts/{post_id}"), None, None).await;
  assert_eq!(body["data"]["user"]["id"], alice_id);
  assert_eq!(body["data"]["user"]["name"], "Alice");
  assert!(body["data"]["user"].get("password_hash").is_none());

  let (_, body) = send(&app, Method::GET, "/api/v1/posts", None, None).await;
  for post in body["data"].as_array().unwrap() {
    let expected = if post["title"] == "Bob one" { bob_id } else { alice_id };
    assert_eq!(post["user"]["id"], expected, "{post}");
    assert_eq!(post["user_id"], expected, "{post}");
  }

  let (status, body) = send(
    &app,
    Method::PUT,
    &format!("/api/v1/posts/{post_id}"),
    Some(&alice),
    Some(json!({ "content": "Rewritten content" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["user"]["email"], "alice@x.com");
}

#[tokio::test]
async fn create_post_validates_lengths() {
  let app = router(make_state().await);
  let (_, token) = sign_up(&app, "John", "john@x.com").await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/api/v1/posts",
    Some(&token),
    Some(json!({ "title": "Hi", "content": "short" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_numeric_post_id_is_invalid() {
  let app = router(make_state().await);
  let (status, body) = send(&app, Method::GET, "/api/v1/posts/abc", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(first_error(&body), ("id", "The provided ID is invalid"));
}
