#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cardex_api::auth::jwt::{generate_access_token, JwtConfig};
use cardex_api::auth::password::hash_password;
use cardex_api::config::{DefaultAdmin, ServerConfig};
use cardex_api::router::build_app_router;
use cardex_api::state::AppState;
use cardex_db::models::user::{CreateUser, User};
use cardex_db::repositories::UserRepo;

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the given upload directory.
pub fn test_config(upload_dir: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_string(),
        default_admin: DefaultAdmin {
            username: "admin".to_string(),
            email: "admin@cardex.test".to_string(),
            password: "admin_password_1".to_string(),
        },
        log_json: false,
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".to_string(),
            expiry_hours: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let dir = std::env::temp_dir().join("cardex-api-tests");
    build_test_app_with_uploads(pool, &dir.to_string_lossy())
}

/// Same as [`build_test_app`] but writes uploads to `upload_dir`.
pub fn build_test_app_with_uploads(pool: SqlitePool, upload_dir: &str) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &SqlitePool, username: &str, role: &str, can_modify: bool) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@cardex.test"),
        full_name: format!("{username} Tester"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        can_modify,
        can_delete: false,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Issue a token for `user` signed with the test JWT secret.
pub fn token_for(user: &User) -> String {
    let config = test_config("uploads");
    generate_access_token(user.id, &user.username, &user.role, &config.jwt)
        .expect("token generation should succeed")
}

/// Create an Admin account and return it with a valid token.
pub async fn admin_with_token(pool: &SqlitePool) -> (User, String) {
    let admin = create_user(pool, "root", "Admin", true).await;
    let token = token_for(&admin);
    (admin, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Send a pre-built request (multipart bodies, custom headers).
pub async fn send_request(app: Router, request: Request<Body>) -> Response {
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A minimal valid intake submission for one traveler.
pub fn intake_form(full_name: &str, email: &str) -> Value {
    serde_json::json!({
        "full_name": full_name,
        "email": email,
        "phone": "+212600000000",
        "number_of_travelers": 1,
        "gdpr_consent": true,
    })
}

/// Submit `form` and return the new client id.
pub async fn submit(app: Router, form: Value) -> i64 {
    let response = post_json(app, "/api/submit-form", form).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["client_id"]
        .as_i64()
        .expect("client_id should be an integer")
}
