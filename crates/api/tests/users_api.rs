//! HTTP-level integration tests for admin user management.

mod common;

use axum::http::StatusCode;
use cardex_api::auth::password::verify_password;
use cardex_db::repositories::UserRepo;
use common::{
    admin_with_token, body_json, create_user, delete_auth, get_auth, post_json_auth,
    put_json_auth, token_for,
};
use serde_json::json;
use sqlx::SqlitePool;

fn new_user(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@cardex.test"),
        "password": "strong_password_1",
        "role": "Manager",
        "can_modify": true,
    })
}

/// Admins create users; the password is stored hashed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user(pool: SqlitePool) {
    let (_admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/api/users", new_user("nadia"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "nadia");
    assert_eq!(json["user"]["role"], "Manager");
    assert_eq!(json["user"]["can_modify"], true);
    assert_eq!(json["user"]["full_name"], "nadia");

    let id = json["user"]["id"].as_i64().unwrap();
    let stored = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(verify_password("strong_password_1", &stored.password_hash).unwrap());
}

/// Duplicate usernames conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_duplicate_user(pool: SqlitePool) {
    let (_admin, token) = admin_with_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/users", new_user("nadia"), &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/users", new_user("nadia"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

/// Bad fields are collected into one validation error.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user_validation(pool: SqlitePool) {
    let (_admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "username": "nadia",
        "email": "nadia",
        "password": "short",
        "role": "Owner",
    });
    let response = post_json_auth(app, "/api/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"].as_array().unwrap().len(), 3);
}

/// Non-admins cannot reach user management.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_require_admin(pool: SqlitePool) {
    let manager = create_user(&pool, "manager", "Manager", true).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/users", &token_for(&manager)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Updates change role and permissions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_user(pool: SqlitePool) {
    let (_admin, token) = admin_with_token(&pool).await;
    let user = create_user(&pool, "nadia", "User", false).await;
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app,
        &format!("/api/users/{}", user.id),
        json!({ "role": "Manager", "can_modify": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "Manager");
    assert_eq!(json["user"]["can_modify"], true);
    assert_eq!(json["user"]["username"], "nadia");

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/users/9999",
        json!({ "role": "Manager" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// An admin cannot delete their own account; others can be removed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user(pool: SqlitePool) {
    let (admin, token) = admin_with_token(&pool).await;
    let user = create_user(&pool, "nadia", "User", false).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/users/{}", admin.id), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(UserRepo::find_by_id(&pool, admin.id).await.unwrap().is_some());

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/users/{}", user.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/users", &token).await).await;
    assert_eq!(json["users"].as_array().unwrap().len(), 1);
}

/// Password resets take effect and respect the minimum length.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password(pool: SqlitePool) {
    let (_admin, token) = admin_with_token(&pool).await;
    let user = create_user(&pool, "nadia", "User", false).await;
    let uri = format!("/api/users/{}/reset-password", user.id);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &uri, json!({ "new_password": "short" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, &uri, json!({ "new_password": "brand_new_secret" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(verify_password("brand_new_secret", &stored.password_hash).unwrap());
}
