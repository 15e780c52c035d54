//! Handlers for the `/auth` resource (login, current user).

use axum::extract::State;
use axum::Json;
use cardex_core::error::CoreError;
use cardex_db::models::user::UserResponse;
use cardex_db::repositories::UserRepo;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::success;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`. `username` may also be an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username (or email) + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let login = input.username.trim();
    if login.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username and password are required".into(),
        )));
    }

    // 1. Find user by username, falling back to email.
    let mut user = UserRepo::find_by_username(&state.pool, login).await?;
    if user.is_none() && login.contains('@') {
        user = UserRepo::find_by_email(&state.pool, login).await?;
    }
    let user = user.ok_or_else(invalid)?;

    // 2. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    // 3. Record the login and issue a token.
    UserRepo::update_last_login(&state.pool, user.id).await?;

    let token = generate_access_token(user.id, &user.username, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(success(json!({
        "token": token,
        "expires_in": state.config.jwt.expiry_secs(),
        "user": UserResponse::from(&user),
    })))
}

/// GET /api/auth/me
///
/// The account behind the presented token.
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<Value>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(success(json!({ "user": UserResponse::from(&user) })))
}
