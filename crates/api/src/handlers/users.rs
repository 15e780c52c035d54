//! Handlers for the `/users` resource (back-office account management).
//!
//! All handlers require the `Admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cardex_core::error::CoreError;
use cardex_core::intake;
use cardex_core::roles::{validate_role, DEFAULT_ROLE};
use cardex_core::types::DbId;
use cardex_db::models::user::{CreateUser, UpdateUser, UserResponse};
use cardex_db::repositories::UserRepo;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::success;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub can_modify: bool,
    #[serde(default)]
    pub can_delete: bool,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Create a new user. Validates the fields, hashes the password and returns
/// the safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let mut errors = Vec::new();

    let username = intake::clean(Some(input.username.as_str()));
    if username.is_none() {
        errors.push("Username is required".to_string());
    }
    let email = intake::clean(Some(input.email.as_str()));
    match &email {
        None => errors.push("Email is required".to_string()),
        Some(e) if !intake::is_valid_email(e) => {
            errors.push("Email address is invalid".to_string())
        }
        Some(_) => {}
    }
    let role = intake::clean(input.role.as_deref()).unwrap_or_else(|| DEFAULT_ROLE.to_string());
    if let Err(msg) = validate_role(&role) {
        errors.push(msg);
    }
    if let Err(msg) = validate_password_strength(&input.password, MIN_PASSWORD_LENGTH) {
        errors.push(msg);
    }

    let (Some(username), Some(email)) = (username, email) else {
        return Err(AppError::Core(CoreError::InvalidInput(errors)));
    };
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(errors)));
    }

    let password_hash = hash_password(&input.password)?;

    let create_dto = CreateUser {
        full_name: intake::clean(input.full_name.as_deref()).unwrap_or_else(|| username.clone()),
        username,
        email,
        password_hash,
        role,
        can_modify: input.can_modify,
        can_delete: input.can_delete,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.user_id, "Created user");

    Ok((
        StatusCode::CREATED,
        success(json!({ "user": UserResponse::from(&user) })),
    ))
}

/// GET /api/users
///
/// List all users, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Value>> {
    let users: Vec<UserResponse> = UserRepo::list(&state.pool)
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();

    Ok(success(json!({ "users": users })))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(success(json!({ "user": UserResponse::from(&user) })))
}

/// PUT /api/users/{id}
///
/// Update a user's profile and permissions (not password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<Value>> {
    let mut errors = Vec::new();

    let username = match input.username.as_deref() {
        Some(raw) => {
            let cleaned = intake::clean(Some(raw));
            if cleaned.is_none() {
                errors.push("Username cannot be empty".to_string());
            }
            cleaned
        }
        None => None,
    };
    let email = intake::clean(input.email.as_deref());
    if let Some(e) = &email {
        if !intake::is_valid_email(e) {
            errors.push("Email address is invalid".to_string());
        }
    }
    if let Some(role) = &input.role {
        if let Err(msg) = validate_role(role) {
            errors.push(msg);
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(errors)));
    }

    let update_dto = UpdateUser {
        username,
        email,
        full_name: intake::clean(input.full_name.as_deref()),
        ..input
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(success(json!({ "user": UserResponse::from(&user) })))
}

/// DELETE /api/users/{id}
///
/// Permanently delete a user. An admin cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "Deleted user");
    Ok(success(json!({ "message": "User deleted" })))
}

/// POST /api/users/{id}/reset-password
///
/// Admin-initiated password reset for a user.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<Value>> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)?;

    let updated = UserRepo::update_password(&state.pool, id, &hashed).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    Ok(success(json!({ "message": "Password updated" })))
}
