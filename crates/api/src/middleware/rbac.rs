//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role or
//! permissions do not meet the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cardex_core::error::CoreError;
use cardex_core::roles::{can_modify_clients, ROLE_ADMIN};
use cardex_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `Admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<Value>> {
///     // user is guaranteed to be an admin here
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires permission to edit client records: the `Admin` role or the
/// `can_modify` grant.
///
/// The grant is read from the database on every request so revoking it takes
/// effect without waiting for the token to expire. A token whose user has
/// been deleted is rejected with 401.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let record = UserRepo::find_by_id(&state.pool, user.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        if !can_modify_clients(&record.role, record.can_modify) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Permission to modify clients required".into(),
            )));
        }
        Ok(RequireEditor(user))
    }
}
