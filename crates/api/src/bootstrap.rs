//! First-start seeding of the back-office Admin account.

use cardex_core::roles::ROLE_ADMIN;
use cardex_db::models::user::CreateUser;
use cardex_db::repositories::UserRepo;
use cardex_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::DefaultAdmin;
use crate::error::AppResult;

/// Create the configured Admin account when no Admin exists yet.
///
/// Returns `true` if an account was created.
pub async fn ensure_default_admin(pool: &DbPool, admin: &DefaultAdmin) -> AppResult<bool> {
    if UserRepo::count_by_role(pool, ROLE_ADMIN).await? > 0 {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)?;

    let input = CreateUser {
        username: admin.username.clone(),
        email: admin.email.clone(),
        full_name: "Administrator".to_string(),
        password_hash,
        role: ROLE_ADMIN.to_string(),
        can_modify: true,
        can_delete: true,
    };
    let user = UserRepo::create(pool, &input).await?;

    tracing::warn!(
        user_id = user.id,
        username = %user.username,
        "Seeded default Admin account; change its password after first login"
    );
    Ok(true)
}
