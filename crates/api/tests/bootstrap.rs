//! Tests for first-start seeding of the Admin account.

mod common;

use cardex_api::auth::password::verify_password;
use cardex_api::bootstrap::ensure_default_admin;
use cardex_db::repositories::UserRepo;
use sqlx::SqlitePool;

/// An empty store gets exactly one Admin, and only once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeds_admin_once(pool: SqlitePool) {
    let config = common::test_config("uploads");

    assert!(ensure_default_admin(&pool, &config.default_admin).await.unwrap());
    assert!(!ensure_default_admin(&pool, &config.default_admin).await.unwrap());

    assert_eq!(UserRepo::count_by_role(&pool, "Admin").await.unwrap(), 1);
    let admin = UserRepo::find_by_username(&pool, "admin").await.unwrap().unwrap();
    assert!(admin.can_modify);
    assert!(verify_password("admin_password_1", &admin.password_hash).unwrap());
}

/// An existing Admin suppresses seeding.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_existing_admin_skips_seed(pool: SqlitePool) {
    common::create_user(&pool, "owner", "Admin", true).await;
    let config = common::test_config("uploads");

    assert!(!ensure_default_admin(&pool, &config.default_admin).await.unwrap());
    assert!(UserRepo::find_by_username(&pool, "admin").await.unwrap().is_none());
}
