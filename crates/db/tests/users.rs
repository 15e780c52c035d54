use cardex_db::models::user::{CreateUser, UpdateUser};
use cardex_db::repositories::UserRepo;
use sqlx::SqlitePool;

fn new_user(username: &str, email: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: email.to_string(),
        full_name: format!("{username} Example"),
        password_hash: "$argon2id$placeholder".to_string(),
        role: role.to_string(),
        can_modify: false,
        can_delete: false,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_lookup(pool: SqlitePool) {
    let user = UserRepo::create(&pool, &new_user("layla", "layla@example.com", "Manager"))
        .await
        .unwrap();
    assert_eq!(user.role, "Manager");
    assert!(user.last_login_at.is_none());

    let by_name = UserRepo::find_by_username(&pool, "LAYLA").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));

    let by_email = UserRepo::find_by_email(&pool, "Layla@Example.com")
        .await
        .unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    assert_eq!(UserRepo::count_by_role(&pool, "Manager").await.unwrap(), 1);
    assert_eq!(UserRepo::count_by_role(&pool, "Admin").await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_username_unique_case_insensitive(pool: SqlitePool) {
    UserRepo::create(&pool, &new_user("omar", "omar@example.com", "User"))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("OMAR", "other@example.com", "User"))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete(pool: SqlitePool) {
    let user = UserRepo::create(&pool, &new_user("nadia", "nadia@example.com", "User"))
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            role: Some("Manager".to_string()),
            can_modify: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.role, "Manager");
    assert!(updated.can_modify);
    assert_eq!(updated.username, "nadia");

    assert!(UserRepo::update_password(&pool, user.id, "$argon2id$new")
        .await
        .unwrap());
    UserRepo::update_last_login(&pool, user.id).await.unwrap();
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.password_hash, "$argon2id$new");
    assert!(reloaded.last_login_at.is_some());

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(UserRepo::list(&pool).await.unwrap().is_empty());
}
