use sqlx::SqlitePool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    cardex_db::health_check(&pool).await.unwrap();

    let tables = [
        "clients",
        "users",
        "additional_travelers",
        "client_notes",
        "modification_log",
    ];

    for table in tables {
        let found: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
                .bind(table)
                .fetch_optional(&pool)
                .await
                .unwrap_or_else(|e| panic!("{table} lookup failed: {e}"));
        assert!(found.is_some(), "{table} should exist after migrations");
    }
}

/// Foreign keys must be enforced on pooled connections.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys_enforced(pool: SqlitePool) {
    let result = sqlx::query(
        "INSERT INTO client_notes (client_id, actor, note, created_at)
         VALUES (9999, 'admin', 'orphan', '2026-01-01T00:00:00+00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "note for a missing client must be rejected");
}

/// Status values outside the workflow vocabulary are rejected by the schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_check_constraint(pool: SqlitePool) {
    let result = sqlx::query(
        "INSERT INTO clients (full_name, email, phone, status, created_at, updated_at)
         VALUES ('A', 'a@example.com', '1', 'Archived',
                 '2026-01-01T00:00:00+00:00', '2026-01-01T00:00:00+00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

/// Departure must fall strictly after arrival when both are present.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_date_order_check_constraint(pool: SqlitePool) {
    let result = sqlx::query(
        "INSERT INTO clients (full_name, email, phone, arrival_date, departure_date,
                              created_at, updated_at)
         VALUES ('A', 'a@example.com', '1', '2026-06-10', '2026-06-10',
                 '2026-01-01T00:00:00+00:00', '2026-01-01T00:00:00+00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
