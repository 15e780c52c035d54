//! Repository for the `modification_log` table.

use cardex_core::types::DbId;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::modification_log::{CreateModificationLog, ModificationLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, client_id, actor, action, field_changed, old_value, new_value, created_at";

/// Append-only access to the client audit trail.
pub struct ModificationLogRepo;

impl ModificationLogRepo {
    /// Append a single entry.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateModificationLog,
    ) -> Result<ModificationLog, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut conn, input).await
    }

    /// Append an entry on an existing connection (usually a transaction).
    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        input: &CreateModificationLog,
    ) -> Result<ModificationLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO modification_log
                (client_id, actor, action, field_changed, old_value, new_value, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModificationLog>(&query)
            .bind(input.client_id)
            .bind(&input.actor)
            .bind(&input.action)
            .bind(&input.field_changed)
            .bind(&input.old_value)
            .bind(&input.new_value)
            .bind(Utc::now())
            .fetch_one(conn)
            .await
    }

    /// List a client's history, newest first.
    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<ModificationLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM modification_log
             WHERE client_id = ?1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ModificationLog>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
