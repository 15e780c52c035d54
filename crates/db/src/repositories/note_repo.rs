//! Repository for the `client_notes` table.

use cardex_core::types::DbId;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::note::Note;

const COLUMNS: &str = "id, client_id, actor, note, created_at";

/// Append-only access to admin notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Attach a note to a client. The client must exist.
    pub async fn create(
        pool: &SqlitePool,
        client_id: DbId,
        actor: &str,
        note: &str,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_notes (client_id, actor, note, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(client_id)
            .bind(actor)
            .bind(note)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// List a client's notes, newest first.
    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_notes
             WHERE client_id = ?1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
