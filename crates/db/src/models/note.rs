//! Client note model. Notes are append-only (no `updated_at`).

use cardex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `client_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub client_id: DbId,
    pub actor: String,
    pub note: String,
    pub created_at: Timestamp,
}
