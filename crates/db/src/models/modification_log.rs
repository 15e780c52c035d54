//! Modification log models. Entries are immutable once written.

use cardex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `modification_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModificationLog {
    pub id: DbId,
    pub client_id: DbId,
    pub actor: String,
    pub action: String,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a log entry.
#[derive(Debug, Clone)]
pub struct CreateModificationLog {
    pub client_id: DbId,
    pub actor: String,
    pub action: String,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}
