//! Handler for passport document uploads from the intake form.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use cardex_core::audit::SYSTEM_ACTOR;
use cardex_core::error::CoreError;
use cardex_core::passport::{self, UploadTarget};
use cardex_core::types::DbId;
use cardex_db::models::client::PassportUpload;
use cardex_db::repositories::{ClientRepo, TravelerRepo};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::response::success;
use crate::state::AppState;

/// POST /api/upload
///
/// Multipart fields: `file` (required), `file_type` (`client` or `traveler`),
/// `client_id`, and `traveler_id` when `file_type` is `traveler`.
///
/// The document is written under the configured upload directory before the
/// record is updated; if the record update fails the file is removed again.
/// A document it replaces is removed after the record points at the new one.
pub async fn upload_passport(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let mut file_data: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut file_type: Option<String> = None;
    let mut client_id: Option<String> = None;
    let mut traveler_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("passport").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, content_type, data.to_vec()));
            }
            "file_type" | "client_id" | "traveler_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let slot = match name.as_str() {
                    "file_type" => &mut file_type,
                    "client_id" => &mut client_id,
                    _ => &mut traveler_id,
                };
                *slot = Some(text.trim().to_string());
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, content_type, data) =
        file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    let target = match file_type.as_deref() {
        None | Some("") => UploadTarget::Client,
        Some(t) => UploadTarget::from_str(t).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid file_type '{t}'. Must be 'client' or 'traveler'"
            ))
        })?,
    };
    let client_id = parse_id("client_id", client_id.as_deref())?
        .ok_or_else(|| AppError::BadRequest("client_id is required".into()))?;
    let traveler_id = parse_id("traveler_id", traveler_id.as_deref())?;
    if target == UploadTarget::Traveler && traveler_id.is_none() {
        return Err(AppError::BadRequest(
            "traveler_id is required for traveler uploads".into(),
        ));
    }

    let ext = passport::validate_upload(&filename, content_type.as_deref(), data.len())
        .map_err(AppError::BadRequest)?;

    let Some(client) = ClientRepo::find_by_id(&state.pool, client_id).await? else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }));
    };

    // -- Write the file -----------------------------------------------------

    let upload_dir = PathBuf::from(&state.config.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let owner = match target {
        UploadTarget::Client => None,
        UploadTarget::Traveler => traveler_id,
    };
    let previous = match owner {
        None => client.passport_path,
        Some(tid) => TravelerRepo::find_by_id(&state.pool, tid)
            .await?
            .filter(|t| t.client_id == client_id)
            .and_then(|t| t.passport_path),
    };

    let stored_name = passport::stored_filename(
        target,
        client_id,
        owner,
        Utc::now().timestamp_millis(),
        &ext,
    );
    let file_path = upload_dir.join(&stored_name);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    // -- Record it ------------------------------------------------------------

    let upload = PassportUpload {
        filename: stored_name.clone(),
        path: file_path.to_string_lossy().to_string(),
        uploaded_at: Utc::now(),
    };

    let recorded = match owner {
        None => ClientRepo::attach_passport(&state.pool, client_id, &upload, SYSTEM_ACTOR)
            .await
            .map(|c| c.is_some()),
        Some(tid) => {
            TravelerRepo::attach_passport(&state.pool, client_id, tid, &upload, SYSTEM_ACTOR)
                .await
                .map(|t| t.is_some())
        }
    };

    match recorded {
        Ok(true) => {}
        Ok(false) => {
            discard(&file_path).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: if owner.is_some() { "Traveler" } else { "Client" },
                id: owner.unwrap_or(client_id),
            }));
        }
        Err(e) => {
            discard(&file_path).await;
            return Err(e.into());
        }
    }

    // The replaced document goes only once the new one is on record.
    if let Some(previous) = previous.filter(|p| Path::new(p) != file_path) {
        discard(Path::new(&previous)).await;
    }

    tracing::info!(
        client_id,
        traveler_id = ?owner,
        filename = %stored_name,
        bytes = data.len(),
        "Stored passport document"
    );

    Ok((
        StatusCode::CREATED,
        success(json!({
            "filename": stored_name,
            "message": "File uploaded successfully",
        })),
    ))
}

fn parse_id(field: &str, value: Option<&str>) -> AppResult<Option<DbId>> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{field} must be an integer"))),
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale upload");
    }
}
