//! Handler for the public intake form.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cardex_core::error::CoreError;
use cardex_core::intake::{validate_submission, IntakeForm};
use cardex_db::repositories::ClientRepo;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::response::success;
use crate::state::AppState;

/// POST /api/submit-form
///
/// Validate the whole form and store the client, its additional travelers
/// and a `Created` audit entry in one transaction. Nothing is persisted when
/// validation fails; the response lists every violation.
pub async fn submit_form(
    State(state): State<AppState>,
    payload: Result<Json<IntakeForm>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(form) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let intake = validate_submission(&form).map_err(|errors| {
        tracing::info!(error_count = errors.len(), "Rejected intake submission");
        AppError::Core(CoreError::InvalidInput(errors))
    })?;

    let (client, travelers) =
        ClientRepo::create_with_travelers(&state.pool, &intake.client, &intake.travelers).await?;

    tracing::info!(
        client_id = client.id,
        travelers = travelers.len(),
        "Stored intake submission"
    );

    Ok((
        StatusCode::CREATED,
        success(json!({
            "client_id": client.id,
            "message": "Form submitted successfully",
        })),
    ))
}
