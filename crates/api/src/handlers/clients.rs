//! Handlers for the admin `/clients` resource.
//!
//! Reads require any authenticated user; edits require [`RequireEditor`].

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::Json;
use cardex_core::client::{self, ArrivalCity, ClientStatus, GroupType};
use cardex_core::error::CoreError;
use cardex_core::export::{build_csv, join_list, CLIENT_EXPORT_HEADERS};
use cardex_core::intake::{self, TravelerForm, MAX_TRAVELERS};
use cardex_core::notes::validate_note_content;
use cardex_core::pagination;
use cardex_core::passport::content_type_for;
use cardex_core::types::DbId;
use cardex_db::models::client::{Client, ClientListItem, UpdateClient};
use cardex_db::repositories::{ClientRepo, ModificationLogRepo, NoteRepo, TravelerRepo};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::query::{ClientListParams, PassportParams};
use crate::response::success;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /clients/{id}/note`.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub note: String,
    /// Display name to record; defaults to the caller's username.
    pub actor: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/clients
///
/// One page of clients, newest first, with search and filters.
pub async fn list_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ClientListParams>,
) -> AppResult<Json<Value>> {
    let page = pagination::clamp_page(params.page);
    let per_page = pagination::clamp_per_page(params.per_page);

    let (clients, total_count) =
        ClientRepo::list(&state.pool, &params.filter(), page, per_page).await?;

    Ok(success(json!({
        "clients": clients,
        "total_pages": pagination::total_pages(total_count, per_page),
        "current_page": page,
        "per_page": per_page,
        "total_count": total_count,
    })))
}

/// GET /api/clients/export
///
/// Every client matching the list filters as a CSV attachment.
pub async fn export_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ClientListParams>,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 2], String)> {
    let items = ClientRepo::list_all(&state.pool, &params.filter()).await?;
    let rows: Vec<Vec<String>> = items.iter().map(export_row).collect();
    let csv = build_csv(CLIENT_EXPORT_HEADERS, &rows);

    tracing::info!(user_id = user.user_id, rows = rows.len(), "Exported clients");

    let filename = format!("clients_{}.csv", Utc::now().format("%Y%m%d"));
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

// ---------------------------------------------------------------------------
// Single client
// ---------------------------------------------------------------------------

/// GET /api/clients/{id}
///
/// The client with its travelers, notes and history. Related lists that fail
/// to load are logged and returned empty rather than failing the request.
pub async fn get_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    let client = find_client(&state, id).await?;

    let travelers = TravelerRepo::list_by_client(&state.pool, id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(client_id = id, error = %e, "Failed to load travelers");
            Vec::new()
        });
    let notes = NoteRepo::list_by_client(&state.pool, id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(client_id = id, error = %e, "Failed to load notes");
            Vec::new()
        });
    let history = ModificationLogRepo::list_by_client(&state.pool, id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(client_id = id, error = %e, "Failed to load history");
            Vec::new()
        });

    Ok(success(json!({
        "client": client,
        "travelers": travelers,
        "notes": notes,
        "history": history,
    })))
}

/// PUT /api/clients/{id}
///
/// Partial update. Every change is recorded in the modification log under
/// the caller's username.
pub async fn update_client(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Value>> {
    let existing = find_client(&state, id).await?;
    let party_size = TravelerRepo::count_by_client(&state.pool, id).await? + 1;
    let input = normalize_update(input, &existing, party_size)
        .map_err(|errors| AppError::Core(CoreError::InvalidInput(errors)))?;

    let client = ClientRepo::update(&state.pool, id, &input, Some(&user.username))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;

    if existing.status != client.status {
        tracing::info!(
            client_id = id,
            from = %existing.status,
            to = %client.status,
            actor = %user.username,
            "Client status changed"
        );
    }

    Ok(success(json!({ "client": client })))
}

/// DELETE /api/clients/{id}
///
/// Client records are never removed; always 501.
pub async fn delete_client(_user: AuthUser, Path(id): Path<DbId>) -> AppResult<Json<Value>> {
    tracing::info!(client_id = id, "Rejected client deletion");
    Err(AppError::NotImplemented(
        "Deleting clients is not supported".into(),
    ))
}

// ---------------------------------------------------------------------------
// Travelers
// ---------------------------------------------------------------------------

/// GET /api/clients/{id}/travelers
pub async fn list_travelers(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    find_client(&state, id).await?;
    let travelers = TravelerRepo::list_by_client(&state.pool, id).await?;
    Ok(success(json!({ "travelers": travelers })))
}

/// POST /api/clients/{id}/travelers
///
/// Add a traveler to an existing party. The traveler is numbered after the
/// current party and the client's traveler count follows.
pub async fn add_traveler(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(form): Json<TravelerForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let party_size = find_client(&state, id).await?.number_of_travelers;
    if party_size >= MAX_TRAVELERS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A party cannot exceed {MAX_TRAVELERS} travelers"
        ))));
    }

    let number = TravelerRepo::next_number(&state.pool, id).await?;
    let draft = intake::validate_traveler(number, &form)
        .map_err(|errors| AppError::Core(CoreError::InvalidInput(errors)))?;

    let traveler = TravelerRepo::create(&state.pool, id, &draft, &user.username)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;

    tracing::info!(
        client_id = id,
        traveler_number = traveler.traveler_number,
        actor = %user.username,
        "Added traveler"
    );

    Ok((StatusCode::CREATED, success(json!({ "traveler": traveler }))))
}

// ---------------------------------------------------------------------------
// Notes and history
// ---------------------------------------------------------------------------

/// POST /api/clients/{id}/note
pub async fn add_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let text = input.note.trim();
    validate_note_content(text).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    find_client(&state, id).await?;

    let actor = intake::clean(input.actor.as_deref()).unwrap_or(user.username);
    let note = NoteRepo::create(&state.pool, id, &actor, text).await?;

    Ok((StatusCode::CREATED, success(json!({ "note": note }))))
}

/// GET /api/clients/{id}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    find_client(&state, id).await?;
    let notes = NoteRepo::list_by_client(&state.pool, id).await?;
    Ok(success(json!({ "notes": notes })))
}

/// GET /api/clients/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    find_client(&state, id).await?;
    let history = ModificationLogRepo::list_by_client(&state.pool, id).await?;
    Ok(success(json!({ "history": history })))
}

// ---------------------------------------------------------------------------
// Passport download
// ---------------------------------------------------------------------------

/// GET /api/clients/{id}/passport?traveler_id=
///
/// Stream the stored passport document of the client, or of one of its
/// travelers when `traveler_id` is given.
pub async fn download_passport(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<PassportParams>,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 2], Vec<u8>)> {
    let client = find_client(&state, id).await?;

    let stored = match params.traveler_id {
        Some(traveler_id) => {
            let traveler = TravelerRepo::find_by_id(&state.pool, traveler_id)
                .await?
                .filter(|t| t.client_id == id)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Traveler",
                    id: traveler_id,
                }))?;
            traveler.passport_filename.zip(traveler.passport_path)
        }
        None => client.passport_filename.zip(client.passport_path),
    };

    let (filename, path) = stored.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Passport",
        id,
    }))?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(client_id = id, path = %path, error = %e, "Passport file unreadable");
        AppError::Core(CoreError::NotFound {
            entity: "Passport",
            id,
        })
    })?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type_for(&filename).to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_client(state: &AppState, id: DbId) -> AppResult<Client> {
    ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
}

/// Trim text fields and check an update against `existing`.
///
/// Required contact fields may not be blanked, enumerations must hold known
/// labels and the merged arrival/departure dates must stay ordered.
///
/// `party_size` is the stored traveler rows plus the primary contact. The
/// traveler count only grows through `add_traveler`, so any other value is
/// refused.
fn normalize_update(
    input: UpdateClient,
    existing: &Client,
    party_size: i64,
) -> Result<UpdateClient, Vec<String>> {
    let mut errors = Vec::new();

    let mut required = |label: &str, value: Option<String>| -> Option<String> {
        let value = value?;
        let cleaned = intake::clean(Some(value.as_str()));
        if cleaned.is_none() {
            errors.push(format!("{label} cannot be empty"));
        }
        cleaned
    };
    let full_name = required("Full name", input.full_name);
    let email = required("Email", input.email);
    let phone = required("Phone number", input.phone);

    if let Some(e) = &email {
        if !intake::is_valid_email(e) {
            errors.push("Email address is invalid".to_string());
        }
    }

    if let Some(n) = input.number_of_travelers {
        if n != party_size {
            errors.push(format!(
                "Number of travelers must stay at {party_size}; add travelers to grow the party"
            ));
        }
    }

    let mut label = |field: &str, value: Option<String>, allowed: &[&str]| -> Option<String> {
        let value = intake::clean(value.as_deref())?;
        if let Err(msg) = client::validate_label(field, &value, allowed) {
            errors.push(msg);
        }
        Some(value)
    };
    let status = label("status", input.status, ClientStatus::ALL);
    let group_type = label("group type", input.group_type, GroupType::ALL);
    let city_of_arrival = label("city of arrival", input.city_of_arrival, ArrivalCity::ALL);
    let preferred_language = label(
        "preferred language",
        input.preferred_language,
        client::LANGUAGES,
    );

    let arrival = input.arrival_date.or(existing.arrival_date);
    let departure = input.departure_date.or(existing.departure_date);
    if let Err(msg) = intake::check_date_order(arrival, departure) {
        errors.push(msg);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UpdateClient {
        full_name,
        email,
        phone,
        number_of_travelers: input.number_of_travelers,
        group_type,
        occasion_description: intake::clean(input.occasion_description.as_deref()),
        arrival_date: input.arrival_date,
        departure_date: input.departure_date,
        flight_number: intake::clean(input.flight_number.as_deref()),
        arrival_time: intake::clean(input.arrival_time.as_deref()),
        city_of_arrival,
        preferred_language,
        custom_activities: intake::clean(input.custom_activities.as_deref()),
        food_preferences: intake::clean(input.food_preferences.as_deref()),
        additional_inquiries: intake::clean(input.additional_inquiries.as_deref()),
        status,
    })
}

/// One CSV row in [`CLIENT_EXPORT_HEADERS`] order.
fn export_row(item: &ClientListItem) -> Vec<String> {
    let c = &item.client;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let date = |v: Option<chrono::NaiveDate>| v.map(|d| d.to_string()).unwrap_or_default();

    vec![
        c.id.to_string(),
        c.full_name.clone(),
        c.email.clone(),
        c.phone.clone(),
        c.number_of_travelers.to_string(),
        text(&c.group_type),
        text(&c.occasion_description),
        date(c.arrival_date),
        date(c.departure_date),
        text(&c.flight_number),
        text(&c.arrival_time),
        text(&c.city_of_arrival),
        join_list(&c.dietary_restrictions.0),
        join_list(&c.accessibility_needs.0),
        text(&c.preferred_language),
        c.status.clone(),
        item.traveler_count.to_string(),
        c.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        c.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    ]
}
