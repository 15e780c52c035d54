//! Additional traveler model.

use cardex_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Validated traveler fields double as the insert DTO.
pub use cardex_core::intake::TravelerDraft as CreateTraveler;

/// A row from the `additional_travelers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Traveler {
    pub id: DbId,
    pub client_id: DbId,
    pub traveler_number: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub age_group: Option<String>,
    pub relationship: Option<String>,
    pub dietary_restrictions: Json<Vec<String>>,
    pub special_notes: Option<String>,
    pub has_different_travel: bool,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
    pub passport_filename: Option<String>,
    #[serde(skip_serializing)]
    pub passport_path: Option<String>,
    pub passport_uploaded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
