//! Client entity model and DTOs.

use cardex_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Validated intake fields double as the insert DTO.
pub use cardex_core::intake::ClientDraft as CreateClient;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<i64>,
    pub number_of_travelers: i64,
    pub group_type: Option<String>,
    pub occasion_description: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
    pub dietary_restrictions: Json<Vec<String>>,
    pub accessibility_needs: Json<Vec<String>>,
    pub preferred_language: Option<String>,
    pub custom_activities: Option<String>,
    pub food_preferences: Option<String>,
    pub additional_inquiries: Option<String>,
    pub gdpr_consent: bool,
    pub status: String,
    pub passport_filename: Option<String>,
    /// Server-side storage path; never exposed.
    #[serde(skip_serializing)]
    pub passport_path: Option<String>,
    pub passport_uploaded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    /// Render a tracked column for the modification log.
    ///
    /// Returns `None` both for NULL values and for columns that are not
    /// tracked individually.
    pub fn tracked_value(&self, field: &str) -> Option<String> {
        match field {
            "full_name" => Some(self.full_name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => Some(self.phone.clone()),
            "number_of_travelers" => Some(self.number_of_travelers.to_string()),
            "group_type" => self.group_type.clone(),
            "occasion_description" => self.occasion_description.clone(),
            "arrival_date" => self.arrival_date.map(|d| d.to_string()),
            "departure_date" => self.departure_date.map(|d| d.to_string()),
            "flight_number" => self.flight_number.clone(),
            "arrival_time" => self.arrival_time.clone(),
            "city_of_arrival" => self.city_of_arrival.clone(),
            "preferred_language" => self.preferred_language.clone(),
            _ => None,
        }
    }
}

/// A client row with its additional-traveler count, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub client: Client,
    pub traveler_count: i64,
}

/// DTO for updating a client. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub number_of_travelers: Option<i64>,
    pub group_type: Option<String>,
    pub occasion_description: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
    pub preferred_language: Option<String>,
    pub custom_activities: Option<String>,
    pub food_preferences: Option<String>,
    pub additional_inquiries: Option<String>,
    pub status: Option<String>,
}

/// Conjunctive filter for client listing. `None` fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    /// Case-insensitive substring over name, email and phone.
    pub search: Option<String>,
    pub status: Option<String>,
    pub group_type: Option<String>,
    /// Inclusive lower bound on `arrival_date`.
    pub arrival_from: Option<NaiveDate>,
    /// Inclusive upper bound on `arrival_date`.
    pub arrival_to: Option<NaiveDate>,
}

/// Passport document metadata written after a successful upload.
#[derive(Debug, Clone)]
pub struct PassportUpload {
    pub filename: String,
    pub path: String,
    pub uploaded_at: Timestamp,
}
