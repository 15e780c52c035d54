//! Shared query parameter types for API handlers.

use cardex_db::models::client::ClientFilter;
use chrono::NaiveDate;
use serde::Deserialize;

/// Listing parameters for `GET /clients` and `GET /clients/export`
/// (`?page=&per_page=&search=&status=&group_type=&arrival_from=&arrival_to=`).
///
/// Page values are clamped by the handler via `cardex_core::pagination`.
/// Empty strings are treated as absent so a blank filter box matches everything.
#[derive(Debug, Default, Deserialize)]
pub struct ClientListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub group_type: Option<String>,
    pub arrival_from: Option<NaiveDate>,
    pub arrival_to: Option<NaiveDate>,
}

impl ClientListParams {
    /// The repository filter described by these parameters.
    pub fn filter(&self) -> ClientFilter {
        ClientFilter {
            search: non_blank(&self.search),
            status: non_blank(&self.status),
            group_type: non_blank(&self.group_type),
            arrival_from: self.arrival_from,
            arrival_to: self.arrival_to,
        }
    }
}

/// Query parameters for passport download (`?traveler_id=`).
#[derive(Debug, Deserialize)]
pub struct PassportParams {
    pub traveler_id: Option<i64>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
