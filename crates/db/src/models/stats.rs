//! Dashboard aggregate shapes.

use serde::Serialize;
use sqlx::FromRow;

/// Client counts per workflow status. Absent statuses count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusBreakdown {
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
}

/// Number of clients with a given group type (`None` for unspecified).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupTypeCount {
    pub group_type: Option<String>,
    pub count: i64,
}

/// Submissions received in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlySubmissions {
    pub month: String,
    pub count: i64,
    pub confirmed: i64,
}

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub total_clients: i64,
    pub by_status: StatusBreakdown,
    /// Clients plus their additional travelers.
    pub total_group_size: i64,
    pub by_group_type: Vec<GroupTypeCount>,
    /// Last twelve months, oldest first; months without submissions are omitted.
    pub monthly_submissions: Vec<MonthlySubmissions>,
    /// Clients arriving within the next 30 days (inclusive of today).
    pub upcoming_arrivals: i64,
}
