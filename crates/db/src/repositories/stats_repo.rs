//! Aggregate queries for the admin dashboard.

use cardex_core::client::ClientStatus;
use chrono::{Datelike, Days, Months, NaiveDate};
use sqlx::SqlitePool;

use crate::models::stats::{ClientStats, GroupTypeCount, MonthlySubmissions, StatusBreakdown};

/// Number of calendar months covered by the submissions series.
pub const MONTHLY_WINDOW: u32 = 12;

/// Look-ahead window for upcoming arrivals, in days.
pub const UPCOMING_WINDOW_DAYS: u64 = 30;

/// Read-only dashboard aggregates.
pub struct StatsRepo;

impl StatsRepo {
    /// Compute dashboard statistics relative to `today`.
    pub async fn compute(pool: &SqlitePool, today: NaiveDate) -> Result<ClientStats, sqlx::Error> {
        let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;

        let total_travelers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM additional_travelers")
            .fetch_one(pool)
            .await?;

        let status_rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM clients GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let mut by_status = StatusBreakdown::default();
        for (status, count) in status_rows {
            match ClientStatus::from_str(&status) {
                Some(ClientStatus::Pending) => by_status.pending = count,
                Some(ClientStatus::Confirmed) => by_status.confirmed = count,
                Some(ClientStatus::Cancelled) => by_status.cancelled = count,
                None => tracing::warn!(%status, count, "Unknown client status in stats"),
            }
        }

        let by_group_type = sqlx::query_as::<_, GroupTypeCount>(
            "SELECT group_type, COUNT(*) AS count FROM clients
             GROUP BY group_type
             ORDER BY count DESC, group_type ASC",
        )
        .fetch_all(pool)
        .await?;

        let monthly_submissions = sqlx::query_as::<_, MonthlySubmissions>(
            "SELECT substr(created_at, 1, 7) AS month,
                    COUNT(*) AS count,
                    SUM(CASE WHEN status = ?2 THEN 1 ELSE 0 END) AS confirmed
             FROM clients
             WHERE substr(created_at, 1, 7) >= ?1
             GROUP BY month
             ORDER BY month ASC",
        )
        .bind(window_start_month(today))
        .bind(ClientStatus::Confirmed.as_str())
        .fetch_all(pool)
        .await?;

        let horizon = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(today);
        let upcoming_arrivals: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clients WHERE arrival_date >= ?1 AND arrival_date <= ?2",
        )
        .bind(today)
        .bind(horizon)
        .fetch_one(pool)
        .await?;

        Ok(ClientStats {
            total_clients,
            by_status,
            total_group_size: total_clients + total_travelers,
            by_group_type,
            monthly_submissions,
            upcoming_arrivals,
        })
    }
}

/// First month (`YYYY-MM`) of the submissions window ending with `today`'s month.
fn window_start_month(today: NaiveDate) -> String {
    let first = today.with_day(1).unwrap_or(today);
    let start = first
        .checked_sub_months(Months::new(MONTHLY_WINDOW - 1))
        .unwrap_or(first);
    start.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn window_covers_twelve_months() {
        assert_eq!(window_start_month(date("2026-10-17")), "2025-11");
        assert_eq!(window_start_month(date("2026-01-31")), "2025-02");
    }
}
