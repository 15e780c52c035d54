//! Handler for the admin dashboard statistics.

use axum::extract::State;
use axum::Json;
use cardex_db::repositories::StatsRepo;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::success;
use crate::state::AppState;

/// GET /api/stats
///
/// Totals, status breakdown, group-type distribution, monthly submissions
/// and upcoming arrivals, relative to today's UTC date.
pub async fn get_stats(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Value>> {
    let stats = StatsRepo::compute(&state.pool, Utc::now().date_naive()).await?;
    Ok(success(json!({ "stats": stats })))
}
