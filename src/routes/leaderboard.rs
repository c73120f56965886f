// SPDX-License-Identifier: MIT

//! Leaderboard routes: the current week, or a caller-chosen range.

use crate::error::{AppError, Result};
use crate::models::LeaderboardEntry;
use crate::routes::extract::require_profile;
use crate::time_utils::{parse_iso_instant, DateRange};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard/{user_id}", get(weekly_leaderboard))
        .route("/api/leaderboard/{user_id}/custom", get(custom_leaderboard))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomRangeQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardData {
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(flatten)]
    pub range: DateRange,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub data: LeaderboardData,
}

async fn leaderboard_for(
    state: &AppState,
    raw_user_id: &str,
    range: DateRange,
) -> Result<Json<LeaderboardResponse>> {
    let user_id = require_profile(state, raw_user_id).await?;
    let leaderboard = state.leaderboard_service.compute(user_id, range).await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        data: LeaderboardData { leaderboard, range },
    }))
}

/// Leaderboard for the Sunday..Saturday week containing today (UTC).
async fn weekly_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<LeaderboardResponse>> {
    let range = DateRange::current_week(chrono::Utc::now());
    leaderboard_for(&state, &user_id, range).await
}

async fn custom_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<CustomRangeQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let range = parse_custom_range(&params)?;
    leaderboard_for(&state, &user_id, range).await
}

/// Bounds are ordered as instants, then reduced to UTC calendar dates.
fn parse_custom_range(params: &CustomRangeQuery) -> Result<DateRange> {
    let required = |raw: Option<&str>, what: &str| {
        raw.ok_or_else(|| AppError::BadRequest(format!("Valid {} (ISO8601) is required", what)))
            .and_then(|s| parse_iso_instant(s, what))
    };
    let start = required(params.start_date.as_deref(), "startDate")?;
    let end = required(params.end_date.as_deref(), "endDate")?;
    DateRange::from_instants(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn params(start: Option<&str>, end: Option<&str>) -> CustomRangeQuery {
        CustomRangeQuery {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    #[test]
    fn test_custom_range_accepts_dates_and_datetimes() {
        let range =
            parse_custom_range(&params(Some("2024-01-07"), Some("2024-01-13T23:59:59Z"))).unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }

    #[test]
    fn test_custom_range_compares_mixed_offsets_as_instants() {
        // End is six hours after start even though its local date is earlier
        let range = parse_custom_range(&params(
            Some("2024-01-03T00:00:00+10:00"),
            Some("2024-01-02T20:00:00Z"),
        ))
        .unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        // End is six hours before start even though its local date is later
        let err = parse_custom_range(&params(
            Some("2024-01-02T23:00:00-08:00"),
            Some("2024-01-03T01:00:00Z"),
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_custom_range_requires_both_bounds() {
        let err = parse_custom_range(&params(Some("2024-01-07"), None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("endDate")));
    }

    #[test]
    fn test_custom_range_rejects_reversed() {
        let err = parse_custom_range(&params(Some("2024-01-13"), Some("2024-01-07"))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
