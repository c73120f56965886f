// SPDX-License-Identifier: MIT

//! Daily step routes, including the record/streak summary.

use crate::error::{AppError, Result};
use crate::models::{StepEntry, StreakResult};
use crate::routes::extract::{ensure_owner, not_blank, parse_id, require_profile, ValidJson};
use crate::routes::{DateBoundsQuery, SuccessResponse};
use crate::services::compute_streak_and_record;
use crate::time_utils::{parse_date, parse_optional_bounds};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profiles/{user_id}/steps",
            get(list_steps).post(record_steps),
        )
        .route(
            "/api/profiles/{user_id}/steps/{step_id}",
            put(update_steps).delete(delete_steps),
        )
}

#[derive(Deserialize, Validate)]
struct StepRequest {
    #[validate(custom(function = "not_blank", message = "Date is required"))]
    date: String,
    #[validate(range(min = 0, message = "Steps must be a non-negative integer"))]
    steps: i64,
}

/// Step history plus the summary computed over it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StepsResponse {
    pub entries: Vec<StepEntry>,
    #[serde(flatten)]
    pub summary: StreakResult,
}

/// Convert a validated count into storage width.
pub(crate) fn to_count(value: i64, what: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", what)))
}

async fn list_steps(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<DateBoundsQuery>,
) -> Result<Json<StepsResponse>> {
    let user_id = require_profile(&state, &user_id).await?;
    let (start, end) = parse_optional_bounds(params.start.as_deref(), params.end.as_deref())?;

    let entries = state.store.find_steps(user_id, start, end).await?;
    let summary = compute_streak_and_record(&entries);

    tracing::debug!(
        user_id = %user_id,
        entries = entries.len(),
        record = summary.record,
        best_streak = summary.best_streak,
        "Fetched steps"
    );

    Ok(Json(StepsResponse { entries, summary }))
}

/// Create or overwrite the entry for a day.
async fn record_steps(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidJson(body): ValidJson<StepRequest>,
) -> Result<(StatusCode, Json<StepEntry>)> {
    let user_id = require_profile(&state, &user_id).await?;
    let date = parse_date(&body.date, "Date")?;
    let steps = to_count(body.steps, "Steps")?;

    let entry = state.store.upsert_steps(user_id, date, steps).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_steps(
    State(state): State<Arc<AppState>>,
    Path((user_id, step_id)): Path<(String, String)>,
    ValidJson(body): ValidJson<StepRequest>,
) -> Result<Json<StepEntry>> {
    let user_id = require_profile(&state, &user_id).await?;
    let step_id = parse_id(&step_id, "step ID")?;
    let date = parse_date(&body.date, "Date")?;
    let steps = to_count(body.steps, "Steps")?;

    let existing = state
        .store
        .get_step(step_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Step record not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "step record")?;

    let entry = state
        .store
        .update_step(step_id, date, steps)
        .await?
        .ok_or_else(|| AppError::NotFound("Step record not found".to_string()))?;
    Ok(Json(entry))
}

async fn delete_steps(
    State(state): State<Arc<AppState>>,
    Path((user_id, step_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    let user_id = require_profile(&state, &user_id).await?;
    let step_id = parse_id(&step_id, "step ID")?;

    let existing = state
        .store
        .get_step(step_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Step record not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "step record")?;

    if !state.store.remove_step(step_id).await? {
        return Err(AppError::NotFound("Step record not found".to_string()));
    }

    tracing::info!(user_id = %user_id, step_id = %step_id, "Step record deleted");
    Ok(Json(SuccessResponse::with_message(
        "Step record deleted successfully",
    )))
}
