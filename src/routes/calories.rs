// SPDX-License-Identifier: MIT

//! Daily calorie routes.

use crate::error::{AppError, Result};
use crate::models::CalorieEntry;
use crate::routes::extract::{ensure_owner, not_blank, parse_id, require_profile, ValidJson};
use crate::routes::steps::to_count;
use crate::routes::{DateBoundsQuery, SuccessResponse};
use crate::time_utils::{parse_date, parse_optional_bounds};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profiles/{user_id}/calories",
            get(list_calories).post(record_calories),
        )
        .route(
            "/api/profiles/{user_id}/calories/{calorie_id}",
            delete(delete_calories),
        )
}

#[derive(Deserialize, Validate)]
struct CalorieRequest {
    #[validate(custom(function = "not_blank", message = "Date is required"))]
    date: String,
    #[validate(range(min = 0, message = "Calories must be a non-negative integer"))]
    calories: i64,
}

async fn list_calories(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<DateBoundsQuery>,
) -> Result<Json<Vec<CalorieEntry>>> {
    let user_id = require_profile(&state, &user_id).await?;
    let (start, end) = parse_optional_bounds(params.start.as_deref(), params.end.as_deref())?;
    let entries = state.store.find_calories(user_id, start, end).await?;
    Ok(Json(entries))
}

async fn record_calories(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidJson(body): ValidJson<CalorieRequest>,
) -> Result<(StatusCode, Json<CalorieEntry>)> {
    let user_id = require_profile(&state, &user_id).await?;
    let date = parse_date(&body.date, "Date")?;
    let calories = to_count(body.calories, "Calories")?;

    let entry = state.store.upsert_calories(user_id, date, calories).await?;
    tracing::debug!(user_id = %user_id, date = %date, calories, "Calories recorded");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn delete_calories(
    State(state): State<Arc<AppState>>,
    Path((user_id, calorie_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    let user_id = require_profile(&state, &user_id).await?;
    let calorie_id = parse_id(&calorie_id, "calorie ID")?;

    let existing = state
        .store
        .get_calorie(calorie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Calorie record not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "calorie record")?;

    if !state.store.remove_calorie(calorie_id).await? {
        return Err(AppError::NotFound("Calorie record not found".to_string()));
    }
    Ok(Json(SuccessResponse::with_message(
        "Calorie record deleted successfully",
    )))
}
