// SPDX-License-Identifier: MIT

//! Body metric routes (weight, height).

use crate::error::{AppError, Result};
use crate::models::{Metric, MetricFilter, MetricType};
use crate::routes::extract::{ensure_owner, parse_id, require_profile, ValidJson};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

const MAX_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profiles/{user_id}/metrics",
            get(list_metrics).post(create_metric),
        )
        .route(
            "/api/profiles/{user_id}/metrics/{metric_id}",
            put(update_metric).delete(delete_metric),
        )
}

/// Raw query; parsed by hand so bad values get JSON errors.
#[derive(Debug, Default, Deserialize)]
struct MetricsQuery {
    #[serde(rename = "type")]
    metric_type: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

/// Any JSON number is accepted as the value; a non-number is a 400.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct MetricRequest {
    metric_type: String,
    value: f64,
}

fn parse_metric_type(raw: &str) -> Result<MetricType> {
    raw.trim().parse().map_err(|_| {
        AppError::BadRequest("Type must be either weight or height".to_string())
    })
}

fn parse_metric_filter(params: &MetricsQuery) -> Result<MetricFilter> {
    let mut filter = MetricFilter::default();

    if let Some(raw) = params.metric_type.as_deref() {
        filter.metric_type = Some(parse_metric_type(raw)?);
    }

    if let Some(raw) = params.limit.as_deref() {
        filter.limit = raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| {
                AppError::BadRequest(format!("Limit must be between 1 and {}", MAX_LIMIT))
            })?;
    }

    if let Some(raw) = params.offset.as_deref() {
        filter.offset = raw.trim().parse::<u32>().map_err(|_| {
            AppError::BadRequest("Offset must be a non-negative integer".to_string())
        })?;
    }

    Ok(filter)
}

async fn list_metrics(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<MetricsQuery>,
) -> Result<Json<Vec<Metric>>> {
    let user_id = require_profile(&state, &user_id).await?;
    let filter = parse_metric_filter(&params)?;

    tracing::debug!(
        user_id = %user_id,
        metric_type = ?filter.metric_type,
        limit = filter.limit,
        offset = filter.offset,
        "Fetching metrics"
    );

    let metrics = state.store.find_metrics(user_id, filter).await?;
    Ok(Json(metrics))
}

async fn create_metric(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidJson(body): ValidJson<MetricRequest>,
) -> Result<(StatusCode, Json<Metric>)> {
    let user_id = require_profile(&state, &user_id).await?;
    let metric_type = parse_metric_type(&body.metric_type)?;

    let metric = Metric::new(user_id, metric_type, body.value);
    state.store.add_metric(&metric).await?;
    Ok((StatusCode::CREATED, Json(metric)))
}

async fn update_metric(
    State(state): State<Arc<AppState>>,
    Path((user_id, metric_id)): Path<(String, String)>,
    ValidJson(body): ValidJson<MetricRequest>,
) -> Result<Json<Metric>> {
    let user_id = require_profile(&state, &user_id).await?;
    let metric_id = parse_id(&metric_id, "metric ID")?;
    let metric_type = parse_metric_type(&body.metric_type)?;

    let existing = state
        .store
        .get_metric(metric_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Metric not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "metric")?;

    let metric = state
        .store
        .update_metric(metric_id, metric_type, body.value)
        .await?
        .ok_or_else(|| AppError::NotFound("Metric not found".to_string()))?;
    Ok(Json(metric))
}

async fn delete_metric(
    State(state): State<Arc<AppState>>,
    Path((user_id, metric_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    let user_id = require_profile(&state, &user_id).await?;
    let metric_id = parse_id(&metric_id, "metric ID")?;

    let existing = state
        .store
        .get_metric(metric_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Metric not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "metric")?;

    if !state.store.remove_metric(metric_id).await? {
        return Err(AppError::NotFound("Metric not found".to_string()));
    }
    Ok(Json(SuccessResponse::ok()))
}
