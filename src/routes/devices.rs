// SPDX-License-Identifier: MIT

//! Registered tracking devices.

use crate::error::{AppError, Result};
use crate::models::Device;
use crate::routes::extract::{ensure_owner, not_blank, parse_id, require_profile, ValidJson};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
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
            "/api/profiles/{user_id}/devices",
            get(list_devices).post(add_device),
        )
        .route(
            "/api/profiles/{user_id}/devices/{device_id}",
            delete(remove_device),
        )
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct DeviceRequest {
    #[validate(
        custom(function = "not_blank", message = "Device name is required"),
        length(max = 100, message = "Device name too long (max 100 characters)")
    )]
    device_name: String,
    #[validate(
        custom(function = "not_blank", message = "Device type is required"),
        length(max = 50, message = "Device type too long (max 50 characters)")
    )]
    device_type: String,
}

async fn list_devices(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Device>>> {
    let user_id = require_profile(&state, &user_id).await?;
    Ok(Json(state.store.find_devices(user_id).await?))
}

async fn add_device(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidJson(body): ValidJson<DeviceRequest>,
) -> Result<(StatusCode, Json<Device>)> {
    let user_id = require_profile(&state, &user_id).await?;

    let device = Device::new(
        user_id,
        body.device_name.trim().to_string(),
        body.device_type.trim().to_string(),
    );
    state.store.add_device(&device).await?;

    tracing::info!(user_id = %user_id, device_id = %device.id, "Device registered");
    Ok((StatusCode::CREATED, Json(device)))
}

async fn remove_device(
    State(state): State<Arc<AppState>>,
    Path((user_id, device_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    let user_id = require_profile(&state, &user_id).await?;
    let device_id = parse_id(&device_id, "device ID")?;

    let existing = state
        .store
        .get_device(device_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Device not found".to_string()))?;
    ensure_owner(existing.user_id, user_id, "device")?;

    if !state.store.remove_device(device_id).await? {
        return Err(AppError::NotFound("Device not found".to_string()));
    }

    tracing::info!(user_id = %user_id, device_id = %device_id, "Device removed");
    Ok(Json(SuccessResponse::with_message("Device removed successfully")))
}
