// SPDX-License-Identifier: MIT

//! Profile routes: registration, lookup, search, update and removal.

use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileUpdate};
use crate::routes::extract::{not_blank, parse_id, ValidJson};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profiles", post(create_profile))
        .route("/api/profiles/exists/{id}", get(profile_exists))
        .route("/api/profiles/search", get(search_profiles))
        .route(
            "/api/profiles/{user_id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

#[derive(Deserialize, Validate)]
struct CreateProfileRequest {
    #[validate(email(message = "Valid email is required"))]
    email: String,
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    last_name: String,
}

#[derive(Deserialize, Validate)]
struct UpdateProfileRequest {
    #[validate(email(message = "Valid email is required"))]
    email: Option<String>,
    #[validate(custom(function = "not_blank", message = "First name cannot be empty"))]
    first_name: Option<String>,
    #[validate(custom(function = "not_blank", message = "Last name cannot be empty"))]
    last_name: Option<String>,
}

/// Response for a created profile.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let email = normalize_email(&body.email);
    if state.store.profile_exists_by_email(&email).await? {
        return Err(AppError::Conflict("Profile already exists".to_string()));
    }

    let profile = Profile::new(
        email,
        body.first_name.trim().to_string(),
        body.last_name.trim().to_string(),
    );
    state.store.add_profile(&profile).await?;

    tracing::info!(user_id = %profile.id, "Profile created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            id: profile.id,
        }),
    ))
}

async fn profile_exists(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let id = parse_id(&id, "user ID")?;
    let exists = state.store.profile_exists(id).await?;
    Ok(Json(ExistsResponse { exists }))
}

async fn search_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Profile>>> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    if query.len() > 100 {
        return Err(AppError::BadRequest(
            "Search query too long (max 100 characters)".to_string(),
        ));
    }

    let found = state.store.search_profiles(query).await?;
    tracing::debug!(query, results = found.len(), "Profile search");
    Ok(Json(found))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>> {
    let user_id = parse_id(&user_id, "user ID")?;
    let profile = state
        .store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidJson(body): ValidJson<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let user_id = parse_id(&user_id, "user ID")?;
    let current = state
        .store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let email = body.email.as_deref().map(normalize_email);
    if let Some(email) = email.as_deref() {
        if email != current.email && state.store.profile_exists_by_email(email).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
    }

    let update = ProfileUpdate {
        email,
        first_name: body.first_name.map(|n| n.trim().to_string()),
        last_name: body.last_name.map(|n| n.trim().to_string()),
    };

    let profile = state
        .store
        .update_profile(user_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    tracing::info!(user_id = %user_id, "Profile updated");
    Ok(Json(profile))
}

/// Remove a profile. Friendships and activity rows are left in place and
/// ignored wherever the profile is looked up.
async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let user_id = parse_id(&user_id, "user ID")?;
    if !state.store.remove_profile(user_id).await? {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    tracing::info!(user_id = %user_id, "Profile deleted");
    Ok(Json(SuccessResponse::ok()))
}
