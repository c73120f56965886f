// SPDX-License-Identifier: MIT

//! Friendship routes.
//!
//! A friendship is one undirected edge per pair of users. Creating `(B, A)`
//! when `(A, B)` exists is a conflict, not a second edge.

use crate::error::{AppError, Result};
use crate::models::{Friend, Friendship};
use crate::routes::extract::{not_blank, parse_id, require_profile, ValidJson};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
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
        .route("/api/friendships", post(create_friendship))
        .route("/api/friendships/user/{user_id}", get(list_friends))
        .route(
            "/api/friendships/{id}",
            put(update_friendship).delete(delete_friendship),
        )
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct FriendshipRequest {
    #[validate(custom(function = "not_blank", message = "userId is required"))]
    user_id: String,
    #[validate(custom(function = "not_blank", message = "friendId is required"))]
    friend_id: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FriendshipResponse {
    pub success: bool,
    pub data: Friendship,
}

/// Parse both endpoints and check they are distinct, existing users.
async fn resolve_pair(state: &AppState, body: &FriendshipRequest) -> Result<(Uuid, Uuid)> {
    let user_id = parse_id(&body.user_id, "user ID")?;
    let friend_id = parse_id(&body.friend_id, "friend ID")?;

    if user_id == friend_id {
        return Err(AppError::BadRequest("Cannot friend yourself".to_string()));
    }

    for id in [user_id, friend_id] {
        if !state.store.profile_exists(id).await? {
            return Err(AppError::user_not_found());
        }
    }

    Ok((user_id, friend_id))
}

async fn create_friendship(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<FriendshipRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>)> {
    let (user_id, friend_id) = resolve_pair(&state, &body).await?;

    if state
        .store
        .find_friendship_between(user_id, friend_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Friendship already exists".to_string()));
    }

    let edge = state
        .store
        .add_friendship(&Friendship::new(user_id, friend_id))
        .await?;

    tracing::info!(
        friendship_id = %edge.id,
        user_id = %user_id,
        friend_id = %friend_id,
        "Friendship created"
    );

    Ok((StatusCode::CREATED, Json(SuccessResponse::ok())))
}

async fn list_friends(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Friend>>> {
    let user_id = require_profile(&state, &user_id).await?;
    let friends = state.store.find_friends_of(user_id).await?;
    tracing::debug!(user_id = %user_id, count = friends.len(), "Listing friends");
    Ok(Json(friends))
}

async fn update_friendship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<FriendshipRequest>,
) -> Result<Json<FriendshipResponse>> {
    let id = parse_id(&id, "friendship ID")?;
    let (user_id, friend_id) = resolve_pair(&state, &body).await?;

    let edge = state
        .store
        .update_friendship(id, user_id, friend_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Friendship not found".to_string()))?;

    tracing::info!(friendship_id = %id, "Friendship updated");
    Ok(Json(FriendshipResponse {
        success: true,
        data: edge,
    }))
}

async fn delete_friendship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let id = parse_id(&id, "friendship ID")?;
    if !state.store.remove_friendship(id).await? {
        return Err(AppError::NotFound("Friendship not found".to_string()));
    }

    tracing::info!(friendship_id = %id, "Friendship deleted");
    Ok(Json(SuccessResponse::ok()))
}
