// SPDX-License-Identifier: MIT

//! Request extractors and path helpers shared by the route modules.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// JSON body that has been deserialized and validated.
///
/// Malformed JSON and failed validation both come back as `400` with the
/// usual `{success: false, message}` body.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Parse a path or body id, naming the field in the error.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid {} format", what)))
}

/// Parse a user id and check that its profile exists.
pub async fn require_profile(state: &AppState, raw: &str) -> Result<Uuid> {
    let user_id = parse_id(raw, "user ID")?;
    if !state.store.profile_exists(user_id).await? {
        return Err(AppError::user_not_found());
    }
    Ok(user_id)
}

/// Reject access to a record owned by a different user.
pub fn ensure_owner(owner: Uuid, user_id: Uuid, what: &str) -> Result<()> {
    if owner != user_id {
        tracing::warn!(owner = %owner, user_id = %user_id, what, "Cross-user record access");
        return Err(AppError::Forbidden(format!(
            "Not authorized to modify this {}",
            what
        )));
    }
    Ok(())
}

/// Validator for string fields that must have visible content.
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be empty")));
    }
    Ok(())
}
