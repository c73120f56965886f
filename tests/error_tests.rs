// SPDX-License-Identifier: MIT

use axum::http::StatusCode;
use ustep_tracker::error::AppError;

#[test]
fn test_status_mapping() {
    assert_eq!(AppError::user_not_found().status(), StatusCode::NOT_FOUND);
    assert_eq!(
        AppError::BadRequest("x".to_string()).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::Forbidden("x".to_string()).status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::Conflict("x".to_string()).status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::Database("x".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Internal(anyhow::anyhow!("boom")).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_user_not_found_message() {
    assert_eq!(
        AppError::user_not_found().to_string(),
        AppError::USER_NOT_FOUND
    );
}
