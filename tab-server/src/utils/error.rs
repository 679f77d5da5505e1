//! Error handling
//!
//! Re-exports the unified error types from `shared::error` and maps
//! persistence failures onto them.

use axum::Json;
use serde::Serialize;

use crate::db::StoreError;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Wrap data in a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Successful response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(collection) => {
                AppError::already_exists(format!("Duplicate entry in {collection}"))
            }
            StoreError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                AppError::unavailable("Storage is unavailable")
            }
            StoreError::Corrupt(msg) => {
                tracing::error!(error = %msg, "Corrupt document in store");
                AppError::internal("Stored data could not be read")
            }
        }
    }
}
