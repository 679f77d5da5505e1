//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::OrderNotFound
            | Self::NoPendingItem
            | Self::DishNotFound
            | Self::TabNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired | Self::AccountDisabled => {
                StatusCode::FORBIDDEN
            }

            // 503 Service Unavailable (persistence failures, client can retry)
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request: duplicate keys, invalid transitions, validation
            Self::ValidationFailed
            | Self::AlreadyExists
            | Self::OrderIdExists
            | Self::OrderNotCancellable
            | Self::OrderAlreadyTakeaway
            | Self::OrderItemNotCancellable
            | Self::InvalidPaymentStatus
            | Self::DishNameExists
            | Self::DishIdExists
            | Self::TabNameExists
            | Self::UsernameExists => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_status_mapping() {
        // NotFound
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::NoPendingItem.http_status(), StatusCode::NOT_FOUND);
        // DuplicateKey
        assert_eq!(ErrorCode::TabNameExists.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::BAD_REQUEST);
        // Forbidden
        assert_eq!(ErrorCode::RoleRequired.http_status(), StatusCode::FORBIDDEN);
        // Unauthenticated
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        // InvalidTransition
        assert_eq!(
            ErrorCode::OrderNotCancellable.http_status(),
            StatusCode::BAD_REQUEST
        );
        // Unavailable
        assert_eq!(
            ErrorCode::ServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
