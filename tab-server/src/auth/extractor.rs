//! Principal Extractor
//!
//! Gives protected handlers a resolved [`Principal`]

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::Principal;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the auth middleware
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let Some(credential) = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
            return Err(AppError::not_authenticated());
        };

        match state.identity.resolve(credential).await {
            Ok(principal) => {
                parts.extensions.insert(principal.clone());
                Ok(principal)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = e.message.clone(),
                    uri = parts.uri.to_string()
                );
                Err(e)
            }
        }
    }
}
