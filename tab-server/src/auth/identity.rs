//! Identity Context
//!
//! Resolves a bearer credential into a [`Principal`]. The token only names the
//! user; role and enabled flag always come from the stored user document, so
//! a role change or a disabled account takes effect on the next request.

use std::sync::Arc;

use shared::models::{Principal, User};

use crate::auth::{JwtError, JwtService};
use crate::db::{Collection, DocumentStore, Filter, decode};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct IdentityContext {
    jwt: Arc<JwtService>,
    store: Arc<dyn DocumentStore>,
}

impl IdentityContext {
    pub fn new(jwt: Arc<JwtService>, store: Arc<dyn DocumentStore>) -> Self {
        Self { jwt, store }
    }

    /// Resolve an `Authorization` header value
    pub async fn resolve(&self, credential: &str) -> AppResult<Principal> {
        let token = JwtService::extract_from_header(credential)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        let claims = self.jwt.validate_token(token).map_err(|e| match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        })?;

        let doc = self
            .store
            .find_one(Collection::User, &Filter::eq("username", claims.sub.as_str()))
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::NotAuthenticated, "User no longer exists")
            })?;
        let user: User = decode(doc)?;

        if !user.enabled {
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }

        Ok(Principal::new(user.username, user.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::db::{DbService, encode};
    use chrono::Utc;
    use shared::models::Role;

    async fn setup(users: &[(&str, Role, bool)]) -> (IdentityContext, Arc<JwtService>) {
        let db = DbService::in_memory().await.unwrap();
        let store = db.store();
        for (username, role, enabled) in users {
            let user = User {
                name: username.to_string(),
                username: username.to_string(),
                hashed_password: "x".into(),
                role: *role,
                table: None,
                date_created: Utc::now(),
                date_last_login: None,
                enabled: *enabled,
                token_expiry: None,
            };
            store
                .insert_one(Collection::User, encode(&user).unwrap())
                .await
                .unwrap();
        }
        let jwt = Arc::new(JwtService::with_config(JwtConfig::ephemeral()));
        (IdentityContext::new(jwt.clone(), store), jwt)
    }

    #[tokio::test]
    async fn test_resolve_uses_stored_role() {
        let (identity, jwt) = setup(&[("amy", Role::Cook, true)]).await;
        // Token was issued while amy was a Waiter
        let (token, _) = jwt.generate_token("amy", Role::Waiter).unwrap();

        let principal = identity.resolve(&format!("Bearer {token}")).await.unwrap();
        assert_eq!(principal, Principal::new("amy", Role::Cook));
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_credentials() {
        let (identity, jwt) = setup(&[("amy", Role::Cook, true)]).await;

        let err = identity.resolve("Token abc").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);

        let err = identity.resolve("Bearer abc.def.ghi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);

        let (token, _) = jwt.generate_token("ghost", Role::Manager).unwrap();
        let err = identity.resolve(&format!("Bearer {token}")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_resolve_rejects_expired_token() {
        let (identity, _) = setup(&[("amy", Role::Cook, true)]).await;
        let expired = JwtService::with_config(JwtConfig {
            expiration_minutes: -10,
            ..identity.jwt.config.clone()
        });
        let (token, _) = expired.generate_token("amy", Role::Cook).unwrap();

        let err = identity.resolve(&format!("Bearer {token}")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[tokio::test]
    async fn test_resolve_rejects_disabled_account() {
        let (identity, jwt) = setup(&[("bob", Role::Waiter, false)]).await;
        let (token, _) = jwt.generate_token("bob", Role::Waiter).unwrap();

        let err = identity.resolve(&format!("Bearer {token}")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }
}
