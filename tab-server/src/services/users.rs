//! User management
//!
//! Accounts live in the `user` collection. Managers administer accounts;
//! everyone can log in, read their own profile and update themself.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{LoginRequest, Principal, Role, Token, User, UserCreate, UserInfo, UserUpdate};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{JwtService, require_role};
use crate::db::{Collection, DocumentStore, Filter, Patch, StoreError, decode, encode};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    jwt: Arc<JwtService>,
}

fn by_username(username: &str) -> Filter {
    Filter::eq("username", username)
}

fn not_found(username: &str) -> AppError {
    AppError::new(ErrorCode::UserNotFound).with_detail("username", username)
}

fn username_taken(username: &str) -> AppError {
    AppError::new(ErrorCode::UsernameExists).with_detail("username", username)
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    async fn find(&self, username: &str) -> AppResult<Option<User>> {
        self.store
            .find_one(Collection::User, &by_username(username))
            .await?
            .map(decode::<User>)
            .transpose()
            .map_err(Into::into)
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        self.store
            .insert_one(Collection::User, encode(user)?)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => username_taken(&user.username),
                other => other.into(),
            })
    }

    fn new_user(payload: UserCreate) -> AppResult<User> {
        Ok(User {
            hashed_password: hash_password(&payload.password)?,
            name: payload.name,
            username: payload.username,
            role: payload.role,
            table: payload.table,
            date_created: Utc::now(),
            date_last_login: None,
            enabled: true,
            token_expiry: None,
        })
    }

    /// Manager-only account creation
    pub async fn register(&self, payload: UserCreate, principal: &Principal) -> AppResult<UserInfo> {
        require_role(principal, Role::Manager)?;
        payload.validate()?;

        if self.find(&payload.username).await?.is_some() {
            return Err(username_taken(&payload.username));
        }

        let user = Self::new_user(payload)?;
        self.insert(&user).await?;

        tracing::info!(username = %user.username, role = %user.role, by = %principal.username, "User registered");
        Ok(UserInfo::from(&user))
    }

    /// Exchange credentials for a bearer token
    ///
    /// Unknown user and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> AppResult<Token> {
        let invalid = || {
            security_log!("WARN", "login_failed", username = request.username.clone());
            AppError::with_message(ErrorCode::InvalidCredentials, "Invalid credentials")
        };

        let Some(user) = self.find(&request.username).await? else {
            return Err(invalid());
        };
        if !verify_password(&request.password, &user.hashed_password)? {
            return Err(invalid());
        }
        if !user.enabled {
            security_log!("WARN", "login_disabled", username = user.username.clone());
            return Err(AppError::with_message(
                ErrorCode::AccountDisabled,
                "User account is disabled",
            ));
        }

        let (token, expires_at) = self
            .jwt
            .generate_token(&user.username, user.role)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

        self.store
            .update_one(
                Collection::User,
                &by_username(&user.username),
                &Patch::new()
                    .set("date_last_login", encode(&Utc::now())?)
                    .set("token_expiry", encode(&expires_at)?),
            )
            .await?;

        tracing::info!(username = %user.username, role = %user.role, "User logged in");
        Ok(Token::bearer(token))
    }

    pub async fn me(&self, principal: &Principal) -> AppResult<UserInfo> {
        let user = self
            .find(&principal.username)
            .await?
            .ok_or_else(|| not_found(&principal.username))?;
        Ok(UserInfo::from(&user))
    }

    pub async fn list_users(&self, principal: &Principal) -> AppResult<Vec<UserInfo>> {
        require_role(principal, Role::Manager)?;

        let docs = self.store.find_many(Collection::User, &Filter::all()).await?;
        docs.into_iter()
            .map(|doc| -> AppResult<UserInfo> { Ok(UserInfo::from(&decode::<User>(doc)?)) })
            .collect()
    }

    pub async fn delete_user(&self, username: &str, principal: &Principal) -> AppResult<()> {
        require_role(principal, Role::Manager)?;

        let outcome = self
            .store
            .delete_one(Collection::User, &by_username(username))
            .await?;
        if outcome.deleted_count == 0 {
            return Err(not_found(username));
        }

        tracing::info!(username = %username, by = %principal.username, "User deleted");
        Ok(())
    }

    /// Managers update anyone; others only themself and never `role`/`enabled`
    pub async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
        principal: &Principal,
    ) -> AppResult<UserInfo> {
        let is_manager = principal.has_role(Role::Manager);
        if !is_manager && principal.username != username {
            security_log!(
                "WARN",
                "user_update_denied",
                username = principal.username.clone(),
                target = username.to_string()
            );
            return Err(AppError::permission_denied("Permission denied"));
        }
        if !is_manager && (update.role.is_some() || update.enabled.is_some()) {
            require_role(principal, Role::Manager)?;
        }
        update.validate()?;

        let mut patch = Patch::new();
        if let Some(name) = &update.name {
            patch = patch.set("name", name.as_str());
        }
        if let Some(password) = &update.password {
            patch = patch.set("hashed_password", hash_password(password)?);
        }
        if let Some(role) = update.role {
            patch = patch.set("role", role.as_str());
        }
        if let Some(table) = &update.table {
            patch = patch.set("table", table.as_str());
        }
        if let Some(enabled) = update.enabled {
            patch = patch.set("enabled", enabled);
        }

        let outcome = self
            .store
            .update_one(Collection::User, &by_username(username), &patch)
            .await?;
        if outcome.matched_count == 0 {
            return Err(not_found(username));
        }

        tracing::info!(username = %username, by = %principal.username, "User updated");
        let user = self.find(username).await?.ok_or_else(|| not_found(username))?;
        Ok(UserInfo::from(&user))
    }

    /// Seed a Manager account unless the username is already taken
    pub async fn bootstrap_manager(&self, username: &str, password: &str) -> AppResult<bool> {
        if self.find(username).await?.is_some() {
            return Ok(false);
        }

        let payload = UserCreate {
            name: username.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Manager,
            table: None,
        };
        payload.validate()?;

        let user = Self::new_user(payload)?;
        self.insert(&user).await?;
        tracing::info!(username = %username, "Bootstrap manager created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::db::DbService;

    async fn service() -> UserService {
        let db = DbService::in_memory().await.unwrap();
        let jwt = Arc::new(JwtService::with_config(JwtConfig::ephemeral()));
        let svc = UserService::new(db.store(), jwt);
        svc.bootstrap_manager("boss", "secret1").await.unwrap();
        svc
    }

    fn manager() -> Principal {
        Principal::new("boss", Role::Manager)
    }

    fn waiter_payload(username: &str) -> UserCreate {
        UserCreate {
            name: "Amy".into(),
            username: username.into(),
            password: "hunter22".into(),
            role: Role::Waiter,
            table: None,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let svc = service().await;
        assert!(!svc.bootstrap_manager("boss", "other-pw").await.unwrap());
        // Original password still works
        svc.login(login("boss", "secret1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_new_username_alongside_existing_users() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();

        assert!(svc.bootstrap_manager("chief", "secret2").await.unwrap());
        let token = svc.login(login("chief", "secret2")).await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(svc.list_users(&manager()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_register_requires_manager_and_unique_username() {
        let svc = service().await;

        let info = svc.register(waiter_payload("amy"), &manager()).await.unwrap();
        assert_eq!(info.role, Role::Waiter);
        assert!(info.enabled);

        let err = svc
            .register(waiter_payload("amy"), &manager())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UsernameExists);

        let err = svc
            .register(waiter_payload("bob"), &Principal::new("amy", Role::Waiter))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);

        let mut short = waiter_payload("cat");
        short.password = "123".into();
        let err = svc.register(short, &manager()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_login_and_stamps() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();

        let token = svc.login(login("amy", "hunter22")).await.unwrap();
        assert_eq!(token.token_type, "bearer");
        let claims = svc.jwt.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, "amy");

        let user = svc.find("amy").await.unwrap().unwrap();
        assert!(user.date_last_login.is_some());
        assert!(user.token_expiry.unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();

        let wrong_pw = svc.login(login("amy", "nope-nope")).await.unwrap_err();
        let unknown = svc.login(login("ghost", "hunter22")).await.unwrap_err();
        assert_eq!(wrong_pw.code, ErrorCode::InvalidCredentials);
        assert_eq!(unknown.code, ErrorCode::InvalidCredentials);
        assert_eq!(wrong_pw.message, unknown.message);
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_log_in() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();
        let update = UserUpdate {
            enabled: Some(false),
            ..Default::default()
        };
        svc.update_user("amy", update, &manager()).await.unwrap();

        let err = svc.login(login("amy", "hunter22")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
    }

    #[tokio::test]
    async fn test_me_list_delete() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();
        let amy = Principal::new("amy", Role::Waiter);

        assert_eq!(svc.me(&amy).await.unwrap().username, "amy");

        let err = svc.list_users(&amy).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        let names: Vec<_> = svc
            .list_users(&manager())
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["boss", "amy"]);

        let err = svc.delete_user("amy", &amy).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        svc.delete_user("amy", &manager()).await.unwrap();
        let err = svc.delete_user("amy", &manager()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn test_update_permissions() {
        let svc = service().await;
        svc.register(waiter_payload("amy"), &manager()).await.unwrap();
        svc.register(waiter_payload("bob"), &manager()).await.unwrap();
        let amy = Principal::new("amy", Role::Waiter);

        // Self update of name and password
        let update = UserUpdate {
            name: Some("Amy B".into()),
            password: Some("new-password".into()),
            ..Default::default()
        };
        let info = svc.update_user("amy", update, &amy).await.unwrap();
        assert_eq!(info.name, "Amy B");
        svc.login(login("amy", "new-password")).await.unwrap();

        // Not someone else
        let err = svc
            .update_user("bob", UserUpdate::default(), &amy)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        // Not own role
        let update = UserUpdate {
            role: Some(Role::Manager),
            ..Default::default()
        };
        let err = svc.update_user("amy", update, &amy).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        assert_eq!(svc.me(&amy).await.unwrap().role, Role::Waiter);

        // Manager can change roles
        let update = UserUpdate {
            role: Some(Role::Cook),
            ..Default::default()
        };
        let info = svc.update_user("bob", update, &manager()).await.unwrap();
        assert_eq!(info.role, Role::Cook);

        let err = svc
            .update_user("ghost", UserUpdate::default(), &manager())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
