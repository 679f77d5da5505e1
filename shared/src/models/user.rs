//! User Model
//!
//! The stored document carries the password hash; only [`UserInfo`] leaves
//! the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::role::Role;

/// User document (stored in `user`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub username: String,
    pub hashed_password: String,
    #[serde(alias = "privilege")]
    pub role: Role,
    #[serde(default)]
    pub table: Option<String>,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub date_last_login: Option<DateTime<Utc>>,
    #[serde(alias = "enable")]
    pub enabled: bool,
    #[serde(default)]
    pub token_expiry: Option<DateTime<Utc>>,
}

/// Public user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub username: String,
    pub role: Role,
    pub table: Option<String>,
    pub enabled: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            table: user.table.clone(),
            enabled: user.enabled,
        }
    }
}

/// Register user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(alias = "privilege")]
    pub role: Role,
    #[serde(default)]
    pub table: Option<String>,
}

/// Partial user update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: Option<String>,
    #[serde(default, alias = "privilege")]
    pub role: Option<Role>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default, alias = "enable")]
    pub enabled: Option<bool>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
