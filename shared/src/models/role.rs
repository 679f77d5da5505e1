//! Role & Principal Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff/occupant role (tagged variant, never compared as a string)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Cook,
    Waiter,
    Billing,
    Customer,
    Table,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Manager,
        Role::Cook,
        Role::Waiter,
        Role::Billing,
        Role::Customer,
        Role::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::Cook => "Cook",
            Role::Waiter => "Waiter",
            Role::Billing => "Billing",
            Role::Customer => "Customer",
            Role::Table => "Table",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Authenticated caller, resolved per request and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
