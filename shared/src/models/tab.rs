//! Tab Model
//!
//! A tab represents a table/session; occupants use it to bind a table number
//! and to call a waiter or support.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::role::Role;

/// Tab entity (stored in `tabs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "user")]
    pub bound_user: Option<String>,
    #[serde(default)]
    pub table: Option<i64>,
    #[serde(default)]
    pub waiter_request: bool,
    #[serde(default)]
    pub waiter_text: String,
    #[serde(default)]
    pub support_request: bool,
    #[serde(default)]
    pub support_text: String,
    #[serde(default, alias = "user_type")]
    pub role_of_last_binder: Option<Role>,
}

impl Tab {
    pub fn new(id: impl Into<String>, name: impl Into<String>, table: Option<i64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bound_user: None,
            table,
            waiter_request: false,
            waiter_text: String::new(),
            support_request: false,
            support_text: String::new(),
            role_of_last_binder: None,
        }
    }
}

/// Create tab payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TabCreate {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    pub table: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_has_no_requests() {
        let tab = Tab::new("t-1", "T1", Some(4));
        assert!(!tab.waiter_request);
        assert!(!tab.support_request);
        assert_eq!(tab.waiter_text, "");
        assert!(tab.bound_user.is_none());
    }

    #[test]
    fn test_tab_accepts_legacy_binder_fields() {
        let json = serde_json::json!({
            "id": "t-1",
            "name": "T1",
            "user": "guest",
            "user_type": "Table"
        });
        let tab: Tab = serde_json::from_value(json).unwrap();
        assert_eq!(tab.bound_user.as_deref(), Some("guest"));
        assert_eq!(tab.role_of_last_binder, Some(Role::Table));
        assert_eq!(tab.support_text, "");
    }
}
