//! Capability checks
//!
//! Every mutating engine operation calls [`require_role`] before touching
//! the store.

use shared::models::{Principal, Role};

use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Fails with `RoleRequired` unless the principal holds `role`
pub fn require_role(principal: &Principal, role: Role) -> AppResult<()> {
    if principal.has_role(role) {
        return Ok(());
    }

    security_log!(
        "WARN",
        "role_denied",
        username = principal.username.clone(),
        role = principal.role.as_str(),
        required = role.as_str()
    );
    Err(AppError::with_message(
        ErrorCode::RoleRequired,
        format!("{role} role required"),
    )
    .with_detail("required_role", role.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let cook = Principal::new("carl", Role::Cook);
        assert!(require_role(&cook, Role::Cook).is_ok());

        let err = require_role(&cook, Role::Manager).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Manager role required");
    }

    #[test]
    fn test_every_role_is_checked_exactly() {
        for held in Role::ALL {
            let principal = Principal::new("u", held);
            for required in Role::ALL {
                assert_eq!(require_role(&principal, required).is_ok(), held == required);
            }
        }
    }
}
