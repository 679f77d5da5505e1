//! Shared types for the tab server
//!
//! Domain models (roles, dishes, orders, tabs, users) and the unified error
//! types used by the server and its HTTP clients.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Principal, Role};
pub use serde::{Deserialize, Serialize};
