//! Data models
//!
//! Shared between the tab server and its clients (via API).
//! Entities are stored as JSON documents, so every model is plain serde.

pub mod dish;
pub mod order;
pub mod role;
pub mod tab;
pub mod user;

// Re-exports
pub use dish::*;
pub use order::*;
pub use role::*;
pub use tab::*;
pub use user::*;
