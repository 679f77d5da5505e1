//! 订单模块
//!
//! - [`lifecycle`] - 订单/菜品状态迁移规则 (纯函数)
//! - [`OrderService`] - 订单生命周期引擎

pub mod lifecycle;
pub mod service;

pub use service::OrderService;
