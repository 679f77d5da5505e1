//! 服务层 - 业务引擎
//!
//! - [`DishService`] - 菜单目录
//! - [`TabService`] - 桌台会话
//! - [`UserService`] - 账号管理与登录
//!
//! 订单引擎见 [`crate::orders`]。

pub mod dishes;
pub mod tabs;
pub mod users;

pub use dishes::DishService;
pub use tabs::TabService;
pub use users::UserService;
