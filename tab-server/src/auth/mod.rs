//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`IdentityContext`] - 凭证到 `Principal` 的解析
//! - [`require_auth`] - 认证中间件
//! - [`require_role`] - 角色检查

pub mod extractor;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use identity::IdentityContext;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use policy::require_role;
