//! Tab Server - 基于桌台(Tab)的餐厅点单管理服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite 上的 JSON 文档库
//! - **认证** (`auth`): JWT + Argon2, 按角色授权
//! - **订单** (`orders`): 订单生命周期与厨房队列
//! - **业务服务** (`services`): 桌台, 菜单, 用户
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! tab-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、身份解析、权限
//! ├── orders/        # 订单状态机与持久化
//! ├── services/      # 桌台、菜单、用户
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 错误与日志工具
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::JwtService;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并读取配置
///
/// 日志在配置之后初始化, 因为日志级别和目录来自配置。
/// 返回的 guard 必须在进程生命周期内保持存活。
pub fn setup_environment()
-> Result<(Config, Option<tracing_appender::non_blocking::WorkerGuard>), core::ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    let guard = init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    Ok((config, guard))
}

pub fn print_banner() {
    println!(
        r#"
 _____     _        ____
|_   _|_ _| |__    / ___|  ___ _ ____   __
  | |/ _` | '_ \   \___ \ / _ \ '__\ \ / /
  | | (_| | |_) |   ___) |  __/ |   \ V /
  |_|\__,_|_.__/   |____/ \___|_|    \_/
    "#
    );
}
