use std::sync::Arc;

use crate::auth::{IdentityContext, JwtService};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrderService;
use crate::services::{DishService, TabService, UserService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有引擎共用同一个文档库实例, 启动时显式构造并注入。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 (关闭时释放) |
/// | jwt_service | JWT 认证服务 |
/// | identity | 凭证解析 |
/// | orders / tabs / dishes / users | 业务引擎 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub identity: IdentityContext,
    pub orders: OrderService,
    pub tabs: TabService,
    pub dishes: DishService,
    pub users: UserService,
}

impl ServerState {
    /// Wire every engine onto one database
    pub fn new(config: Config, db: DbService, jwt_service: Arc<JwtService>) -> Self {
        let store = db.store();
        Self {
            identity: IdentityContext::new(jwt_service.clone(), store.clone()),
            orders: OrderService::new(store.clone()),
            tabs: TabService::new(store.clone()),
            dishes: DishService::new(store.clone()),
            users: UserService::new(store, jwt_service.clone()),
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 数据库 (含迁移)
    /// 2. JWT 服务与各引擎
    /// 3. 首个管理员账号 (如已配置)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = if config.is_in_memory() {
            DbService::in_memory().await?
        } else {
            DbService::new(&config.database_url, config.database_max_connections).await?
        };

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self::new(config.clone(), db, jwt_service);

        if let Some(manager) = &config.bootstrap_manager {
            state
                .users
                .bootstrap_manager(&manager.username, &manager.password)
                .await?;
        }

        Ok(state)
    }

    /// Release the connection pool
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}
