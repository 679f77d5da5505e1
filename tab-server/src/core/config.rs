use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 首个管理员账号 (仅在用户不存在时创建)
#[derive(Debug, Clone)]
pub struct BootstrapManager {
    pub username: String,
    pub password: String,
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite://tabserv.db | 文档库位置 |
/// | DATABASE_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | JWT_SECRET | (debug 构建自动生成) | HS256 密钥, 至少 32 字符 |
/// | ACCESS_TOKEN_EXPIRE_MINUTES | 30 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | tab-server / tab-clients | 令牌声明 |
/// | BOOTSTRAP_MANAGER_USERNAME / BOOTSTRAP_MANAGER_PASSWORD | - | 首个管理员 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志文件目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite://data/tabs.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    pub bootstrap_manager: Option<BootstrapManager>,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置, 未设置的使用默认值
    pub fn from_env() -> Result<Self, ServerError> {
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;

        let bootstrap_manager = match (
            env_opt("BOOTSTRAP_MANAGER_USERNAME"),
            env_opt("BOOTSTRAP_MANAGER_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapManager { username, password }),
            (None, None) => None,
            _ => {
                return Err(ServerError::Config(
                    "BOOTSTRAP_MANAGER_USERNAME and BOOTSTRAP_MANAGER_PASSWORD must be set together"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            http_host: env_or("HTTP_HOST", "0.0.0.0"),
            http_port: env_parse("HTTP_PORT", 8000),
            database_url: env_or("DATABASE_URL", "sqlite://tabserv.db"),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5),
            jwt,
            bootstrap_manager,
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),
            environment: env_or("ENVIRONMENT", "development"),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        })
    }

    /// In-memory database, ephemeral JWT secret, no environment lookups
    ///
    /// 常用于测试场景
    pub fn in_memory() -> Self {
        Self {
            http_host: "127.0.0.1".to_string(),
            http_port: 0,
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt: JwtConfig::ephemeral(),
            bootstrap_manager: None,
            log_level: "info".to_string(),
            log_dir: None,
            environment: "test".to_string(),
            shutdown_timeout_ms: 1_000,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_config() {
        let config = Config::in_memory();
        assert!(config.is_in_memory());
        assert!(!config.is_production());
        assert_eq!(config.bind_addr(), "127.0.0.1:0");
        assert!(config.jwt.secret.len() >= 32);
    }

    #[test]
    fn test_env_parse_falls_back() {
        assert_eq!(env_parse("TAB_SERVER_TEST_UNSET_PORT", 8000u16), 8000);
        assert_eq!(env_or("TAB_SERVER_TEST_UNSET_HOST", "0.0.0.0"), "0.0.0.0");
        assert!(env_opt("TAB_SERVER_TEST_UNSET_DIR").is_none());
    }
}
