//! 认证中间件
//!
//! 为受保护路由解析 [`Principal`] 并注入请求扩展

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::Principal;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

/// Route prefixes that require a credential
const PROTECTED_PREFIXES: &[&str] = &["/user/", "/order/", "/cook/", "/tabs/"];

/// Routes under a protected prefix that stay public
const PUBLIC_ROUTES: &[&str] = &["/user/login"];

fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) && !PUBLIC_ROUTES.contains(&path)
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头解析身份，成功后注入 [`Principal`]。
///
/// # 跳过认证
///
/// - `OPTIONS *` (CORS 预检)
/// - `/`, `/health` 以及其他非业务路径 (未知路径正常返回 404)
/// - `/user/login`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || !is_protected(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(credential) = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = req.uri().to_string());
        return Err(AppError::not_authenticated());
    };

    let principal: Principal = match state.identity.resolve(credential).await {
        Ok(principal) => principal,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.message.clone(),
                uri = req.uri().to_string()
            );
            return Err(e);
        }
    };

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths() {
        assert!(is_protected("/order/create"));
        assert!(is_protected("/cook/list_dishes"));
        assert!(is_protected("/tabs/list_tabs"));
        assert!(is_protected("/user/me"));

        assert!(!is_protected("/user/login"));
        assert!(!is_protected("/"));
        assert!(!is_protected("/health"));
        assert!(!is_protected("/nope"));
    }
}
