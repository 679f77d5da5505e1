//! API 路由模块
//!
//! - [`health`] - 欢迎页和健康检查 (公共)
//! - [`users`] - 登录与账号管理 `/user/*`
//! - [`orders`] - 订单生命周期 `/order/*`
//! - [`cook`] - 厨房与菜单目录 `/cook/*`
//! - [`tabs`] - 桌台会话 `/tabs/*`

pub mod cook;
pub mod health;
pub mod orders;
pub mod tabs;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::logging_middleware;

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(orders::router())
        .merge(cook::router())
        .merge(tabs::router())
}

/// Fully layered application (outermost layer last)
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let request_id = HeaderName::from_static("x-request-id");

    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Request ID - generate and echo back
        .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
        .layer(PropagateRequestIdLayer::new(request_id))
        // Resolve Principal before logging sees the request
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
}
