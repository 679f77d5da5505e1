//! Cook API 模块 - 厨房队列与菜单目录

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/cook", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/list_pending_dishes", get(handler::list_pending_dishes))
        .route(
            "/update_order_status/{order_id}",
            put(handler::update_order_status),
        )
        .route("/list_dishes", get(handler::list_dishes))
        .route("/add_dish", post(handler::add_dish))
        .route("/modify_dish/{dish_id}", put(handler::modify_dish))
        .route("/delete_dish/{dish_id}", delete(handler::delete_dish))
}
