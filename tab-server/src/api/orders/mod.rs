//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/order", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/status/{order_id}", get(handler::status))
        .route("/get/{order_id}", get(handler::get_by_id))
        .route("/update/{order_id}", put(handler::replace_items))
        .route("/cancel/{order_id}", delete(handler::cancel))
        .route("/make_takeaway/{order_id}", put(handler::make_takeaway))
        .route("/all", get(handler::list_mine))
        .route("/modify_order_items/{order_id}", put(handler::modify_items))
        .route("/mark_takeaway/{order_id}", put(handler::mark_takeaway))
        .route(
            "/set_billing_status/{order_id}/{status}",
            put(handler::set_billing_status),
        )
}
