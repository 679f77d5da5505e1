//! Tab API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/tabs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/add_tab", post(handler::add_tab))
        .route("/delete_tab/{tab_name}", delete(handler::delete_tab))
        .route("/update_tab_name/{old_name}", put(handler::update_tab_name))
        .route("/update_table/{tab_name}", put(handler::update_table))
        .route("/list_tabs", get(handler::list_tabs))
        .route("/call_waiter/{tab_name}", put(handler::call_waiter))
        .route("/clear_waiter/{tab_name}", put(handler::clear_waiter))
        .route("/call_support/{tab_name}", put(handler::call_support))
        .route("/clear_support/{tab_name}", put(handler::clear_support))
}
