//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{
    ItemModifications, Order, OrderCreate, OrderItem, OrderStatusView, PaymentStatus, Principal,
};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// Item list of one order after a mutation
#[derive(Debug, Serialize)]
pub struct OrderItemsView {
    pub order_id: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize)]
pub struct BillingStatusView {
    pub order_id: String,
    pub payment_status: PaymentStatus,
}

/// POST /order/create
pub async fn create(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.create_order(payload, &principal).await?;
    Ok(ok_with_message(order, "Order created successfully"))
}

/// GET /order/status/{order_id}
pub async fn status(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderStatusView>>> {
    Ok(ok(state.orders.get_status(&order_id).await?))
}

/// GET /order/get/{order_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state.orders.get_order(&order_id).await?))
}

/// PUT /order/update/{order_id} - 整体替换菜品列表
pub async fn replace_items(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
    Json(items): Json<Vec<OrderItem>>,
) -> AppResult<Json<ApiResponse<OrderItemsView>>> {
    let items = state
        .orders
        .replace_items(&order_id, items, &principal)
        .await?;
    Ok(ok_with_message(
        OrderItemsView { order_id, items },
        "Order updated successfully",
    ))
}

/// DELETE /order/cancel/{order_id}
pub async fn cancel(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.orders.cancel_order(&order_id, &principal).await?;
    Ok(Json(ApiResponse::message("Order cancelled successfully")))
}

/// PUT /order/make_takeaway/{order_id}
pub async fn make_takeaway(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.orders.convert_to_takeaway(&order_id, &principal).await?;
    Ok(Json(ApiResponse::message(
        "Order converted to takeaway successfully",
    )))
}

/// GET /order/all - 当前用户下的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list_orders_for_user(&principal).await?))
}

/// PUT /order/modify_order_items/{order_id}
pub async fn modify_items(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
    Json(modifications): Json<ItemModifications>,
) -> AppResult<Json<ApiResponse<OrderItemsView>>> {
    let items = state
        .orders
        .modify_items(&order_id, modifications, &principal)
        .await?;
    Ok(ok_with_message(
        OrderItemsView { order_id, items },
        "Order items updated successfully",
    ))
}

/// PUT /order/mark_takeaway/{order_id} - body 为菜品 ID 列表
pub async fn mark_takeaway(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
    Json(item_ids): Json<Vec<String>>,
) -> AppResult<Json<ApiResponse<OrderItemsView>>> {
    let items = state
        .orders
        .mark_items_takeaway(&order_id, item_ids, &principal)
        .await?;
    Ok(ok_with_message(
        OrderItemsView { order_id, items },
        "Items marked as takeaway successfully",
    ))
}

/// PUT /order/set_billing_status/{order_id}/{status}
pub async fn set_billing_status(
    State(state): State<ServerState>,
    principal: Principal,
    Path((order_id, status)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<BillingStatusView>>> {
    let payment_status = state
        .orders
        .set_payment_status(&order_id, &status, &principal)
        .await?;
    Ok(ok_with_message(
        BillingStatusView {
            order_id,
            payment_status,
        },
        "Order billing status updated successfully",
    ))
}
