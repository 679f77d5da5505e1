//! Cook API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Dish, DishCreate, DishUpdate, ItemStatusUpdate, OrderItem, PendingDish, Principal};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// GET /cook/list_pending_dishes - Cook
pub async fn list_pending_dishes(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Vec<PendingDish>>>> {
    Ok(ok(state.orders.list_pending_dishes(&principal).await?))
}

/// PUT /cook/update_order_status/{order_id} - Cook, 更新首个待做菜品
pub async fn update_order_status(
    State(state): State<ServerState>,
    principal: Principal,
    Path(order_id): Path<String>,
    Json(update): Json<ItemStatusUpdate>,
) -> AppResult<Json<ApiResponse<OrderItem>>> {
    let item = state
        .orders
        .update_item_status(&order_id, update, &principal)
        .await?;
    Ok(ok_with_message(item, "Order updated successfully"))
}

/// GET /cook/list_dishes
pub async fn list_dishes(
    State(state): State<ServerState>,
    _principal: Principal,
) -> AppResult<Json<ApiResponse<Vec<Dish>>>> {
    Ok(ok(state.dishes.list_dishes().await?))
}

/// POST /cook/add_dish - Cook
pub async fn add_dish(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<DishCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Dish>>)> {
    let dish = state.dishes.add_dish(payload, &principal).await?;
    Ok((StatusCode::CREATED, ok_with_message(dish, "Dish added successfully")))
}

/// PUT /cook/modify_dish/{dish_id} - Cook
pub async fn modify_dish(
    State(state): State<ServerState>,
    principal: Principal,
    Path(dish_id): Path<String>,
    Json(update): Json<DishUpdate>,
) -> AppResult<Json<ApiResponse<Dish>>> {
    let dish = state.dishes.modify_dish(&dish_id, update, &principal).await?;
    Ok(ok_with_message(dish, "Dish modified successfully"))
}

/// DELETE /cook/delete_dish/{dish_id} - Cook
pub async fn delete_dish(
    State(state): State<ServerState>,
    principal: Principal,
    Path(dish_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.dishes.delete_dish(&dish_id, &principal).await?;
    Ok(Json(ApiResponse::message("Dish deleted successfully")))
}
