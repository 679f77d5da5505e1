//! Tab API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Principal, Tab, TabCreate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub table: i64,
}

#[derive(Debug, Deserialize)]
pub struct WaiterQuery {
    #[serde(default)]
    pub waiter_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SupportQuery {
    #[serde(default)]
    pub support_text: String,
}

/// POST /tabs/add_tab - Manager
pub async fn add_tab(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<TabCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Tab>>)> {
    let tab = state.tabs.add_tab(payload, &principal).await?;
    Ok((StatusCode::CREATED, ok_with_message(tab, "Tab added successfully")))
}

/// DELETE /tabs/delete_tab/{tab_name} - Manager
pub async fn delete_tab(
    State(state): State<ServerState>,
    principal: Principal,
    Path(tab_name): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tabs.delete_tab(&tab_name, &principal).await?;
    Ok(Json(ApiResponse::message("Tab deleted successfully")))
}

/// PUT /tabs/update_tab_name/{old_name}?new_name= - Manager
pub async fn update_tab_name(
    State(state): State<ServerState>,
    principal: Principal,
    Path(old_name): Path<String>,
    Query(query): Query<RenameQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .tabs
        .rename_tab(&old_name, &query.new_name, &principal)
        .await?;
    Ok(Json(ApiResponse::message("Tab name updated successfully")))
}

/// PUT /tabs/update_table/{tab_name}?table=
pub async fn update_table(
    State(state): State<ServerState>,
    principal: Principal,
    Path(tab_name): Path<String>,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .tabs
        .bind_table(&tab_name, query.table, &principal)
        .await?;
    Ok(Json(ApiResponse::message("Table number updated successfully")))
}

/// GET /tabs/list_tabs
pub async fn list_tabs(
    State(state): State<ServerState>,
    _principal: Principal,
) -> AppResult<Json<ApiResponse<Vec<Tab>>>> {
    Ok(ok(state.tabs.list_tabs().await?))
}

/// PUT /tabs/call_waiter/{tab_name}?waiter_text=
pub async fn call_waiter(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(tab_name): Path<String>,
    Query(query): Query<WaiterQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tabs.call_waiter(&tab_name, &query.waiter_text).await?;
    Ok(Json(ApiResponse::message("Waiter called successfully")))
}

/// PUT /tabs/clear_waiter/{tab_name}
pub async fn clear_waiter(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(tab_name): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tabs.clear_waiter(&tab_name).await?;
    Ok(Json(ApiResponse::message("Waiter request cleared successfully")))
}

/// PUT /tabs/call_support/{tab_name}?support_text=
pub async fn call_support(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(tab_name): Path<String>,
    Query(query): Query<SupportQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tabs.call_support(&tab_name, &query.support_text).await?;
    Ok(Json(ApiResponse::message("Support called successfully")))
}

/// PUT /tabs/clear_support/{tab_name}
pub async fn clear_support(
    State(state): State<ServerState>,
    _principal: Principal,
    Path(tab_name): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tabs.clear_support(&tab_name).await?;
    Ok(Json(ApiResponse::message("Support request cleared successfully")))
}
