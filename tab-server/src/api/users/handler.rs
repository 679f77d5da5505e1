//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{LoginRequest, Principal, Token, UserCreate, UserInfo, UserUpdate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// POST /user/login - 公共接口
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<Token>>> {
    let token = state.users.login(req).await?;
    Ok(ok(token))
}

/// POST /user/register - Manager
pub async fn register(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state.users.register(payload, &principal).await?;
    let message = format!("User {} created successfully", user.username);
    Ok((StatusCode::CREATED, ok_with_message(user, message)))
}

/// GET /user/me
pub async fn me(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    Ok(ok(state.users.me(&principal).await?))
}

/// GET /user/list - Manager
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Vec<UserInfo>>>> {
    Ok(ok(state.users.list_users(&principal).await?))
}

/// DELETE /user/delete/{username} - Manager
pub async fn delete(
    State(state): State<ServerState>,
    principal: Principal,
    Path(username): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.users.delete_user(&username, &principal).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// PUT /user/update/{username} - Manager 或本人
pub async fn update(
    State(state): State<ServerState>,
    principal: Principal,
    Path(username): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let user = state.users.update_user(&username, payload, &principal).await?;
    Ok(ok_with_message(user, "User updated successfully"))
}
