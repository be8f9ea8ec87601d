//! 认证相关的 HTTP 处理器
//!
//! 提供注册、登录和登出 API

use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection};
use cloblox_shared::observability::metrics;
use tracing::info;
use validator::Validate;

use crate::dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse};
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::state::AppState;

fn outcome<T>(result: &Result<T>) -> &'static str {
    if result.is_ok() { "success" } else { "failure" }
}

/// 用户注册
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>> {
    let result = create_account(&state, payload).await;
    metrics::record_auth_event("register", outcome(&result));
    result.map(Json)
}

async fn create_account(
    state: &AppState,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<RegisterResponse> {
    let Json(req) = payload?;
    req.validate()?;

    // 先查一次，避免为重复用户名计算哈希；唯一性最终由 create 保证
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::UsernameTaken(req.username));
    }

    let password_hash = state.password_hasher.hash_blocking(req.password).await?;
    let user_id = state.users.create(&req.username, &password_hash).await?;

    metrics::set_registered_users(state.users.count().await?);
    info!(user_id = %user_id, username = %req.username, "用户注册成功");

    Ok(RegisterResponse {
        success: true,
        user_id,
    })
}

/// 用户登录
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let result = authenticate(&state, payload).await;
    metrics::record_auth_event("login", outcome(&result));
    result.map(Json)
}

async fn authenticate(
    state: &AppState,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<LoginResponse> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::UserNotFound(req.username.clone()))?;

    // 平台关联用户没有本地密码，不能登录
    let password_hash = user
        .password_hash
        .ok_or_else(|| ApiError::UserNotFound(req.username.clone()))?;

    let valid = state
        .password_hasher
        .verify_blocking(req.password, password_hash)
        .await?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let (token, expires_at) = state.jwt_manager.generate_token(&user.id)?;
    info!(user_id = %user.id, "用户登录成功");

    Ok(LoginResponse {
        success: true,
        token,
        user_id: user.id,
        username: user.username,
        expires_at,
    })
}

/// 登出
///
/// POST /logout
///
/// Token 无服务端状态，登出只由客户端丢弃 Token 完成
pub async fn logout(Extension(user): Extension<AuthUser>) -> Json<MessageResponse> {
    metrics::record_auth_event("logout", "success");
    info!(user_id = %user.user_id, "用户登出");
    Json(MessageResponse::ok("已成功退出登录"))
}
