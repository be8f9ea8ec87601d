//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将用户身份注入请求扩展

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// 已认证的用户身份，仅在当前请求内有效
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// 认证中间件
///
/// 只挂载在受保护的子路由上。缺少 Token 与 Token 无效都返回 401，
/// 仅错误消息不同。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("缺少认证 Token".to_string()))?;

    let claims = state.jwt_manager.verify_token(token)?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });
    Ok(next.run(request).await)
}

/// 解析 `Bearer <token>`，认证方案名不区分大小写
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
