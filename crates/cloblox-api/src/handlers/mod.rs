//! HTTP 请求处理器模块

pub mod auth;
pub mod favorites;
pub mod history;
pub mod notifications;
pub mod platform;

use axum::Json;

use crate::dto::HealthResponse;

/// 健康检查
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
