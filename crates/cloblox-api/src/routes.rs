//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射以及全局中间件

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use cloblox_shared::observability::middleware as obs_middleware;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{handlers, middleware::auth_middleware, state::AppState};

/// 公开路由，无需认证
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/user/{username}", get(handlers::platform::get_user))
        .route("/games/{userId}", get(handlers::platform::list_games))
}

/// 需要 Bearer Token 的路由
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/favorite/{gameId}",
            post(handlers::favorites::add_favorite).delete(handlers::favorites::remove_favorite),
        )
        .route("/favorites", get(handlers::favorites::list_favorites))
        .route("/history", get(handlers::history::list_history))
        .route("/play/{gameId}", post(handlers::history::play))
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        // route_layer 只作用于已匹配的路由，未知路径仍返回 404
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// 构建完整应用
pub fn app(state: AppState, cors_origins: &str) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(cors_origins))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// CORS 配置，`*` 表示允许任意来源
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 为所有响应注入 HTTP 安全头
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    response
}
