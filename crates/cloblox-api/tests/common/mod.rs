//! 集成测试公共工具
//!
//! 以内存方式驱动完整路由，第三方平台由本地端口上的假服务替代。

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use cloblox_api::{routes, state::AppState};
use cloblox_shared::config::{AppConfig, PlatformConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// 假平台对 `/v2/users/slow/games` 的响应延迟
pub const SLOW_UPSTREAM_DELAY: Duration = Duration::from_secs(5);

/// 测试配置：低 bcrypt 成本，固定密钥
pub fn test_config(platform: PlatformConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(TEST_SECRET.to_string());
    config.auth.bcrypt_cost = 4;
    config.platform = platform;
    config
}

pub fn build_app(config: &AppConfig) -> Router {
    let state = AppState::from_config(config).expect("构建应用状态失败");
    routes::app(state, &config.server.cors_origins)
}

/// 不访问第三方平台的应用
pub fn test_app() -> Router {
    build_app(&test_config(PlatformConfig::default()))
}

/// 发送请求并解析 JSON 响应，空响应体返回 Null
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await
}

pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await
}

/// 注册并登录，返回 (userId, token)
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> (String, String) {
    let (status, _) = register(app, username, password).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = login(app, username, password).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["userId"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

// ========== 假的第三方平台 ==========

async fn lookup(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("username").map(String::as_str) {
        Some("builderman") => Json(json!({"Id": 156, "Username": "builderman"})).into_response(),
        Some("null-id") => Json(json!({"Id": null, "Username": "null-id"})).into_response(),
        Some("broken") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"errorMessage": "User not found"})),
        )
            .into_response(),
    }
}

async fn profile(Path(id): Path<u64>) -> Response {
    match id {
        156 => Json(json!({
            "id": 156,
            "name": "builderman",
            "displayName": "Builder Man",
            "description": "Building worlds",
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn games(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if id == "500" {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if id == "slow" {
        tokio::time::sleep(SLOW_UPSTREAM_DELAY).await;
    }
    Json(json!({
        "owner": id,
        "limit": params.get("limit").cloned(),
        "data": [{"id": 1818, "name": "Crossroads"}],
    }))
    .into_response()
}

/// 在随机端口启动假平台，返回指向它的平台配置
pub async fn spawn_fake_platform() -> PlatformConfig {
    let router = Router::new()
        .route("/users/get-by-username", get(lookup))
        .route("/v1/users/{id}", get(profile))
        .route("/v2/users/{id}/games", get(games));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base = format!("http://{addr}");
    PlatformConfig {
        lookup_base_url: base.clone(),
        users_base_url: base.clone(),
        games_base_url: base,
        timeout_secs: 5,
        games_limit: 10,
    }
}

/// 指向一个已关闭端口的平台配置
pub async fn unreachable_platform() -> PlatformConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{addr}");
    PlatformConfig {
        lookup_base_url: base.clone(),
        users_base_url: base.clone(),
        games_base_url: base,
        timeout_secs: 2,
        games_limit: 10,
    }
}
