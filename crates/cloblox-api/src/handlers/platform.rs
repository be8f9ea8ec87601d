//! 第三方平台代理处理器
//!
//! 用户资料和游戏列表直接透传平台返回的 JSON

use axum::{
    Json,
    extract::{Path, State},
};
use cloblox_shared::observability::metrics;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 按用户名查询平台用户资料
///
/// GET /user/{username}
///
/// 查询成功后把平台用户关联到本地存储（ID 和用户名都未占用时）。
/// 返回 `{userId, ...profile}`。
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    let platform_id = state
        .platform
        .find_user_id(&username)
        .await
        .map_err(|e| ApiError::upstream("获取用户信息失败", e))?
        .ok_or_else(|| ApiError::PlatformUserNotFound(username.clone()))?;

    let profile = state
        .platform
        .get_user_profile(platform_id)
        .await
        .map_err(|e| ApiError::upstream("获取用户信息失败", e))?;

    if state
        .users
        .link_platform_user(&platform_id.to_string(), &username)
        .await?
    {
        metrics::set_registered_users(state.users.count().await?);
        info!(platform_id, username = %username, "平台用户已关联");
    }

    let mut body = Map::new();
    body.insert("userId".to_string(), Value::from(platform_id));
    if let Value::Object(fields) = profile {
        body.extend(fields);
    }

    Ok(Json(Value::Object(body)))
}

/// 查询用户创建的游戏
///
/// GET /games/{userId}
pub async fn list_games(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let games = state
        .platform
        .list_user_games(&user_id)
        .await
        .map_err(|e| ApiError::upstream("获取游戏列表失败", e))?;

    Ok(Json(games))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::handlers::test_support::state_with;
    use crate::platform::{MockPlatformApi, PlatformError};

    #[tokio::test]
    async fn test_get_user_merges_profile_and_links() {
        let mut platform = MockPlatformApi::new();
        platform
            .expect_find_user_id()
            .with(eq("builderman"))
            .times(1)
            .returning(|_| Ok(Some(156)));
        platform
            .expect_get_user_profile()
            .with(eq(156u64))
            .times(1)
            .returning(|_| Ok(json!({"name": "builderman", "displayName": "Builder"})));
        let state = state_with(platform);

        let Json(body) = get_user(State(state.clone()), Path("builderman".to_string()))
            .await
            .unwrap();

        assert_eq!(body["userId"], 156);
        assert_eq!(body["displayName"], "Builder");

        let linked = state.users.find_by_id("156").await.unwrap().unwrap();
        assert_eq!(linked.username, "builderman");
        assert!(linked.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_get_user_does_not_relink() {
        let mut platform = MockPlatformApi::new();
        platform.expect_find_user_id().returning(|_| Ok(Some(156)));
        platform
            .expect_get_user_profile()
            .returning(|_| Ok(json!({"name": "builderman"})));
        let state = state_with(platform);

        for _ in 0..2 {
            get_user(State(state.clone()), Path("builderman".to_string()))
                .await
                .unwrap();
        }
        assert_eq!(state.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_user_unknown_on_platform() {
        let mut platform = MockPlatformApi::new();
        platform.expect_find_user_id().returning(|_| Ok(None));
        platform.expect_get_user_profile().never();
        let state = state_with(platform);

        let err = get_user(State(state.clone()), Path("nobody".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PlatformUserNotFound(_)));
        assert_eq!(state.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_user_upstream_failure() {
        let mut platform = MockPlatformApi::new();
        platform.expect_find_user_id().returning(|_| Ok(Some(156)));
        platform.expect_get_user_profile().returning(|_| {
            Err(PlatformError::Status {
                url: "https://users.example/v1/users/156".to_string(),
                status: 503,
            })
        });

        let err = get_user(State(state_with(platform)), Path("builderman".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream { message: "获取用户信息失败", .. }));
    }

    #[tokio::test]
    async fn test_list_games_passes_through() {
        let payload = json!({"data": [{"id": 1, "name": "Obby"}], "nextPageCursor": null});
        let expected = payload.clone();

        let mut platform = MockPlatformApi::new();
        platform
            .expect_list_user_games()
            .with(eq("156"))
            .returning(move |_| Ok(payload.clone()));

        let Json(body) = list_games(State(state_with(platform)), Path("156".to_string()))
            .await
            .unwrap();
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_list_games_upstream_failure() {
        let mut platform = MockPlatformApi::new();
        platform
            .expect_list_user_games()
            .returning(|_| Err(PlatformError::InvalidUrl("bad".to_string())));

        let err = list_games(State(state_with(platform)), Path("156".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream { message: "获取游戏列表失败", .. }));
    }
}
