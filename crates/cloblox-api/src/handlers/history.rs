//! 游玩历史处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::info;

use crate::dto::{HistoryResponse, MessageResponse};
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::models::HistoryEntry;
use crate::state::AppState;

/// 查询游玩历史，按记录顺序返回
///
/// GET /history
pub async fn list_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HistoryResponse>> {
    let record = state
        .users
        .find_by_id(&user.user_id)
        .await?
        .ok_or(ApiError::AccountNotFound(user.user_id))?;

    Ok(Json(HistoryResponse {
        history: record.history,
    }))
}

/// 记录一次游玩
///
/// POST /play/{gameId}
pub async fn play(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let total = state
        .users
        .append_history(&user.user_id, HistoryEntry::new(game_id.clone()))
        .await?;
    info!(user_id = %user.user_id, game_id = %game_id, total, "记录游玩");

    Ok(Json(MessageResponse::ok(format!("你开始玩游戏 {game_id}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{as_user, state};

    #[tokio::test]
    async fn test_play_appends_in_call_order() {
        let state = state();
        let id = state.users.create("alice", "hash").await.unwrap();

        let games = ["10", "20", "10", "30", "40"];
        for game in games {
            let Json(resp) = play(State(state.clone()), as_user(&id), Path(game.to_string()))
                .await
                .unwrap();
            assert!(resp.success);
            assert!(resp.message.contains(game));
        }

        let Json(history) = list_history(State(state), as_user(&id)).await.unwrap();
        assert_eq!(history.history.len(), games.len());
        let recorded: Vec<_> = history.history.iter().map(|e| e.game_id.as_str()).collect();
        assert_eq!(recorded, games);
        assert!(history.history.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    async fn test_history_serializes_camel_case() {
        let state = state();
        let id = state.users.create("alice", "hash").await.unwrap();
        play(State(state.clone()), as_user(&id), Path("42".to_string()))
            .await
            .unwrap();

        let Json(history) = list_history(State(state), as_user(&id)).await.unwrap();
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value["history"][0]["gameId"], "42");
        assert!(value["history"][0]["date"].is_string());
    }

    #[tokio::test]
    async fn test_play_for_unknown_account() {
        let err = play(State(state()), as_user("gone"), Path("1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccountNotFound(_)));
    }
}
