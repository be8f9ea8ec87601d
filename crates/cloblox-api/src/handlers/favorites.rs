//! 收藏处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::debug;

use crate::dto::{FavoritesMutationResponse, FavoritesResponse};
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// 收藏游戏，重复收藏不产生重复项
///
/// POST /favorite/{gameId}
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> Result<Json<FavoritesMutationResponse>> {
    let favorites = state.users.add_favorite(&user.user_id, &game_id).await?;
    debug!(user_id = %user.user_id, game_id = %game_id, "收藏游戏");

    Ok(Json(FavoritesMutationResponse {
        success: true,
        favorites,
    }))
}

/// 取消收藏，未收藏的游戏直接忽略
///
/// DELETE /favorite/{gameId}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> Result<Json<FavoritesMutationResponse>> {
    let favorites = state.users.remove_favorite(&user.user_id, &game_id).await?;
    debug!(user_id = %user.user_id, game_id = %game_id, "取消收藏");

    Ok(Json(FavoritesMutationResponse {
        success: true,
        favorites,
    }))
}

/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FavoritesResponse>> {
    let record = state
        .users
        .find_by_id(&user.user_id)
        .await?
        .ok_or(ApiError::AccountNotFound(user.user_id))?;

    Ok(Json(FavoritesResponse {
        favorites: record.favorites,
    }))
}
