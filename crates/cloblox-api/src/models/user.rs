//! 用户记录模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 游玩历史条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub game_id: String,
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            date: Utc::now(),
        }
    }
}

/// 用户记录
///
/// 只在仓储内部和处理器之间流转，不直接序列化给客户端，
/// 密码哈希因此不会出现在任何响应里。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// 通过平台查询关联进来的用户没有本地密码
    pub password_hash: Option<String>,
    pub favorites: Vec<String>,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// 注册用户
    pub fn registered(id: String, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash: Some(password_hash),
            favorites: Vec::new(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// 从第三方平台关联进来的用户
    pub fn linked(platform_id: String, username: String) -> Self {
        Self {
            id: platform_id,
            username,
            password_hash: None,
            favorites: Vec::new(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// 收藏游戏，已收藏时不重复添加
    pub fn add_favorite(&mut self, game_id: &str) {
        if !self.favorites.iter().any(|id| id == game_id) {
            self.favorites.push(game_id.to_string());
        }
    }

    /// 取消收藏，未收藏时无副作用
    pub fn remove_favorite(&mut self, game_id: &str) {
        self.favorites.retain(|id| id != game_id);
    }
}
