//! 内存用户仓储
//!
//! 单把读写锁保护全部用户数据和用户名索引，锁不会跨越 `.await` 持有。

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::UserRepositoryTrait;
use crate::error::{ApiError, Result};
use crate::models::{HistoryEntry, UserRecord};

#[derive(Debug, Default)]
struct Inner {
    /// user_id -> 用户记录
    users: HashMap<String, UserRecord>,
    /// username -> user_id
    usernames: HashMap<String, String>,
}

impl Inner {
    fn user_mut(&mut self, user_id: &str) -> Result<&mut UserRecord> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| ApiError::AccountNotFound(user_id.to_string()))
    }
}

/// 进程内存中的用户仓储，进程退出即丢失全部数据
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    inner: RwLock<Inner>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成新的用户 ID，与已有记录冲突时重新生成
    fn next_id(inner: &Inner) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if !inner.users.contains_key(&id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<String> {
        let mut inner = self.inner.write();

        if inner.usernames.contains_key(username) {
            return Err(ApiError::UsernameTaken(username.to_string()));
        }

        let id = Self::next_id(&inner);
        inner
            .usernames
            .insert(username.to_string(), id.clone());
        inner.users.insert(
            id.clone(),
            UserRecord::registered(id.clone(), username.to_string(), password_hash.to_string()),
        );

        debug!(user_id = %id, "user record created");
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .usernames
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(self.inner.read().users.get(id).cloned())
    }

    async fn link_platform_user(&self, platform_id: &str, username: &str) -> Result<bool> {
        let mut inner = self.inner.write();

        if inner.users.contains_key(platform_id) || inner.usernames.contains_key(username) {
            return Ok(false);
        }

        inner
            .usernames
            .insert(username.to_string(), platform_id.to_string());
        inner.users.insert(
            platform_id.to_string(),
            UserRecord::linked(platform_id.to_string(), username.to_string()),
        );

        debug!(platform_id = %platform_id, "platform user linked");
        Ok(true)
    }

    async fn add_favorite(&self, user_id: &str, game_id: &str) -> Result<Vec<String>> {
        let mut inner = self.inner.write();
        let user = inner.user_mut(user_id)?;
        user.add_favorite(game_id);
        Ok(user.favorites.clone())
    }

    async fn remove_favorite(&self, user_id: &str, game_id: &str) -> Result<Vec<String>> {
        let mut inner = self.inner.write();
        let user = inner.user_mut(user_id)?;
        user.remove_favorite(game_id);
        Ok(user.favorites.clone())
    }

    async fn append_history(&self, user_id: &str, entry: HistoryEntry) -> Result<usize> {
        let mut inner = self.inner.write();
        let user = inner.user_mut(user_id)?;
        user.history.push(entry);
        Ok(user.history.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().users.len())
    }
}
