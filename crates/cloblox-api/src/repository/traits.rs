//! 仓储 Trait 定义

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{HistoryEntry, UserRecord};

/// 用户仓储接口
///
/// 写操作（创建、收藏增删、历史追加、平台关联）必须在实现内部串行化，
/// 用户名唯一性由 `create` 的原子“检查并插入”保证。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// 创建用户，用户名已存在时返回 `ApiError::UsernameTaken`
    async fn create(&self, username: &str, password_hash: &str) -> Result<String>;

    /// 按用户名精确查找（区分大小写）
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// 按 ID 查找
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>>;

    /// 关联第三方平台用户
    ///
    /// ID 或用户名已存在时不做任何修改，返回是否新插入了记录
    async fn link_platform_user(&self, platform_id: &str, username: &str) -> Result<bool>;

    /// 收藏游戏并返回最新收藏列表，用户不存在时返回 `ApiError::AccountNotFound`
    async fn add_favorite(&self, user_id: &str, game_id: &str) -> Result<Vec<String>>;

    /// 取消收藏并返回最新收藏列表，用户不存在时返回 `ApiError::AccountNotFound`
    async fn remove_favorite(&self, user_id: &str, game_id: &str) -> Result<Vec<String>>;

    /// 追加游玩记录，返回追加后的历史长度
    async fn append_history(&self, user_id: &str, entry: HistoryEntry) -> Result<usize>;

    /// 用户记录总数
    async fn count(&self) -> Result<usize>;
}
