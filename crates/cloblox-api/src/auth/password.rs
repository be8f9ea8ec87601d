//! 密码处理
//!
//! 使用 bcrypt 生成带随机盐的密码哈希。哈希计算是 CPU 密集型操作，
//! 在异步上下文中应通过 `hash_blocking` / `verify_blocking` 调用。
//!
//! bcrypt 的输入上限是 72 字节（含结尾的 NUL），超长密码直接拒绝而不是截断。

use bcrypt::{BcryptError, non_truncating_hash, non_truncating_verify};

use crate::error::{ApiError, Result};

/// 密码哈希器
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// 创建哈希器，cost 取值范围 4..=31
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// 对密码进行哈希处理
    ///
    /// 超过 71 字节的密码返回 `ApiError::Validation`
    pub fn hash(&self, password: &str) -> Result<String> {
        non_truncating_hash(password, self.cost).map_err(|e| match e {
            BcryptError::Truncation(_) => ApiError::Validation(format!(
                "密码不能超过 71 字节（当前 {} 字节）",
                password.len()
            )),
            other => ApiError::Internal(format!("密码哈希失败: {}", other)),
        })
    }

    /// 验证密码
    ///
    /// 密码不匹配或超长返回 `Ok(false)`；存储的哈希格式损坏才返回错误
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        match non_truncating_verify(password, hash) {
            Ok(valid) => Ok(valid),
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(e) => Err(ApiError::Internal(format!("密码验证失败: {}", e))),
        }
    }

    /// 在阻塞线程池中计算哈希
    pub async fn hash_blocking(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    /// 在阻塞线程池中验证密码
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await?
    }
}
