//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use cloblox_shared::config::{AppConfig, AuthConfig};
use rand::{Rng, distr::Alphanumeric};
use tracing::warn;

use crate::auth::{JwtConfig, JwtManager, PasswordHasher};
use crate::platform::{HttpPlatformClient, PlatformApi};
use crate::repository::{MemoryUserRepository, UserRepositoryTrait};

/// Axum 应用共享状态
///
/// 启动时构建一次，通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// 用户凭据存储
    pub users: Arc<dyn UserRepositoryTrait>,
    /// Token 签发与验证
    pub jwt_manager: Arc<JwtManager>,
    /// 密码哈希器
    pub password_hasher: PasswordHasher,
    /// 第三方平台客户端
    pub platform: Arc<dyn PlatformApi>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        jwt_manager: Arc<JwtManager>,
        password_hasher: PasswordHasher,
        platform: Arc<dyn PlatformApi>,
    ) -> Self {
        Self {
            users,
            jwt_manager,
            password_hasher,
            platform,
        }
    }
}

impl AppState {
    /// 按配置构建默认组件：内存存储 + HTTP 平台客户端
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let secret = resolve_jwt_secret(&config.auth, config.is_production())?;

        let jwt_manager = JwtManager::new(JwtConfig {
            secret,
            expires_in_secs: config.auth.token_ttl_secs,
            issuer: config.auth.issuer.clone(),
        });
        let platform = HttpPlatformClient::new(&config.platform)?;

        Ok(Self::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(jwt_manager),
            PasswordHasher::new(config.auth.bcrypt_cost),
            Arc::new(platform),
        ))
    }
}

/// 确定 JWT 签名密钥
///
/// 生产环境必须显式配置；开发环境未配置时生成进程级随机密钥，
/// 重启后此前签发的 Token 全部失效。
pub fn resolve_jwt_secret(auth: &AuthConfig, is_production: bool) -> anyhow::Result<String> {
    match auth.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret.to_string()),
        None if is_production => {
            anyhow::bail!("生产环境必须设置 CLOBLOX_JWT_SECRET 或 auth.jwt_secret")
        }
        None => {
            warn!("未配置 JWT 密钥，使用随机生成的临时密钥；生产环境请设置 CLOBLOX_JWT_SECRET");
            Ok(rand::rng()
                .sample_iter(Alphanumeric)
                .take(64)
                .map(char::from)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with(secret: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.map(String::from),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_configured_secret_is_used() {
        let secret = resolve_jwt_secret(&auth_with(Some("s3cret")), true).unwrap();
        assert_eq!(secret, "s3cret");
    }

    #[test]
    fn test_missing_secret_fails_in_production() {
        assert!(resolve_jwt_secret(&auth_with(None), true).is_err());
        assert!(resolve_jwt_secret(&auth_with(Some("")), true).is_err());
    }

    #[test]
    fn test_missing_secret_generated_in_development() {
        let first = resolve_jwt_secret(&auth_with(None), false).unwrap();
        let second = resolve_jwt_secret(&auth_with(None), false).unwrap();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_from_config_with_defaults() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("from-config".to_string());

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.jwt_manager.expires_in_secs(), 86400);
        assert_eq!(state.password_hasher.cost(), 10);
    }

    #[test]
    fn test_from_config_rejects_bad_platform_url() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("from-config".to_string());
        config.platform.games_base_url = "::not-a-url".to_string();

        assert!(AppState::from_config(&config).is_err());
    }
}
