//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能。验证失败的原因（格式错误、签名不匹配、
//! 已过期、签发者不符）对调用方统一表现为 `ApiError::InvalidToken`，
//! 具体原因只写入 debug 日志。

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, Result};

/// JWT 配置
#[derive(Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in_secs", &self.expires_in_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// 创建 JWT 管理器
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token，返回 (token, 过期时间戳)
    pub fn generate_token(&self, user_id: &str) -> Result<(String, i64)> {
        self.generate_token_at(user_id, Utc::now().timestamp())
    }

    /// 以指定签发时间生成 Token
    pub fn generate_token_at(&self, user_id: &str, issued_at: i64) -> Result<(String, i64)> {
        let exp = issued_at
            .checked_add(self.config.expires_in_secs)
            .ok_or_else(|| {
                ApiError::Internal(format!(
                    "Token 有效期超出范围: {}",
                    self.config.expires_in_secs
                ))
            })?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp,
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp))
    }

    /// 验证并解析 JWT Token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.verify_token_at(token, Utc::now().timestamp())
    }

    /// 以指定的当前时间验证 Token
    ///
    /// `now <= exp` 时有效，没有宽限时间
    pub fn verify_token_at(&self, token: &str, now: i64) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // 过期由下面的显式比较判断，时间来源可注入
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!(reason = ?e.kind(), "token rejected");
            ApiError::InvalidToken
        })?;

        if token_data.claims.exp < now {
            debug!(exp = token_data.claims.exp, now, "token rejected: expired");
            return Err(ApiError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// 获取 Token 过期时间（秒）
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expires_in_secs
    }
}
