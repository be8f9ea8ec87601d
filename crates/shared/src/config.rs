//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许的 CORS 来源，逗号分隔；`*` 表示不限制
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: "*".to_string(),
        }
    }
}

/// 认证配置
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 签名密钥，未配置时由启动流程决定如何处理
    pub jwt_secret: Option<String>,
    /// Token 有效期（秒）
    pub token_ttl_secs: i64,
    /// Token 签发者
    pub issuer: String,
    /// bcrypt 成本因子
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 86400, // 24 小时
            issuer: "cloblox-api".to_string(),
            bcrypt_cost: 10,
        }
    }
}

// 密钥不能出现在日志里
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("issuer", &self.issuer)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// 第三方游戏平台 API 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// 按用户名查询用户 ID 的服务地址
    pub lookup_base_url: String,
    /// 用户资料服务地址
    pub users_base_url: String,
    /// 游戏列表服务地址
    pub games_base_url: String,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
    /// 游戏列表每次拉取的数量
    pub games_limit: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            lookup_base_url: "https://api.roblox.com".to_string(),
            users_base_url: "https://users.roblox.com".to_string(),
            games_base_url: "https://games.roblox.com".to_string(),
            timeout_secs: 10,
            games_limit: 10,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub platform: PlatformConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "cloblox-api".to_string(),
            environment: "development".to_string(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            platform: PlatformConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（CLOBLOX_ 前缀，层级用双下划线，如 CLOBLOX_AUTH__BCRYPT_COST -> auth.bcrypt_cost）
    /// 5. 快捷覆盖：CLOBLOX_JWT_SECRET、{SERVICE}_PORT（如 CLOBLOX_API_PORT）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("CLOBLOX_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    /// 从指定目录加载配置，环境名由调用方给出
    pub fn load_from(
        config_dir: &Path,
        environment: &str,
        service_name: &str,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", environment)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", environment))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            .add_source(
                Environment::with_prefix("CLOBLOX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if let Ok(secret) = std::env::var("CLOBLOX_JWT_SECRET") {
            if !secret.is_empty() {
                config.auth.jwt_secret = Some(secret);
            }
        }

        if let Some(port) = Self::service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 服务特定端口环境变量名
    ///
    /// 将 "cloblox-api" 转换为 "CLOBLOX_API_PORT"
    fn service_port_env_name(service_name: &str) -> String {
        format!("{}_PORT", service_name.to_uppercase().replace('-', "_"))
    }

    fn service_port_from_env(service_name: &str) -> Option<u16> {
        std::env::var(Self::service_port_env_name(service_name))
            .ok()
            .and_then(|v| v.parse().ok())
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
