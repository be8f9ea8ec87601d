//! 平台 HTTP 客户端

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cloblox_shared::config::PlatformConfig;
use cloblox_shared::observability::metrics;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::PlatformError;

const USER_AGENT: &str = concat!("cloblox-api/", env!("CARGO_PKG_VERSION"));

/// 平台接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// 按用户名查询平台用户 ID，平台不认识该用户名时返回 `None`
    async fn find_user_id(&self, username: &str) -> Result<Option<u64>, PlatformError>;

    /// 获取平台用户资料，原样返回平台的 JSON
    async fn get_user_profile(&self, user_id: u64) -> Result<Value, PlatformError>;

    /// 获取用户创建的游戏列表，原样返回平台的 JSON
    async fn list_user_games(&self, user_id: &str) -> Result<Value, PlatformError>;
}

/// 基于 reqwest 的平台客户端
#[derive(Debug, Clone)]
pub struct HttpPlatformClient {
    client: Client,
    lookup_base: Url,
    users_base: Url,
    games_base: Url,
    games_limit: u32,
}

impl HttpPlatformClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            lookup_base: parse_base(&config.lookup_base_url)?,
            users_base: parse_base(&config.users_base_url)?,
            games_base: parse_base(&config.games_base_url)?,
            games_limit: config.games_limit,
        })
    }

    /// 发送 GET 请求；`allow_not_found` 为真时 404 返回 `None`
    async fn get_json(
        &self,
        operation: &'static str,
        url: Url,
        allow_not_found: bool,
    ) -> Result<Option<Value>, PlatformError> {
        let start = Instant::now();
        let result = self.send(url, allow_not_found).await;

        let outcome = match &result {
            Ok(Some(_)) => "success",
            Ok(None) => "not_found",
            Err(_) => "error",
        };
        metrics::record_platform_request(operation, outcome, start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            warn!(operation, error = %e, "平台请求失败");
        }
        result
    }

    async fn send(&self, url: Url, allow_not_found: bool) -> Result<Option<Value>, PlatformError> {
        debug!(url = %url, "请求平台接口");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if allow_not_found && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PlatformError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Some(response.json::<Value>().await?))
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformClient {
    #[instrument(skip(self))]
    async fn find_user_id(&self, username: &str) -> Result<Option<u64>, PlatformError> {
        let mut url = join_path(&self.lookup_base, &["users", "get-by-username"])?;
        url.query_pairs_mut().append_pair("username", username);

        let body = self.get_json("find_user_id", url, true).await?;
        Ok(body.as_ref().and_then(|b| b.get("Id")).and_then(Value::as_u64))
    }

    #[instrument(skip(self))]
    async fn get_user_profile(&self, user_id: u64) -> Result<Value, PlatformError> {
        let id = user_id.to_string();
        let url = join_path(&self.users_base, &["v1", "users", &id])?;

        let body = self.get_json("get_user_profile", url, false).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    #[instrument(skip(self))]
    async fn list_user_games(&self, user_id: &str) -> Result<Value, PlatformError> {
        let mut url = join_path(&self.games_base, &["v2", "users", user_id, "games"])?;
        url.query_pairs_mut()
            .append_pair("limit", &self.games_limit.to_string());

        let body = self.get_json("list_user_games", url, false).await?;
        Ok(body.unwrap_or(Value::Null))
    }
}

fn parse_base(raw: &str) -> Result<Url, PlatformError> {
    let url = Url::parse(raw).map_err(|e| PlatformError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(PlatformError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// 在基础地址后追加路径段，每一段都会做百分号编码
fn join_path(base: &Url, segments: &[&str]) -> Result<Url, PlatformError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PlatformError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
