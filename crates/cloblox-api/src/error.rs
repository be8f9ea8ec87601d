//! 服务错误类型定义
//!
//! 所有错误统一以 `{"error": "<message>"}` 的 JSON 返回给客户端

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::platform::PlatformError;

/// 服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 请求错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("用户名已存在: {0}")]
    UsernameTaken(String),

    // 登录错误
    #[error("用户不存在: {0}")]
    UserNotFound(String),
    #[error("密码错误")]
    InvalidCredentials,

    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("无效的 Token")]
    InvalidToken,
    /// Token 合法但对应的用户记录已不存在（例如进程重启后内存数据丢失）
    #[error("账号不存在或已失效")]
    AccountNotFound(String),

    // 第三方平台
    #[error("平台用户不存在: {0}")]
    PlatformUserNotFound(String),
    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: PlatformError,
    },

    // 系统错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 包装第三方平台错误，message 是返回给客户端的通用提示
    pub fn upstream(message: &'static str, source: PlatformError) -> Self {
        Self::Upstream { message, source }
    }

    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::UsernameTaken(_)
            | Self::UserNotFound(_)
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,

            Self::Unauthorized(_) | Self::InvalidToken | Self::AccountNotFound(_) => {
                StatusCode::UNAUTHORIZED
            }

            Self::PlatformUserNotFound(_) => StatusCode::NOT_FOUND,

            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于日志和指标标签）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::PlatformUserNotFound(_) => "PLATFORM_USER_NOT_FOUND",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Upstream { message, source } => {
                tracing::error!(error = %source, "第三方平台调用失败");
                (*message).to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::AccountNotFound(user_id) => {
                tracing::warn!(user_id = %user_id, "Token 对应的用户不存在");
                self.to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体不是合法 JSON 或字段类型不符
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 阻塞任务（密码哈希）异常退出
impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("后台任务执行失败: {}", err))
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
