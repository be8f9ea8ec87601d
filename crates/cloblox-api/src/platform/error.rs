//! 平台调用错误

/// 平台接口调用失败的原因，仅用于日志，不直接返回给客户端
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("平台请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("平台返回异常状态 {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("无效的平台地址: {0}")]
    InvalidUrl(String),
}
