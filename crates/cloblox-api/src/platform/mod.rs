//! 第三方游戏平台接入
//!
//! 处理器通过 `PlatformApi` 访问平台的用户查询、资料和游戏列表接口。

mod client;
mod error;

pub use client::{HttpPlatformClient, PlatformApi};
#[cfg(test)]
pub use client::MockPlatformApi;
pub use error::PlatformError;
