//! Cloblox 后端服务
//!
//! 第三方游戏平台公开 API 的代理层，附带用户名密码认证、
//! 收藏和游玩历史。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 签发验证与密码哈希
//! - `middleware`: Bearer Token 认证中间件
//! - `repository`: 用户凭据存储
//! - `platform`: 第三方平台 HTTP 客户端
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod platform;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use state::AppState;
