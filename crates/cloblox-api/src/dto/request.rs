//! 请求 DTO 定义

use serde::Deserialize;
use validator::Validate;

/// 注册请求
///
/// 字段缺失按空字符串处理，由校验统一报告
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "用户名和密码不能为空"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "用户名和密码不能为空"))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "用户名和密码不能为空"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "用户名和密码不能为空"))]
    pub password: String,
}
