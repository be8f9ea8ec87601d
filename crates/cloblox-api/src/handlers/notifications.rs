//! 通知处理器
//!
//! 通知是固定的模拟数据，时间取当前时间

use axum::{Extension, Json};
use chrono::Utc;

use crate::dto::{Notification, NotificationsResponse};
use crate::middleware::AuthUser;

const MESSAGES: [&str; 2] = ["你获得了一件新物品！", "你的好友开始玩 Cloblox 了！"];

/// GET /notifications
pub async fn list_notifications(Extension(_user): Extension<AuthUser>) -> Json<NotificationsResponse> {
    let now = Utc::now();
    let notifications = MESSAGES
        .iter()
        .map(|message| Notification {
            message: (*message).to_string(),
            date: now,
        })
        .collect();

    Json(NotificationsResponse { notifications })
}
