//! Notification stub data models

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Channels a notification stub can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Whatsapp,
}

/// In-memory record of an accepted notification request
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRecord {
    pub track_id: String,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub requested_by: String,
    pub submitted_at: String,
}

/// Additive in-memory notification log; entries are appended, never removed
pub type NotificationLog = Arc<RwLock<Vec<NotificationRecord>>>;

pub fn new_notification_log() -> NotificationLog {
    Arc::new(RwLock::new(Vec::new()))
}

/// POST /notify/email request body
#[derive(Debug, Deserialize)]
pub struct EmailNotificationRequest {
    pub to: String,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// POST /notify/whatsapp request body
#[derive(Debug, Deserialize)]
pub struct WhatsAppNotificationRequest {
    pub phone: String,
    pub message: Option<String>,
}

/// Acknowledgement returned for an accepted notification request
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub status: String,
    #[serde(rename = "trackId")]
    pub track_id: String,
}
