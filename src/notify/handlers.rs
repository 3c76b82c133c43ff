//! Notification stub handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{
    EmailNotificationRequest, NotificationChannel, NotificationRecord, NotifyResponse,
    WhatsAppNotificationRequest,
};
use crate::auth::AuthedUser;
use crate::common::{generate_notification_id, safe_email_log, ApiError, AppState, Validator};

/// POST /notify/email - Accept an email notification request (stub)
///
/// The request is validated and recorded; no email is ever sent.
///
/// # Response
/// ```json
/// {
///   "status": "queued",
///   "trackId": "N_K7NP3X"
/// }
/// ```
pub async fn notify_email(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<EmailNotificationRequest>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let state = state_lock.read().await.clone();

    let record = NotificationRecord {
        track_id: generate_notification_id(),
        channel: NotificationChannel::Email,
        recipient: request.to.trim().to_string(),
        requested_by: authed.email.clone(),
        submitted_at: Utc::now().to_rfc3339(),
    };

    info!(
        track_id = %record.track_id,
        recipient = %safe_email_log(&record.recipient),
        requested_by = %safe_email_log(&authed.email),
        subject = ?request.subject,
        "📧 Email notification recorded (stub, no delivery)"
    );

    let track_id = record.track_id.clone();
    state.notification_log.write().await.push(record);

    Ok(Json(NotifyResponse {
        status: "queued".to_string(),
        track_id,
    }))
}

/// POST /notify/whatsapp - Accept a WhatsApp notification request (stub)
pub async fn notify_whatsapp(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<WhatsAppNotificationRequest>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let state = state_lock.read().await.clone();

    let record = NotificationRecord {
        track_id: generate_notification_id(),
        channel: NotificationChannel::Whatsapp,
        recipient: request.phone.trim().to_string(),
        requested_by: authed.email.clone(),
        submitted_at: Utc::now().to_rfc3339(),
    };

    info!(
        track_id = %record.track_id,
        requested_by = %safe_email_log(&authed.email),
        "📱 WhatsApp notification recorded (stub, no delivery)"
    );

    let track_id = record.track_id.clone();
    state.notification_log.write().await.push(record);

    Ok(Json(NotifyResponse {
        status: "queued".to_string(),
        track_id,
    }))
}

/// GET /notify/status - Per-channel counts of recorded notifications
pub async fn notify_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Json<serde_json::Value> {
    let state = state_lock.read().await.clone();
    let log = state.notification_log.read().await;

    let email_count = log
        .iter()
        .filter(|r| r.channel == NotificationChannel::Email)
        .count();
    let whatsapp_count = log
        .iter()
        .filter(|r| r.channel == NotificationChannel::Whatsapp)
        .count();

    Json(serde_json::json!({
        "service": "yagnostic-notify",
        "status": "operational",
        "recorded": {
            "email": email_count,
            "whatsapp": whatsapp_count,
            "total": log.len(),
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
