//! Notification routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the notification router
///
/// # Routes
/// - `POST /notify/email` - Record an email notification (stub)
/// - `POST /notify/whatsapp` - Record a WhatsApp notification (stub)
/// - `GET /notify/status` - Per-channel recorded counts
pub fn notify_routes() -> Router {
    Router::new()
        .route("/notify/email", post(handlers::notify_email))
        .route("/notify/whatsapp", post(handlers::notify_whatsapp))
        .route("/notify/status", get(handlers::notify_status))
}
