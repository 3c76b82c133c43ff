// Application state shared across all modules

use reqwest::Client;
use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::notify::models::NotificationLog;
use crate::services::{DiagnosticsService, RateLimitService};

/// Application state containing services and configuration
///
/// Nothing here is mutated per-request except the additive notification
/// log and the rate limiter map, both guarded by their own locks.
#[derive(Clone)]
pub struct AppState {
    pub http: Client,
    pub jwt_secret: String,
    pub environment: String,
    pub auth_service: Arc<AuthService>,
    pub diagnostics_service: Arc<DiagnosticsService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub notification_log: NotificationLog,
}
