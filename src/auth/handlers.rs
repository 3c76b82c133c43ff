//! Authentication handlers
//!
//! Thin HTTP adapters over [`AuthService`]: request shape validation,
//! delegation, and timing/log wrapping. Semantic credential failures are
//! surfaced unchanged with their uniform message.

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{AuthRequest, AuthResponse};
use super::service::{AuthError, INVALID_CREDENTIAL_MESSAGE};
use crate::common::{safe_email_log, ApiError, AppState};

/// POST /auth
/// Authenticates a mock credential and issues a Bearer token
///
/// # Request Body
/// ```json
/// {
///   "credential": "<three-segment mock credential>",
///   "clientId": "optional",
///   "context": "optional"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "access_token": "<jwt>",
///   "token_type": "Bearer",
///   "expires_in": 3600,
///   "user": { ... },
///   "success": true,
///   "timestamp": "...",
///   "request_id": "req_..."
/// }
/// ```
pub async fn authenticate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<AuthResponse>, ApiError> {
    let started = Instant::now();
    info!("🔐 Received credential authentication request");

    // DTO shape validation, the pipe layer in front of the service:
    // credential must be present, a string, and non-empty.
    let credential = match payload.get("credential").and_then(|v| v.as_str()) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => {
            warn!("Authentication request rejected: credential field missing or empty");
            return Err(ApiError::ValidationError(
                "credential must be a non-empty string".to_string(),
            ));
        }
    };

    let client_id = payload
        .get("clientId")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let context = payload
        .get("context")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let state = state_lock.read().await.clone();

    let request = AuthRequest {
        credential,
        client_id,
        context,
    };

    match state.auth_service.authenticate(&request) {
        Ok(response) => {
            info!(
                user_id = %response.user.id,
                email = %safe_email_log(&response.user.email),
                request_id = %response.request_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Authentication request completed"
            );
            Ok(Json(response))
        }
        Err(AuthError::InvalidCredential) => {
            warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Authentication request rejected"
            );
            Err(ApiError::Unauthorized(INVALID_CREDENTIAL_MESSAGE.to_string()))
        }
        Err(AuthError::TokenSigning(e)) => {
            error!(error = %e, "Token signing failed during authentication");
            Err(ApiError::InternalServer("token signing error".to_string()))
        }
    }
}

/// POST /auth/refresh
/// Re-issues a fresh token for a still-valid Bearer token
pub async fn refresh_token(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    match state.auth_service.refresh(&authed.claims) {
        Ok(response) => {
            info!(
                user_id = %response.user.id,
                request_id = %response.request_id,
                "Token refresh completed"
            );
            Ok(Json(response))
        }
        Err(AuthError::InvalidCredential) => {
            // refresh never parses a credential, but keep the arm total
            Err(ApiError::Unauthorized(INVALID_CREDENTIAL_MESSAGE.to_string()))
        }
        Err(AuthError::TokenSigning(e)) => {
            error!(error = %e, "Token signing failed during refresh");
            Err(ApiError::InternalServer("token signing error".to_string()))
        }
    }
}

/// GET /auth/status
/// Reports static service counts and a timestamp
///
/// # Response
/// ```json
/// {
///   "service": "yagnostic-auth",
///   "status": "operational",
///   "mockUsers": 4,
///   "timestamp": "...",
///   "version": "0.1.0",
///   "environment": "development"
/// }
/// ```
pub async fn auth_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Json<serde_json::Value> {
    let state = state_lock.read().await.clone();

    Json(serde_json::json!({
        "service": "yagnostic-auth",
        "status": "operational",
        "mockUsers": state.auth_service.mock_user_count(),
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment,
    }))
}
