//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth` - Mock credential authentication
/// - `POST /auth/refresh` - Re-issue a token for a valid bearer
/// - `GET /auth/status` - Service status and mock user count
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth", post(handlers::authenticate))
        .route("/auth/refresh", post(handlers::refresh_token))
        .route("/auth/status", get(handlers::auth_status))
}
