//! Diagnostics routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the diagnostics router
///
/// # Routes
/// - `POST /diagnostics/submit` - Validate and forward a document upload
pub fn diagnostics_routes() -> Router {
    Router::new().route("/diagnostics/submit", post(handlers::submit_diagnostics))
}
