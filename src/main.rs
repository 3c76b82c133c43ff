// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod diagnostics;
mod logging_middleware;
mod notify;
mod rate_limit_middleware;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::service::{AuthService, MockUserDirectory};
use common::AppState;
use notify::models::new_notification_log;
use rate_limit_middleware::rate_limit_middleware;
use services::{DiagnosticsService, RateLimitService};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    // The deployment contract gates startup on a complete environment;
    // exits with code 1 when variables are missing.
    common::config::enforce_required_env();

    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let mock_users = MockUserDirectory::from_env();
    info!(
        mock_users = mock_users.len(),
        "Mock user directory initialized"
    );

    let auth_service = Arc::new(AuthService::new(jwt_secret.clone(), mock_users));
    info!("AuthService initialized");

    let diagnostics_service = Arc::new(DiagnosticsService::new(http_client.clone()));
    info!("DiagnosticsService initialized");

    let rate_limit_service = Arc::new(RateLimitService::new());
    info!("RateLimitService initialized");

    let notification_log = new_notification_log();

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        http: http_client,
        jwt_secret,
        environment,
        auth_service,
        diagnostics_service,
        rate_limit_service: rate_limit_service.clone(),
        notification_log,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // NOTIFICATION STUB ROUTES
        // ====================================================================
        .merge(notify::notify_routes())
        // ====================================================================
        // DIAGNOSTICS ROUTES
        // ====================================================================
        .merge(diagnostics::diagnostics_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(rate_limit_service))
        .layer(Extension(shared.clone()))
        .layer({
            // Get CORS origins from environment variable
            let cors_origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173".to_string()
            });

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                    axum::http::HeaderName::from_static("x-request-id"),
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
