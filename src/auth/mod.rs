//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Mock credential parsing and user resolution
//! - JWT token issuance and validation
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::MockUser;
pub use routes::auth_routes;
pub use service::AuthService;
