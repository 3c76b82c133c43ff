//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure for issued access tokens
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub email_verified: bool,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// One of the fixed demo identities the auth flow can resolve to
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MockUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub email_verified: bool,
}

/// Parsed authentication request, one per call
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub credential: String,
    pub client_id: Option<String>,
    pub context: Option<String>,
}

/// Response returned for a successful authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: MockUser,
    pub success: bool,
    pub timestamp: String,
    pub request_id: String,
}
