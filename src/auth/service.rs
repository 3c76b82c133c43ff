// src/auth/service.rs
//! Mock credential authentication service
//!
//! Accepts an opaque credential string shaped like a Google ID token
//! (three dot-separated segments), resolves it to one of a fixed set of
//! demo identities, and issues a self-signed HS256 token. The fallback
//! selection is a non-authoritative demo mechanism, never an identity
//! boundary.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::env;
use tracing::{debug, info, warn};

use super::models::{AuthRequest, AuthResponse, Claims, MockUser};
use crate::common::{generate_raw_id, safe_email_log};

/// Uniform rejection message for every semantically invalid credential.
/// Distinct failure causes intentionally collapse into this one string so
/// callers cannot distinguish parse errors from unknown identities.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "Credencial Google inválida ou não reconhecida";

/// Issued token lifetime in seconds
pub const TOKEN_TTL_SECONDS: i64 = 3600;

const TOKEN_ISSUER: &str = "yagnostic-api";
const DEFAULT_AUDIENCE: &str = "yagnostic-web";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIAL_MESSAGE)]
    InvalidCredential,

    #[error("Token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

/// Fixed demo identity directory, immutable after startup
#[derive(Debug, Clone)]
pub struct MockUserDirectory {
    users: Vec<MockUser>,
}

impl MockUserDirectory {
    /// Load the directory from MOCK_USERS_JSON, falling back to the
    /// built-in demo identities when the variable is absent or malformed.
    pub fn from_env() -> Self {
        match env::var("MOCK_USERS_JSON") {
            Ok(raw) if !raw.trim().is_empty() => {
                match serde_json::from_str::<Vec<MockUser>>(&raw) {
                    Ok(users) if !users.is_empty() => {
                        info!(count = users.len(), "Loaded mock user directory from MOCK_USERS_JSON");
                        Self { users }
                    }
                    Ok(_) => {
                        warn!("MOCK_USERS_JSON is an empty list, using built-in directory");
                        Self::default_directory()
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to parse MOCK_USERS_JSON, using built-in directory");
                        Self::default_directory()
                    }
                }
            }
            _ => Self::default_directory(),
        }
    }

    /// Built-in white-label demo identities
    pub fn default_directory() -> Self {
        let users = vec![
            MockUser {
                id: "U_000001".to_string(),
                email: "admin@yagnostic.local".to_string(),
                name: "Administrador Yagnostic".to_string(),
                picture: "https://yagnostic.local/avatars/admin.png".to_string(),
                email_verified: true,
            },
            MockUser {
                id: "U_000002".to_string(),
                email: "dra.ana@yagnostic.local".to_string(),
                name: "Dra. Ana Souza".to_string(),
                picture: "https://yagnostic.local/avatars/ana.png".to_string(),
                email_verified: true,
            },
            MockUser {
                id: "U_000003".to_string(),
                email: "recepcao@yagnostic.local".to_string(),
                name: "Recepção Clínica Demo".to_string(),
                picture: "https://yagnostic.local/avatars/recepcao.png".to_string(),
                email_verified: true,
            },
            MockUser {
                id: "U_000004".to_string(),
                email: "paciente@yagnostic.local".to_string(),
                name: "Carlos Pereira".to_string(),
                picture: "https://yagnostic.local/avatars/carlos.png".to_string(),
                email_verified: false,
            },
        ];
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[MockUser] {
        &self.users
    }

    pub fn find_by_email(&self, email: &str) -> Option<&MockUser> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Deterministic fallback selection: sum of character codes of the raw
    /// credential modulo directory size. Best-effort demo mapping only.
    pub fn by_credential_hash(&self, credential: &str) -> &MockUser {
        let sum: u64 = credential.chars().map(|c| c as u64).sum();
        let index = (sum % self.users.len() as u64) as usize;
        &self.users[index]
    }
}

/// Mock JWT-issuing authentication service
///
/// Stateless per call; the only shared data is the read-only directory.
#[derive(Debug)]
pub struct AuthService {
    jwt_secret: String,
    directory: MockUserDirectory,
}

impl AuthService {
    pub fn new(jwt_secret: String, directory: MockUserDirectory) -> Self {
        Self {
            jwt_secret,
            directory,
        }
    }

    pub fn mock_user_count(&self) -> usize {
        self.directory.len()
    }

    /// Authenticate a mock credential and issue an access token.
    ///
    /// Every semantically invalid credential fails with
    /// [`AuthError::InvalidCredential`]; only token signing failures
    /// surface as a distinct internal error.
    pub fn authenticate(&self, request: &AuthRequest) -> Result<AuthResponse, AuthError> {
        let credential = request.credential.trim();

        debug!(
            credential_len = credential.len(),
            client_id = ?request.client_id,
            context = ?request.context,
            "Authenticating mock credential"
        );

        if credential.is_empty() {
            warn!("Credential rejected: empty after trim");
            return Err(AuthError::InvalidCredential);
        }

        let segments: Vec<&str> = credential.split('.').collect();
        if segments.len() != 3 {
            warn!(
                segment_count = segments.len(),
                "Credential rejected: expected exactly 3 dot-separated segments"
            );
            return Err(AuthError::InvalidCredential);
        }

        let middle = segments[1];
        if middle.is_empty() {
            warn!("Credential rejected: empty payload segment");
            return Err(AuthError::InvalidCredential);
        }

        let payload = decode_segment(middle).ok_or_else(|| {
            warn!("Credential rejected: payload segment is not base64-encoded JSON");
            AuthError::InvalidCredential
        })?;

        let user = self.resolve_user(credential, &payload);

        let access_token = self.issue_token(&user, request.client_id.as_deref())?;

        let response = AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL_SECONDS,
            user: user.clone(),
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            request_id: format!("req_{}", generate_raw_id(12)),
        };

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            request_id = %response.request_id,
            "Mock authentication successful"
        );

        Ok(response)
    }

    /// Re-issue a fresh token for an already-validated subject.
    pub fn refresh(&self, claims: &Claims) -> Result<AuthResponse, AuthError> {
        // Prefer the live directory record; a token issued before a
        // directory reconfiguration still refreshes from its own claims.
        let user = self
            .directory
            .find_by_email(&claims.email)
            .cloned()
            .unwrap_or_else(|| MockUser {
                id: claims.sub.clone(),
                email: claims.email.clone(),
                name: claims.name.clone(),
                picture: claims.picture.clone(),
                email_verified: claims.email_verified,
            });

        let access_token = self.issue_token(&user, Some(claims.aud.as_str()))?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "Token refreshed"
        );

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL_SECONDS,
            user,
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            request_id: format!("req_{}", generate_raw_id(12)),
        })
    }

    fn resolve_user(&self, credential: &str, payload: &serde_json::Value) -> MockUser {
        if let Some(email) = payload.get("email").and_then(|v| v.as_str()) {
            if let Some(user) = self.directory.find_by_email(email) {
                debug!(
                    email = %safe_email_log(email),
                    "Resolved mock user by credential email"
                );
                return user.clone();
            }
        }

        let user = self.directory.by_credential_hash(credential);
        debug!(
            user_id = %user.id,
            "No email match in credential payload, using deterministic fallback selection"
        );
        user.clone()
    }

    fn issue_token(&self, user: &MockUser, client_id: Option<&str>) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp() as usize;
        let exp = iat + TOKEN_TTL_SECONDS as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            email_verified: user.email_verified,
            iat,
            exp,
            iss: TOKEN_ISSUER.to_string(),
            aud: client_id.unwrap_or(DEFAULT_AUDIENCE).to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}

/// Decode a credential payload segment as base64-encoded JSON.
///
/// Demo credentials arrive with whatever base64 variant the caller's
/// tooling produced, so the standard and url-safe alphabets are both
/// accepted, padded or not.
fn decode_segment(segment: &str) -> Option<serde_json::Value> {
    let engines = [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD];
    let bytes = engines.iter().find_map(|engine| engine.decode(segment).ok())?;
    serde_json::from_slice(&bytes).ok()
}
