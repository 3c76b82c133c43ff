// src/api.rs
//! HTTP client for the Yagnostic API

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("API unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("API returned a malformed response: {0}")]
    Malformed(#[source] reqwest::Error),
}

/// User payload echoed back by the auth endpoints
#[derive(Deserialize, Debug, Clone)]
pub struct ApiUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub email_verified: bool,
}

/// Response of POST /auth and POST /auth/refresh
#[derive(Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: ApiUser,
    pub success: bool,
    pub timestamp: String,
    pub request_id: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the API endpoint: --api-url flag, DIAGCLI_API_URL, default.
    pub fn from_env(override_url: Option<String>) -> Self {
        let base_url = override_url
            .or_else(|| std::env::var("DIAGCLI_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /auth with a mock credential
    pub async fn login(
        &self,
        credential: &str,
        client_id: Option<&str>,
    ) -> Result<AuthResponse, ApiClientError> {
        let mut body = serde_json::json!({ "credential": credential });
        if let Some(client_id) = client_id {
            body["clientId"] = serde_json::Value::String(client_id.to_string());
        }

        let url = format!("{}/auth", self.base_url);
        debug!(url = %url, "Sending authentication request");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiClientError::Unreachable)?;

        Self::parse_json(response).await
    }

    /// POST /auth/refresh with a still-valid token
    pub async fn refresh(&self, token: &str) -> Result<AuthResponse, ApiClientError> {
        let url = format!("{}/auth/refresh", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiClientError::Unreachable)?;

        Self::parse_json(response).await
    }

    /// POST /diagnostics/submit with a document
    pub async fn submit_diagnostics(
        &self,
        token: &str,
        filename: &str,
        data: Vec<u8>,
        generate_audio: bool,
        voice_id: Option<&str>,
    ) -> Result<serde_json::Value, ApiClientError> {
        let url = format!("{}/diagnostics/submit", self.base_url);

        let part = Part::bytes(data).file_name(filename.to_string());
        let mut form = Form::new()
            .part("file", part)
            .text("generateAudio", generate_audio.to_string());
        if let Some(voice) = voice_id {
            form = form.text("voiceID", voice.to_string());
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(ApiClientError::Unreachable)?;

        Self::parse_json(response).await
    }

    /// GET /auth/status
    pub async fn auth_status(&self) -> Result<serde_json::Value, ApiClientError> {
        let url = format!("{}/auth/status", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ApiClientError::Unreachable)?;
        Self::parse_json(response).await
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<serde_json::Value>().await {
                Ok(body) => body
                    .get("error")
                    .and_then(|v| v.as_str())
                    .unwrap_or("request failed")
                    .to_string(),
                Err(_) => "request failed".to_string(),
            };
            warn!(http_status = %status, message = %message, "API request rejected");
            return Err(ApiClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(ApiClientError::Malformed)
    }
}

/// Build a three-segment mock credential carrying the given email.
///
/// Only the middle segment matters to the API; header and signature are
/// placeholder text.
pub fn build_mock_credential(email: &str) -> String {
    let payload = serde_json::json!({ "email": email });
    format!("header.{}.signature", STANDARD.encode(payload.to_string()))
}
