// src/services/forwarder.rs
//! Client for the external diagnostics collaborator service
//!
//! The collaborator owns the actual document analysis pipeline; this
//! service only repackages the validated upload as multipart form data
//! and surfaces the collaborator's JSON response.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::env;
use std::time::Instant;
use tracing::{debug, error, info};

const DEFAULT_BASE_URL: &str = "http://localhost:4000";

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upload part: {0}")]
    InvalidPart(#[source] reqwest::Error),

    #[error("diagnostics service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("diagnostics service returned status {0}")]
    UpstreamStatus(u16),

    #[error("malformed response from diagnostics service: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct DiagnosticsService {
    http: Client,
    base_url: String,
}

impl DiagnosticsService {
    pub fn new(http: Client) -> Self {
        let base_url = env::var("DIAGNOSTICS_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        info!(base_url = %base_url, "DiagnosticsService initialized");

        Self { http, base_url }
    }

    /// Forward an uploaded document to the collaborator's submit endpoint.
    pub async fn submit(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
        generate_audio: bool,
        voice_id: Option<&str>,
    ) -> Result<serde_json::Value, ForwardError> {
        let started = Instant::now();
        let url = format!("{}/diagnostics/submit", self.base_url);

        debug!(
            url = %url,
            filename = %filename,
            content_type = %content_type,
            size = data.len(),
            generate_audio = generate_audio,
            "Forwarding document to diagnostics service"
        );

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(ForwardError::InvalidPart)?;

        let mut form = Form::new()
            .part("file", part)
            .text("generateAudio", generate_audio.to_string());
        if let Some(voice) = voice_id {
            form = form.text("voiceID", voice.to_string());
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "HTTP error contacting diagnostics service");
                ForwardError::Unreachable(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                http_status = %status,
                url = %url,
                "Diagnostics service rejected the forwarded document"
            );
            return Err(ForwardError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(ForwardError::MalformedBody)?;

        info!(
            filename = %filename,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Document forwarded to diagnostics service"
        );

        Ok(body)
    }
}
