//! Diagnostics data models

use serde::Serialize;

/// Parsed multipart submission, transient per request
#[derive(Debug)]
pub struct DiagnosticsSubmission {
    pub filename: String,
    pub data: Vec<u8>,
    pub generate_audio: bool,
    pub voice_id: Option<String>,
}

/// Response wrapping the collaborator's diagnostic payload
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(rename = "uploadId")]
    pub upload_id: String,
    pub filename: String,
    pub status: String,
    pub diagnostic: serde_json::Value,
}
