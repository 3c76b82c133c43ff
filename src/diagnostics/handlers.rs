//! Diagnostics upload handlers

use axum::extract::{Extension, Multipart};
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{DiagnosticsSubmission, SubmitResponse};
use super::validators::validate_document;
use crate::auth::AuthedUser;
use crate::common::{generate_upload_id, safe_email_log, ApiError, AppState};
use crate::services::forwarder::ForwardError;

/// POST /diagnostics/submit - Forward a document to the diagnostics pipeline
///
/// # Request
/// Multipart form with fields:
/// - `file` - the document (PDF or image)
/// - `generateAudio` - "true"/"false"
/// - `voiceID` - optional TTS voice selector
pub async fn submit_diagnostics(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.id, "📄 Receiving document for diagnostics");

    let submission = parse_submission(multipart).await?;

    let content_type = validate_document(&submission.data).map_err(|reason| {
        warn!(
            user_id = %authed.id,
            filename = %submission.filename,
            reason = %reason,
            "Upload rejected"
        );
        ApiError::BadRequest(reason)
    })?;

    let upload_id = generate_upload_id();
    let size = submission.data.len();

    let diagnostic = state
        .diagnostics_service
        .submit(
            &submission.filename,
            content_type,
            submission.data,
            submission.generate_audio,
            submission.voice_id.as_deref(),
        )
        .await
        .map_err(|e| match e {
            ForwardError::InvalidPart(_) => {
                ApiError::BadRequest("Uploaded file could not be packaged".to_string())
            }
            ForwardError::Unreachable(_) => {
                ApiError::ServiceUnavailable("diagnostics service unavailable".to_string())
            }
            ForwardError::UpstreamStatus(status) => ApiError::ServiceUnavailable(format!(
                "diagnostics service returned status {}",
                status
            )),
            ForwardError::MalformedBody(_) => {
                ApiError::ServiceUnavailable("diagnostics service returned a malformed response".to_string())
            }
        })?;

    info!(
        upload_id = %upload_id,
        user_id = %authed.id,
        email = %safe_email_log(&authed.email),
        filename = %submission.filename,
        size = size,
        "Document forwarded for diagnostics"
    );

    Ok(Json(SubmitResponse {
        upload_id,
        filename: submission.filename,
        status: "processed".to_string(),
        diagnostic,
    }))
}

/// Pull the expected fields out of the multipart payload.
async fn parse_submission(mut multipart: Multipart) -> Result<DiagnosticsSubmission, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut generate_audio = false;
    let mut voice_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart payload".to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("document.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
                file = Some((filename, data.to_vec()));
            }
            Some("generateAudio") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid generateAudio field".to_string()))?;
                generate_audio = matches!(value.trim(), "true" | "1");
            }
            Some("voiceID") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid voiceID field".to_string()))?;
                if !value.trim().is_empty() {
                    voice_id = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    Ok(DiagnosticsSubmission {
        filename,
        data,
        generate_audio,
        voice_id,
    })
}
