//! Upload validation for the diagnostics flow

/// Content types the diagnostics pipeline accepts
const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/tiff",
];

/// Sniff and validate an uploaded document.
///
/// Returns the detected mime type, or an error message when the content
/// is empty, unrecognizable, or outside the allowlist. The client-sent
/// content type is ignored on purpose; only the sniffed bytes count.
pub fn validate_document(data: &[u8]) -> Result<&'static str, String> {
    if data.is_empty() {
        return Err("Uploaded file is empty".to_string());
    }

    let info = infer::get(data)
        .ok_or_else(|| "Uploaded file type could not be recognized".to_string())?;

    let mime = info.mime_type();
    ALLOWED_MIME_TYPES
        .iter()
        .find(|allowed| **allowed == mime)
        .copied()
        .ok_or_else(|| format!("File type {} is not accepted for diagnostics", mime))
}
