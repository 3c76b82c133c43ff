//! Tests for diagnostics module
//!
//! These tests verify upload content sniffing against the allowlist.

#[cfg(test)]
mod tests {
    use super::super::validators::validate_document;

    #[test]
    fn test_accepts_pdf_magic_bytes() {
        let data = b"%PDF-1.7\n%some pdf body".to_vec();
        assert_eq!(validate_document(&data), Ok("application/pdf"));
    }

    #[test]
    fn test_accepts_png_magic_bytes() {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0u8; 32]);
        assert_eq!(validate_document(&data), Ok("image/png"));
    }

    #[test]
    fn test_accepts_jpeg_magic_bytes() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.extend_from_slice(&[0u8; 32]);
        assert_eq!(validate_document(&data), Ok("image/jpeg"));
    }

    #[test]
    fn test_rejects_empty_upload() {
        let result = validate_document(&[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("empty"));
    }

    #[test]
    fn test_rejects_unrecognizable_bytes() {
        let data = b"plain text is not a document the pipeline accepts".to_vec();
        assert!(validate_document(&data).is_err());
    }

    #[test]
    fn test_rejects_disallowed_type() {
        // A valid ZIP header sniffs fine but is not in the allowlist
        let mut data = vec![0x50, 0x4B, 0x03, 0x04];
        data.extend_from_slice(&[0u8; 32]);
        let result = validate_document(&data);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("not accepted"));
    }
}
