//! Tests for notify module
//!
//! These tests verify contact info validation and the wire shape of the
//! acknowledgement payload.

#[cfg(test)]
mod tests {
    use super::super::models::{
        EmailNotificationRequest, NotifyResponse, WhatsAppNotificationRequest,
    };
    use crate::common::Validator;

    #[test]
    fn test_email_request_validation_success() {
        let request = EmailNotificationRequest {
            to: "paciente@example.com".to_string(),
            subject: Some("Seu diagnóstico está pronto".to_string()),
            message: Some("Acesse o painel para visualizar.".to_string()),
        };

        let result = request.validate(&request);
        assert!(result.is_valid, "valid email request should pass");
    }

    #[test]
    fn test_email_request_rejects_bad_address() {
        for bad in ["", "   ", "not-an-email", "missing@tld", "a b@example.com"] {
            let request = EmailNotificationRequest {
                to: bad.to_string(),
                subject: None,
                message: None,
            };
            let result = request.validate(&request);
            assert!(!result.is_valid, "address {:?} should fail", bad);
            assert!(result.errors.iter().any(|e| e.field == "to"));
        }
    }

    #[test]
    fn test_email_request_rejects_oversized_subject() {
        let request = EmailNotificationRequest {
            to: "paciente@example.com".to_string(),
            subject: Some("x".repeat(256)),
            message: None,
        };
        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "subject"));
    }

    #[test]
    fn test_whatsapp_request_validation_success() {
        for phone in ["+5511987654321", "11987654321", "+55 (11) 98765-4321"] {
            let request = WhatsAppNotificationRequest {
                phone: phone.to_string(),
                message: Some("Olá!".to_string()),
            };
            let result = request.validate(&request);
            assert!(result.is_valid, "phone {:?} should pass", phone);
        }
    }

    #[test]
    fn test_whatsapp_request_rejects_bad_phone() {
        for bad in ["", "abc", "123", "+55-11-abc-de"] {
            let request = WhatsAppNotificationRequest {
                phone: bad.to_string(),
                message: None,
            };
            let result = request.validate(&request);
            assert!(!result.is_valid, "phone {:?} should fail", bad);
            assert!(result.errors.iter().any(|e| e.field == "phone"));
        }
    }

    #[test]
    fn test_acknowledgement_serializes_track_id_as_camel_case() {
        let response = NotifyResponse {
            status: "queued".to_string(),
            track_id: "N_K7NP3X".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["trackId"], "N_K7NP3X");
        assert!(json.get("track_id").is_none());
    }
}
