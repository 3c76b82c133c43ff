//! Contact info validation for notification requests

use regex::Regex;

use super::models::{EmailNotificationRequest, WhatsAppNotificationRequest};
use crate::common::{ValidationResult, Validator};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9]{8,15}$";

impl Validator<EmailNotificationRequest> for EmailNotificationRequest {
    fn validate(&self, data: &EmailNotificationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.to.trim().is_empty() {
            result.add_error("to", "Recipient email is required");
        } else if let Ok(re) = Regex::new(EMAIL_PATTERN) {
            if !re.is_match(data.to.trim()) {
                result.add_error("to", "Recipient email is not a valid address");
            }
        }

        if let Some(subject) = &data.subject {
            if subject.len() > 255 {
                result.add_error("subject", "Subject must not exceed 255 characters");
            }
        }

        if let Some(message) = &data.message {
            if message.len() > 10_000 {
                result.add_error("message", "Message must not exceed 10000 characters");
            }
        }

        result
    }
}

impl Validator<WhatsAppNotificationRequest> for WhatsAppNotificationRequest {
    fn validate(&self, data: &WhatsAppNotificationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Strip common formatting before shape-checking the number
        let digits: String = data
            .phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if digits.trim().is_empty() {
            result.add_error("phone", "Recipient phone is required");
        } else if let Ok(re) = Regex::new(PHONE_PATTERN) {
            if !re.is_match(&digits) {
                result.add_error("phone", "Recipient phone is not a valid number");
            }
        }

        if let Some(message) = &data.message {
            if message.len() > 4_096 {
                result.add_error("message", "Message must not exceed 4096 characters");
            }
        }

        result
    }
}
