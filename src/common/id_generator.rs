// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., N_K7NP3X for notifications)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Notification track record (N_)
    Notification,
    /// Uploaded document (D_)
    Upload,
    /// Mock user (U_)
    User,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Notification => "N",
            EntityPrefix::Upload => "D",
            EntityPrefix::User => "U",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Arguments
/// * `prefix` - The entity type prefix
///
/// # Returns
/// A string in format "PREFIX_XXXXXX" (e.g., "N_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
/// Useful for request ids, filenames, or other non-entity identifiers
///
/// # Example
/// ```
/// let random_str = generate_raw_id(8);
/// // Returns something like "K7NP3XY2"
/// ```
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Generate a Notification track ID (N_XXXXXX)
pub fn generate_notification_id() -> String {
    generate_id(EntityPrefix::Notification)
}

/// Generate an Upload ID (D_XXXXXX)
pub fn generate_upload_id() -> String {
    generate_id(EntityPrefix::Upload)
}

/// Generate a User ID (U_XXXXXX)
#[allow(dead_code)]
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let track_id = generate_notification_id();
        assert!(track_id.starts_with("N_"));
        assert_eq!(track_id.len(), 8); // "N_" + 6 chars

        let upload_id = generate_upload_id();
        assert!(upload_id.starts_with("D_"));
        assert_eq!(upload_id.len(), 8);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_notification_id();
        let random_part = &id[2..]; // Skip "N_"

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        // Verify no ambiguous characters
        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_notification_id();
            assert!(ids.insert(id), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_raw_id() {
        let raw = generate_raw_id(8);
        assert_eq!(raw.len(), 8);
        assert!(!raw.contains('_')); // No prefix separator
    }

    #[test]
    fn test_all_prefixes() {
        assert!(generate_notification_id().starts_with("N_"));
        assert!(generate_upload_id().starts_with("D_"));
        assert!(generate_user_id().starts_with("U_"));
    }
}
