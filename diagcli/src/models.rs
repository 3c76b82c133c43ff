//! Client-side data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One cached authenticated identity, stored as its own row
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct UserSession {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub token: String,
    pub refresh_token: Option<String>,
    pub expires_at: String,
    pub last_used: String,
    pub login_method: String,
    pub is_active: bool,
    pub branding: Option<String>,
}

impl UserSession {
    /// A session whose expiry has passed must never be treated as valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) < now,
            // Unparseable expiry counts as expired
            Err(_) => true,
        }
    }

    /// Seconds until expiry, zero when already expired.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => (expires_at.with_timezone(&Utc) - now).num_seconds().max(0),
            Err(_) => 0,
        }
    }
}

/// Local record of one upload attempt
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct UploadRecord {
    pub id: String,
    pub filename: String,
    pub size: i64,
    pub status: String,
    pub diagnostic: Option<String>,
    pub submitted_at: String,
    pub session_id: String,
}

/// LGPD consent flags recorded before the upload flow is allowed
#[derive(Serialize, Debug, Clone)]
pub struct ConsentRecord {
    pub data_processing: bool,
    pub communications: bool,
    pub accepted_at: String,
}
