// src/branding.rs
//! White-label branding configuration store
//!
//! Key-value settings persisted locally, independent of authentication.
//! Reads merge stored keys over the compiled-in defaults; a storage
//! failure degrades to the defaults with a logged warning.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

/// Keys the branding store accepts
pub const BRANDING_KEYS: &[&str] = &[
    "company_name",
    "product_name",
    "logo_url",
    "primary_color",
    "contact_email",
    "contact_phone",
    "privacy_policy_url",
];

#[derive(Debug, thiserror::Error)]
pub enum BrandingError {
    #[error("unknown branding key: {0}")]
    UnknownKey(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Resolved white-label configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandingConfig {
    pub company_name: String,
    pub product_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub privacy_policy_url: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            company_name: "Yagnostic".to_string(),
            product_name: "Yagnostic Diagnósticos".to_string(),
            logo_url: "https://yagnostic.local/logo.svg".to_string(),
            primary_color: "#1E6FD9".to_string(),
            contact_email: "contato@yagnostic.local".to_string(),
            contact_phone: "+55 11 0000-0000".to_string(),
            privacy_policy_url: "https://yagnostic.local/privacidade".to_string(),
        }
    }
}

impl BrandingConfig {
    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "company_name" => self.company_name = value.to_string(),
            "product_name" => self.product_name = value.to_string(),
            "logo_url" => self.logo_url = value.to_string(),
            "primary_color" => self.primary_color = value.to_string(),
            "contact_email" => self.contact_email = value.to_string(),
            "contact_phone" => self.contact_phone = value.to_string(),
            "privacy_policy_url" => self.privacy_policy_url = value.to_string(),
            _ => {}
        }
    }
}

pub struct BrandingStore {
    pool: SqlitePool,
}

impl BrandingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the effective configuration: stored overrides on top of
    /// the defaults. Never fails; a broken store yields the defaults.
    pub async fn get_config(&self) -> BrandingConfig {
        let mut config = BrandingConfig::default();

        let rows: Result<Vec<(String, String)>, sqlx::Error> =
            sqlx::query_as("SELECT key, value FROM branding_config")
                .fetch_all(&self.pool)
                .await;

        match rows {
            Ok(rows) => {
                for (key, value) in rows {
                    config.apply(&key, &value);
                }
            }
            Err(e) => {
                warn!(error = %e, "Branding store unavailable, using default config");
            }
        }

        config
    }

    /// Read a single stored override, if any.
    pub async fn get(&self, key: &str) -> Result<Option<String>, BrandingError> {
        if !BRANDING_KEYS.contains(&key) {
            return Err(BrandingError::UnknownKey(key.to_string()));
        }

        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM branding_config WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Store one override.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), BrandingError> {
        if !BRANDING_KEYS.contains(&key) {
            return Err(BrandingError::UnknownKey(key.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO branding_config (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove every stored override, restoring the defaults.
    pub async fn reset(&self) -> Result<u64, BrandingError> {
        let result = sqlx::query("DELETE FROM branding_config")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_memory_store;

    async fn store() -> BrandingStore {
        let pool = open_memory_store().await.expect("memory store opens");
        BrandingStore::new(pool)
    }

    #[tokio::test]
    async fn test_empty_store_yields_defaults() {
        let store = store().await;
        let config = store.get_config().await;
        assert_eq!(config, BrandingConfig::default());
    }

    #[tokio::test]
    async fn test_stored_overrides_merge_over_defaults() {
        let store = store().await;

        store.set("company_name", "Clínica Horizonte").await.unwrap();
        store.set("primary_color", "#AA3366").await.unwrap();

        let config = store.get_config().await;
        assert_eq!(config.company_name, "Clínica Horizonte");
        assert_eq!(config.primary_color, "#AA3366");
        // untouched keys keep their defaults
        assert_eq!(config.contact_email, BrandingConfig::default().contact_email);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let store = store().await;

        store.set("company_name", "First").await.unwrap();
        store.set("company_name", "Second").await.unwrap();

        assert_eq!(
            store.get("company_name").await.unwrap(),
            Some("Second".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected() {
        let store = store().await;

        let result = store.set("favorite_color", "green").await;
        assert!(matches!(result, Err(BrandingError::UnknownKey(_))));

        let result = store.get("favorite_color").await;
        assert!(matches!(result, Err(BrandingError::UnknownKey(_))));
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let store = store().await;

        store.set("company_name", "Clínica Horizonte").await.unwrap();
        let removed = store.reset().await.unwrap();
        assert_eq!(removed, 1);

        assert_eq!(store.get_config().await, BrandingConfig::default());
    }
}
