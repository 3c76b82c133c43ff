// src/consent.rs
//! LGPD consent recording
//!
//! The upload flow is gated on an accepted data-processing consent; the
//! communications flag is independent and optional.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::ConsentRecord;

pub struct ConsentStore {
    pool: SqlitePool,
}

impl ConsentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record (or replace) the consent flags with a fresh timestamp.
    pub async fn record(
        &self,
        data_processing: bool,
        communications: bool,
    ) -> Result<ConsentRecord, sqlx::Error> {
        let accepted_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO consent (id, data_processing, communications, accepted_at)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data_processing = excluded.data_processing,
                communications = excluded.communications,
                accepted_at = excluded.accepted_at
            "#,
        )
        .bind(data_processing)
        .bind(communications)
        .bind(&accepted_at)
        .execute(&self.pool)
        .await?;

        info!(
            data_processing = data_processing,
            communications = communications,
            "LGPD consent recorded"
        );

        Ok(ConsentRecord {
            data_processing,
            communications,
            accepted_at,
        })
    }

    /// The currently recorded consent, if any.
    pub async fn current(&self) -> Result<Option<ConsentRecord>, sqlx::Error> {
        let row: Option<(bool, bool, String)> = sqlx::query_as(
            "SELECT data_processing, communications, accepted_at FROM consent WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(data_processing, communications, accepted_at)| ConsentRecord {
            data_processing,
            communications,
            accepted_at,
        }))
    }

    /// Whether the upload flow is allowed to proceed.
    pub async fn has_accepted_data_processing(&self) -> Result<bool, sqlx::Error> {
        Ok(self
            .current()
            .await?
            .map(|c| c.data_processing)
            .unwrap_or(false))
    }
}
