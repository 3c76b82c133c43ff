// src/history.rs
//! Local upload history
//!
//! Every upload attempt lands here regardless of outcome, so the history
//! view works even when the API was unreachable and the diagnostic was
//! simulated locally.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::UploadRecord;

pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one upload record and return it with its generated id.
    pub async fn record(
        &self,
        filename: &str,
        size: i64,
        status: &str,
        diagnostic: Option<&str>,
        session_id: &str,
    ) -> Result<UploadRecord, sqlx::Error> {
        let record = UploadRecord {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            size,
            status: status.to_string(),
            diagnostic: diagnostic.map(str::to_string),
            submitted_at: Utc::now().to_rfc3339(),
            session_id: session_id.to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO upload_history
                (id, filename, size, status, diagnostic, submitted_at, session_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(record.size)
        .bind(&record.status)
        .bind(&record.diagnostic)
        .bind(&record.submitted_at)
        .bind(&record.session_id)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Page through the history, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UploadRecord>, sqlx::Error> {
        sqlx::query_as::<_, UploadRecord>(
            "SELECT * FROM upload_history ORDER BY submitted_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Total number of recorded uploads.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM upload_history")
            .fetch_one(&self.pool)
            .await
    }
}
