// src/session.rs
//! Multi-user session manager
//!
//! Sessions are cached locally so the user can hold several authenticated
//! identities and switch between them. At most one session is active at a
//! time, and an expired session is purged before it can ever be treated
//! as valid. Each mutation is a single SQL statement against its own row
//! (or the one-row pointer table), so there is no read-modify-write
//! window between two concurrent invocations.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{ApiClient, AuthResponse};
use crate::models::UserSession;

/// Fixed session lifetime from creation
pub const SESSION_TTL_HOURS: i64 = 24;

/// Sessions expiring within this window are refreshed by the auto pass
pub const REFRESH_WINDOW_SECONDS: i64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(String),

    #[error("session {0} had expired and was removed")]
    Expired(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Outcome of an auto-refresh pass; failures are counted, never fatal
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// What happened to a single session during refresh
#[derive(Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    NotDue,
    Failed,
}

pub struct SessionManager {
    pool: SqlitePool,
}

impl SessionManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Build a new session from an authentication response.
    ///
    /// The id is cryptographically random and the expiry is a fixed TTL
    /// from now, independent of the token's own lifetime.
    pub fn create_user_session(auth: &AuthResponse, login_method: &str) -> UserSession {
        let now = Utc::now();
        UserSession {
            id: Uuid::new_v4().to_string(),
            email: auth.user.email.clone(),
            name: auth.user.name.clone(),
            picture: Some(auth.user.picture.clone()),
            token: auth.access_token.clone(),
            refresh_token: None,
            expires_at: (now + Duration::hours(SESSION_TTL_HOURS)).to_rfc3339(),
            last_used: now.to_rfc3339(),
            login_method: login_method.to_string(),
            is_active: false,
            branding: None,
        }
    }

    /// Insert or replace a cached session row.
    pub async fn add_user_session(&self, session: &UserSession) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO user_sessions
                (id, email, name, picture, token, refresh_token, expires_at,
                 last_used, login_method, is_active, branding)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.email)
        .bind(&session.name)
        .bind(&session.picture)
        .bind(&session.token)
        .bind(&session.refresh_token)
        .bind(&session.expires_at)
        .bind(&session.last_used)
        .bind(&session.login_method)
        .bind(session.is_active)
        .bind(&session.branding)
        .execute(&self.pool)
        .await?;

        debug!(session_id = %session.id, email = %session.email, "Session cached");
        Ok(())
    }

    /// Activate the given session, deactivating every other one.
    ///
    /// An expired target is deleted instead of activated.
    pub async fn switch_user_session(&self, id: &str) -> Result<UserSession, SessionError> {
        let session = self
            .fetch_session(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        if session.is_expired(Utc::now()) {
            warn!(session_id = %id, "Refusing to activate an expired session, deleting it");
            self.delete_session(id).await?;
            return Err(SessionError::Expired(id.to_string()));
        }

        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE user_sessions SET is_active = 0 WHERE id != ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("UPDATE user_sessions SET is_active = 1, last_used = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.set_current_pointer(Some(id)).await?;

        info!(session_id = %id, email = %session.email, "Switched active session");

        // Re-read so the caller sees the updated flags
        self.fetch_session(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Resolve the pointer to the current session, purging it when expired.
    pub async fn get_current_user_session(&self) -> Result<Option<UserSession>, SessionError> {
        let pointer: Option<(Option<String>,)> =
            sqlx::query_as("SELECT session_id FROM current_session WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        let session_id = match pointer {
            Some((Some(id),)) => id,
            _ => return Ok(None),
        };

        let session = match self.fetch_session(&session_id).await? {
            Some(s) => s,
            None => {
                // Stale pointer, clear it
                self.set_current_pointer(None).await?;
                return Ok(None);
            }
        };

        if session.is_expired(Utc::now()) {
            warn!(session_id = %session_id, "Current session expired, purging");
            self.delete_session(&session_id).await?;
            self.set_current_pointer(None).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// All cached sessions, most recently used first.
    pub async fn list_sessions(&self) -> Result<Vec<UserSession>, SessionError> {
        let sessions = sqlx::query_as::<_, UserSession>(
            "SELECT * FROM user_sessions ORDER BY last_used DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    /// Remove one session; clears the pointer when it pointed there.
    pub async fn remove_session(&self, id: &str) -> Result<bool, SessionError> {
        let removed = self.delete_session(id).await?;
        if removed {
            let pointer: Option<(Option<String>,)> =
                sqlx::query_as("SELECT session_id FROM current_session WHERE id = 1")
                    .fetch_optional(&self.pool)
                    .await?;
            if matches!(pointer, Some((Some(ref p),)) if p == id) {
                self.set_current_pointer(None).await?;
            }
            info!(session_id = %id, "Session removed");
        }
        Ok(removed)
    }

    /// Delete every expired session and return how many were removed.
    ///
    /// When the current session was among them, the pointer moves to an
    /// arbitrary remaining session (first row, no ordering guarantee).
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, SessionError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < ?")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        let removed = result.rows_affected();

        if removed > 0 {
            info!(removed = removed, "Expired sessions purged");
        }

        // Repair the pointer if its target was purged
        let pointer: Option<(Option<String>,)> =
            sqlx::query_as("SELECT session_id FROM current_session WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        if let Some((Some(current_id),)) = pointer {
            let still_there: Option<(String,)> =
                sqlx::query_as("SELECT id FROM user_sessions WHERE id = ?")
                    .bind(&current_id)
                    .fetch_optional(&self.pool)
                    .await?;

            if still_there.is_none() {
                let replacement: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM user_sessions LIMIT 1")
                        .fetch_optional(&self.pool)
                        .await?;

                match replacement {
                    Some((new_id,)) => {
                        sqlx::query("UPDATE user_sessions SET is_active = 1 WHERE id = ?")
                            .bind(&new_id)
                            .execute(&self.pool)
                            .await?;
                        self.set_current_pointer(Some(&new_id)).await?;
                        info!(session_id = %new_id, "Current session reassigned after cleanup");
                    }
                    None => {
                        self.set_current_pointer(None).await?;
                    }
                }
            }
        }

        Ok(removed)
    }

    /// Refresh one session's token when it is close to expiry.
    pub async fn refresh_session_token(
        &self,
        api: &ApiClient,
        id: &str,
    ) -> Result<RefreshOutcome, SessionError> {
        let session = self
            .fetch_session(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        let now = Utc::now();
        if session.is_expired(now) {
            self.delete_session(id).await?;
            return Err(SessionError::Expired(id.to_string()));
        }

        if session.seconds_until_expiry(now) > REFRESH_WINDOW_SECONDS {
            debug!(session_id = %id, "Session not due for refresh");
            return Ok(RefreshOutcome::NotDue);
        }

        match api.refresh(&session.token).await {
            Ok(auth) => {
                let expires_at = (now + Duration::hours(SESSION_TTL_HOURS)).to_rfc3339();
                sqlx::query(
                    "UPDATE user_sessions SET token = ?, expires_at = ?, last_used = ? WHERE id = ?",
                )
                .bind(&auth.access_token)
                .bind(&expires_at)
                .bind(now.to_rfc3339())
                .bind(id)
                .execute(&self.pool)
                .await?;

                info!(session_id = %id, "Session token refreshed");
                Ok(RefreshOutcome::Refreshed)
            }
            Err(e) => {
                // Best-effort: the session stays usable until it expires
                warn!(session_id = %id, error = %e, "Token refresh failed");
                Ok(RefreshOutcome::Failed)
            }
        }
    }

    /// Refresh every session whose expiry falls inside the refresh window.
    pub async fn auto_refresh_tokens(&self, api: &ApiClient) -> Result<RefreshSummary, SessionError> {
        let mut summary = RefreshSummary::default();
        let now = Utc::now();

        for session in self.list_sessions().await? {
            if session.is_expired(now) {
                summary.skipped += 1;
                continue;
            }
            if session.seconds_until_expiry(now) > REFRESH_WINDOW_SECONDS {
                summary.skipped += 1;
                continue;
            }
            match self.refresh_session_token(api, &session.id).await {
                Ok(RefreshOutcome::Refreshed) => summary.refreshed += 1,
                Ok(RefreshOutcome::Failed) => summary.failed += 1,
                Ok(RefreshOutcome::NotDue) => summary.skipped += 1,
                Err(SessionError::Expired(_)) | Err(SessionError::NotFound(_)) => {
                    summary.skipped += 1
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            refreshed = summary.refreshed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Auto-refresh pass completed"
        );

        Ok(summary)
    }

    async fn fetch_session(&self, id: &str) -> Result<Option<UserSession>, SessionError> {
        let session = sqlx::query_as::<_, UserSession>("SELECT * FROM user_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    async fn delete_session(&self, id: &str) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_current_pointer(&self, session_id: Option<&str>) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO current_session (id, session_id, last_activity)
            VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                session_id = excluded.session_id,
                last_activity = excluded.last_activity
            "#,
        )
        .bind(session_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
