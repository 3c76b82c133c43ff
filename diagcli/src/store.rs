// src/store.rs
//! Local SQLite store
//!
//! The desktop counterpart of the web client's IndexedDB tables. Sessions
//! are per-row entities and the current selection lives in a separate
//! single-row pointer record, so every mutation is one atomic statement.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Resolve the data directory: --data-dir flag, DIAGCLI_DATA_DIR, or
/// ~/.diagcli as the default.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var("DIAGCLI_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = home::home_dir().ok_or_else(|| anyhow::anyhow!("could not resolve home directory"))?;
    Ok(home.join(".diagcli"))
}

/// Open (creating if needed) the store under the given data directory.
pub async fn open_store(data_dir: &PathBuf) -> anyhow::Result<SqlitePool> {
    tokio::fs::create_dir_all(data_dir).await?;

    let db_path = data_dir.join("diagcli.db");
    let url = format!("sqlite://{}", db_path.display());
    let connect_options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    run_migrations(&pool).await?;

    info!(db_path = %db_path.display(), "Local store opened");

    Ok(pool)
}

/// In-memory store for tests; one connection so every handle sees the
/// same database.
pub async fn open_memory_store() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Create all tables if they don't exist
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_sessions (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            picture TEXT,
            token TEXT NOT NULL,
            refresh_token TEXT,
            expires_at TEXT NOT NULL,
            last_used TEXT NOT NULL,
            login_method TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            branding TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Single-row pointer to the currently selected session
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS current_session (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            session_id TEXT,
            last_activity TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS branding_config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS consent (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            data_processing INTEGER NOT NULL,
            communications INTEGER NOT NULL,
            accepted_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS upload_history (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            size INTEGER NOT NULL,
            status TEXT NOT NULL,
            diagnostic TEXT,
            submitted_at TEXT NOT NULL,
            session_id TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_upload_history_submitted_at
         ON upload_history(submitted_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
