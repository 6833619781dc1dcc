//! Database initialization
//!
//! Creates the database file and schema on first run; reopening an
//! existing database is a no-op (every statement is `IF NOT EXISTS`).

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connection options are applied per pooled connection:
    // - foreign keys ON (roster row / instrument cascades)
    // - WAL so readers proceed while a synchronize transaction writes
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Schema creation (idempotent, safe to call on every startup)
    create_sessions_table(&pool).await?;
    create_singers_table(&pool).await?;
    create_bhajans_table(&pool).await?;
    create_pitch_lookup_table(&pool).await?;
    create_roster_rows_table(&pool).await?;
    create_session_instruments_table(&pool).await?;

    Ok(pool)
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL UNIQUE,
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_singers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS singers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_bhajans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bhajans (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            raga TEXT,
            lyrics TEXT,
            meaning TEXT,
            reference_gents_pitch TEXT,
            reference_ladies_pitch TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_pitch_lookup_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pitch_lookup (
            label TEXT PRIMARY KEY,
            tabla_pitch TEXT,
            sort_value INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_roster_rows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roster_rows (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            singer_id TEXT NOT NULL,
            singer_name TEXT NOT NULL DEFAULT '',
            singer_gender TEXT,
            bhajan_id TEXT,
            bhajan_title TEXT,
            confirmed_pitch TEXT,
            recommended_pitch TEXT,
            tabla_pitch TEXT,
            slot INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_roster_rows_session ON roster_rows(session_id, slot)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_session_instruments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_instruments (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            instrument TEXT NOT NULL,
            person TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
