//! Shared test helpers: scratch database setup and seeding

#![allow(dead_code)]

use roster_common::db::init_database;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Create a scratch database; keep the TempDir alive for the test duration.
pub async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("roster.db")).await.unwrap();
    (dir, pool)
}

pub async fn seed_singer(pool: &SqlitePool, id: &str, name: &str, gender: Option<&str>) {
    sqlx::query("INSERT INTO singers (id, name, gender) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(gender)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_bhajan(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    gents: Option<&str>,
    ladies: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO bhajans (id, title, reference_gents_pitch, reference_ladies_pitch) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(title)
    .bind(gents)
    .bind(ladies)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_pitch(pool: &SqlitePool, label: &str, tabla: Option<&str>, sort_value: i64) {
    sqlx::query("INSERT INTO pitch_lookup (label, tabla_pitch, sort_value) VALUES (?, ?, ?)")
        .bind(label)
        .bind(tabla)
        .bind(sort_value)
        .execute(pool)
        .await
        .unwrap();
}
