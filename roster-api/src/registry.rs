//! Session registry: day-bucketed session resolution
//!
//! One calendar day maps to at most one session. All date comparisons use
//! half-open UTC intervals from [`roster_common::date`], and the create
//! path treats a UNIQUE violation as "a concurrent caller won the race"
//! and re-queries instead of propagating the conflict.

use roster_common::date;
use roster_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Occupancy summary for one day of a month
#[derive(Debug, Clone, Serialize)]
pub struct DayOccupancy {
    pub session_id: String,
    pub row_count: i64,
}

/// Return the session id for a calendar day, creating the session if absent.
///
/// Safe under concurrent callers targeting the same day: exactly one
/// session exists afterward and every caller receives the same id.
pub async fn ensure_session(pool: &SqlitePool, date_str: &str) -> Result<String> {
    let day = date::parse_day(date_str)?;
    let (start, end) = date::day_bounds(day);

    if let Some(id) = find_in_bucket(pool, &start, &end).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    let inserted = sqlx::query("INSERT INTO sessions (id, date) VALUES (?, ?)")
        .bind(&id)
        .bind(date::stored_date(start))
        .execute(pool)
        .await;

    match inserted {
        Ok(_) => {
            info!("Created session {} for {}", id, date_str);
            Ok(id)
        }
        Err(e) => {
            let err = Error::from(e);
            if err.is_unique_violation() {
                // A concurrent caller created the session between our query
                // and insert; their row is authoritative.
                debug!("Session insert for {} lost creation race, re-querying", date_str);
                find_in_bucket(pool, &start, &end).await?.ok_or_else(|| {
                    Error::Internal(format!(
                        "Session for {} missing after unique conflict",
                        date_str
                    ))
                })
            } else {
                Err(err)
            }
        }
    }
}

/// Non-creating counterpart of [`ensure_session`]; never mutates state.
pub async fn lookup_session(pool: &SqlitePool, date_str: &str) -> Result<Option<String>> {
    let day = date::parse_day(date_str)?;
    let (start, end) = date::day_bounds(day);
    find_in_bucket(pool, &start, &end).await
}

/// Per-day session occupancy for one `YYYY-MM` month.
///
/// Days without a session are absent from the map, never zero-valued, so
/// callers can distinguish "no session" from "session with zero rows".
/// A malformed month yields an empty map rather than an error, keeping
/// calendar rendering resilient.
pub async fn month_occupancy(
    pool: &SqlitePool,
    month_str: &str,
) -> Result<BTreeMap<String, DayOccupancy>> {
    let first_day = match date::parse_month(month_str) {
        Ok(d) => d,
        Err(_) => {
            debug!("Ignoring malformed month {:?}", month_str);
            return Ok(BTreeMap::new());
        }
    };
    let (start, end) = date::month_bounds(first_day);

    let rows = sqlx::query(
        r#"
        SELECT s.id, s.date, COUNT(r.id) AS row_count
        FROM sessions s
        LEFT JOIN roster_rows r ON r.session_id = s.id
        WHERE s.date >= ? AND s.date < ?
        GROUP BY s.id
        ORDER BY s.date ASC
        "#,
    )
    .bind(date::stored_date(start))
    .bind(date::stored_date(end))
    .fetch_all(pool)
    .await?;

    let mut days = BTreeMap::new();
    for row in &rows {
        let stored: String = row.get("date");
        let key = date::day_key(date::parse_stored_date(&stored)?);
        days.insert(
            key,
            DayOccupancy {
                session_id: row.get("id"),
                row_count: row.get("row_count"),
            },
        );
    }
    Ok(days)
}

/// Overwrite a session's free-text notes. Unknown session ids are a no-op.
pub async fn update_notes(pool: &SqlitePool, session_id: &str, notes: &str) -> Result<()> {
    let result = sqlx::query("UPDATE sessions SET notes = ? WHERE id = ?")
        .bind(notes)
        .bind(session_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        debug!("Notes update for unknown session {} ignored", session_id);
    }
    Ok(())
}

/// True when a session row exists for the given id.
pub async fn session_exists(pool: &SqlitePool, session_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE id = ?")
        .bind(session_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

async fn find_in_bucket(
    pool: &SqlitePool,
    start: &chrono::DateTime<chrono::Utc>,
    end: &chrono::DateTime<chrono::Utc>,
) -> Result<Option<String>> {
    let id: Option<String> = sqlx::query_scalar(
        "SELECT id FROM sessions WHERE date >= ? AND date < ? ORDER BY date ASC LIMIT 1",
    )
    .bind(date::stored_date(*start))
    .bind(date::stored_date(*end))
    .fetch_optional(pool)
    .await?;
    Ok(id)
}
