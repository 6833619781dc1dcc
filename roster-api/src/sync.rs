//! Roster synchronizer: applies a client-submitted row set transactionally
//!
//! The UI issues both optimistic single-row mutations (add/edit/delete) and
//! periodic full-array saves; both paths must compose without corrupting
//! display order or crashing on stale ids. A whole submitted array is
//! applied inside one transaction; an update targeting a row deleted by a
//! concurrent caller is skipped silently and the rest of the batch commits.

use crate::{catalog, pitch};
use roster_common::db::{CatalogEntry, RosterRow};
use roster_common::{Error, Result};
use serde::Deserialize;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// Client-generated row ids carry this prefix until first persisted
pub const PLACEHOLDER_PREFIX: &str = "new_";

/// One submitted roster row, as sent by the grid
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterRowInput {
    /// Persisted id, or a `new_`-prefixed placeholder, or absent
    #[serde(default)]
    pub id: Option<String>,
    pub singer_id: String,
    #[serde(default)]
    pub bhajan_id: Option<String>,
    #[serde(default)]
    pub bhajan_title: Option<String>,
    #[serde(default)]
    pub confirmed_pitch: Option<String>,
    #[serde(default)]
    pub recommended_pitch: Option<String>,
}

impl RosterRowInput {
    /// True when this row has never been persisted (create vs. update)
    fn is_placeholder(&self) -> bool {
        match self.id.as_deref() {
            None => true,
            Some(id) => id.trim().is_empty() || id.starts_with(PLACEHOLDER_PREFIX),
        }
    }
}

/// Apply a submitted row set to a session as a single atomic transaction.
///
/// Rows are processed in array order and assigned `slot = index + 1`.
/// Placeholder ids insert; persisted ids update; an update whose target no
/// longer exists is skipped without aborting the batch. The recommended
/// pitch is derived only to fill an empty field (a human-entered value is
/// stored verbatim), while the tabla pitch is recomputed from the confirmed
/// pitch on every call.
pub async fn synchronize(
    pool: &SqlitePool,
    session_id: &str,
    rows: &[RosterRowInput],
) -> Result<()> {
    if session_id.trim().is_empty() {
        return Err(Error::InvalidInput("Empty session id".to_string()));
    }
    if !crate::registry::session_exists(pool, session_id).await? {
        return Err(Error::NotFound(format!("Session {}", session_id)));
    }

    let suggestions = catalog::pitch_suggestions(pool).await?;

    let mut tx = pool.begin().await?;
    let mut skipped = 0usize;

    for (index, input) in rows.iter().enumerate() {
        let slot = (index + 1) as i64;

        let singer = fetch_singer(&mut tx, &input.singer_id).await?;
        let (singer_name, singer_gender) = match singer {
            Some((name, gender)) => (name, gender),
            None => (String::new(), None),
        };

        let entry = match input.bhajan_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => fetch_entry(&mut tx, id).await?,
            _ => None,
        };

        let confirmed = input.confirmed_pitch.as_deref().unwrap_or("");

        // Fill-only: derive a recommendation just for empty fields, never
        // overwrite what a human already chose.
        let recommended = match input.recommended_pitch.as_deref().map(str::trim) {
            Some(existing) if !existing.is_empty() => existing.to_string(),
            _ => pitch::recommend(singer_gender.as_deref(), entry.as_ref(), confirmed),
        };

        // Always recomputed, so a cleared confirmed pitch clears this too
        let tabla = pitch::tabla_for(confirmed, &suggestions.pitch_to_tabla);

        if input.is_placeholder() {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO roster_rows (
                    id, session_id, singer_id, singer_name, singer_gender,
                    bhajan_id, bhajan_title, confirmed_pitch,
                    recommended_pitch, tabla_pitch, slot
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(session_id)
            .bind(&input.singer_id)
            .bind(&singer_name)
            .bind(&singer_gender)
            .bind(&input.bhajan_id)
            .bind(&input.bhajan_title)
            .bind(&input.confirmed_pitch)
            .bind(non_empty(&recommended))
            .bind(non_empty(&tabla))
            .bind(slot)
            .execute(&mut *tx)
            .await?;
        } else {
            // input.id is present here by is_placeholder()
            let id = input.id.as_deref().unwrap_or_default();
            let result = sqlx::query(
                r#"
                UPDATE roster_rows SET
                    singer_id = ?, singer_name = ?, singer_gender = ?,
                    bhajan_id = ?, bhajan_title = ?, confirmed_pitch = ?,
                    recommended_pitch = ?, tabla_pitch = ?, slot = ?
                WHERE id = ? AND session_id = ?
                "#,
            )
            .bind(&input.singer_id)
            .bind(&singer_name)
            .bind(&singer_gender)
            .bind(&input.bhajan_id)
            .bind(&input.bhajan_title)
            .bind(&input.confirmed_pitch)
            .bind(non_empty(&recommended))
            .bind(non_empty(&tabla))
            .bind(slot)
            .bind(id)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

            // Deleted by a concurrent caller: skip, keep the batch alive
            if result.rows_affected() == 0 {
                debug!("Skipping stale roster row {} in session {}", id, session_id);
                skipped += 1;
            }
        }
    }

    tx.commit().await?;
    info!(
        "Synchronized {} roster rows for session {} ({} stale skipped)",
        rows.len(),
        session_id,
        skipped
    );
    Ok(())
}

/// Delete a single roster row. A nonexistent id is a no-op, not an error.
pub async fn delete_row(pool: &SqlitePool, row_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM roster_rows WHERE id = ?")
        .bind(row_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        debug!("Delete of unknown roster row {} ignored", row_id);
    }
    Ok(())
}

/// Read a session's rows in display order.
pub async fn session_rows(pool: &SqlitePool, session_id: &str) -> Result<Vec<RosterRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, session_id, singer_id, singer_name, singer_gender,
               bhajan_id, bhajan_title, confirmed_pitch,
               recommended_pitch, tabla_pitch, slot
        FROM roster_rows
        WHERE session_id = ?
        ORDER BY slot ASC, id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| RosterRow {
            id: row.get("id"),
            session_id: row.get("session_id"),
            singer_id: row.get("singer_id"),
            singer_name: row.get("singer_name"),
            singer_gender: row.get("singer_gender"),
            bhajan_id: row.get("bhajan_id"),
            bhajan_title: row.get("bhajan_title"),
            confirmed_pitch: row.get("confirmed_pitch"),
            recommended_pitch: row.get("recommended_pitch"),
            tabla_pitch: row.get("tabla_pitch"),
            slot: row.get("slot"),
        })
        .collect())
}

/// Attach an instrument/person pairing to a session.
///
/// A blank instrument name is a no-op; a blank person is stored as NULL.
pub async fn add_instrument(
    pool: &SqlitePool,
    session_id: &str,
    instrument: &str,
    person: &str,
) -> Result<()> {
    let instrument = instrument.trim();
    if instrument.is_empty() {
        return Ok(());
    }
    let person = person.trim();

    sqlx::query(
        "INSERT INTO session_instruments (id, session_id, instrument, person) VALUES (?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(session_id)
    .bind(instrument)
    .bind(if person.is_empty() { None } else { Some(person) })
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete an instrument row; missing ids are a no-op.
pub async fn delete_instrument(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM session_instruments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List a session's instrument rows.
pub async fn session_instruments(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<roster_common::db::SessionInstrument>> {
    let rows = sqlx::query(
        "SELECT id, session_id, instrument, person FROM session_instruments WHERE session_id = ? ORDER BY instrument ASC, id ASC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| roster_common::db::SessionInstrument {
            id: row.get("id"),
            session_id: row.get("session_id"),
            instrument: row.get("instrument"),
            person: row.get("person"),
        })
        .collect())
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

async fn fetch_singer(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    singer_id: &str,
) -> Result<Option<(String, Option<String>)>> {
    let row = sqlx::query("SELECT name, gender FROM singers WHERE id = ?")
        .bind(singer_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.map(|r| (r.get("name"), r.get("gender"))))
}

async fn fetch_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    bhajan_id: &str,
) -> Result<Option<CatalogEntry>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, raga, lyrics, meaning,
               reference_gents_pitch, reference_ladies_pitch
        FROM bhajans
        WHERE id = ?
        "#,
    )
    .bind(bhajan_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|row| CatalogEntry {
        id: row.get("id"),
        title: row.get("title"),
        raga: row.get("raga"),
        lyrics: row.get("lyrics"),
        meaning: row.get("meaning"),
        reference_gents_pitch: row.get("reference_gents_pitch"),
        reference_ladies_pitch: row.get("reference_ladies_pitch"),
    }))
}
