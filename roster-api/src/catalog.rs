//! Catalog index: fuzzy title search over the bhajan catalog
//!
//! The title list is served from a process-wide snapshot rebuilt wholesale
//! from storage once it is older than the configured TTL. A rebuild race
//! between two callers is harmless: last writer wins and both observe a
//! consistent snapshot.

use roster_common::db::{CatalogEntry, PitchLookupRow};
use roster_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Score assigned when the first query token has no locatable position
const POSITION_SENTINEL: usize = 9999;

/// Clock abstraction so tests can drive cache expiry deterministically
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time, the production clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// One search result
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CatalogHit {
    pub id: String,
    pub title: String,
}

struct Snapshot {
    built_at: Instant,
    items: Arc<Vec<CatalogHit>>,
}

/// Process-wide fuzzy search index over catalog titles
pub struct CatalogIndex {
    pool: SqlitePool,
    ttl: Duration,
    limit: usize,
    clock: Arc<dyn Clock>,
    cache: RwLock<Option<Snapshot>>,
}

impl CatalogIndex {
    pub fn new(pool: SqlitePool, ttl: Duration, limit: usize) -> Self {
        Self::with_clock(pool, ttl, limit, Arc::new(SystemClock))
    }

    pub fn with_clock(
        pool: SqlitePool,
        ttl: Duration,
        limit: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            ttl,
            limit,
            clock,
            cache: RwLock::new(None),
        }
    }

    /// Ranked title search.
    ///
    /// Query and candidate titles are normalized identically; every query
    /// token must appear as a substring of the normalized title
    /// (conjunctive containment, no edit-distance fuzziness). An empty
    /// query returns an empty list without touching the cache.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogHit>> {
        let q = normalize(query);
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let tokens: Vec<&str> = q.split(' ').collect();

        let items = self.titles().await?;
        let mut scored: Vec<(usize, &CatalogHit)> = items
            .iter()
            .filter_map(|hit| {
                let t = normalize(&hit.title);
                for tok in &tokens {
                    if !t.contains(tok) {
                        return None;
                    }
                }
                let pos = tokens
                    .first()
                    .and_then(|tok| t.find(tok))
                    .unwrap_or(POSITION_SENTINEL);
                let score = pos + t.len().saturating_sub(q.len());
                Some((score, hit))
            })
            .collect();

        scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.title.cmp(&b.1.title)));
        Ok(scored
            .into_iter()
            .take(self.limit)
            .map(|(_, hit)| hit.clone())
            .collect())
    }

    /// Current title snapshot, rebuilding from storage when expired.
    async fn titles(&self) -> Result<Arc<Vec<CatalogHit>>> {
        let now = self.clock.now();

        if let Ok(guard) = self.cache.read() {
            if let Some(snapshot) = guard.as_ref() {
                if now.duration_since(snapshot.built_at) < self.ttl {
                    return Ok(Arc::clone(&snapshot.items));
                }
            }
        }

        let rows = sqlx::query("SELECT id, title FROM bhajans ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;
        let items: Arc<Vec<CatalogHit>> = Arc::new(
            rows.iter()
                .map(|row| CatalogHit {
                    id: row.get("id"),
                    title: row.get("title"),
                })
                .collect(),
        );
        debug!("Rebuilt catalog index cache: {} titles", items.len());

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(Snapshot {
                built_at: now,
                items: Arc::clone(&items),
            });
        }
        Ok(items)
    }
}

/// Shared normalization for queries and titles: lowercase, non-alphanumeric
/// collapsed to single spaces, trimmed.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Fetch a single catalog entry by id
pub async fn entry(pool: &SqlitePool, id: &str) -> Result<Option<CatalogEntry>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, raga, lyrics, meaning,
               reference_gents_pitch, reference_ladies_pitch
        FROM bhajans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
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

/// Ordered pitch labels plus label-to-tabla map from the static lookup table
#[derive(Debug, Clone, Default, Serialize)]
pub struct PitchSuggestions {
    pub pitches: Vec<String>,
    pub pitch_to_tabla: HashMap<String, String>,
}

/// Load the pitch/tabla lookup table. Blank labels are skipped; an unknown
/// tabla pitch is stored as an empty string rather than omitted.
pub async fn pitch_suggestions(pool: &SqlitePool) -> Result<PitchSuggestions> {
    let rows = sqlx::query("SELECT label, tabla_pitch, sort_value FROM pitch_lookup ORDER BY sort_value ASC, label ASC")
        .fetch_all(pool)
        .await?;

    let mut suggestions = PitchSuggestions::default();
    for row in &rows {
        let lookup = PitchLookupRow {
            label: row.get("label"),
            tabla_pitch: row.get("tabla_pitch"),
            sort_value: row.get("sort_value"),
        };
        let label = lookup.label.trim().to_string();
        if label.is_empty() {
            continue;
        }
        let tabla = lookup.tabla_pitch.as_deref().unwrap_or("").trim().to_string();
        suggestions.pitches.push(label.clone());
        suggestions.pitch_to_tabla.insert(label, tabla);
    }
    Ok(suggestions)
}
