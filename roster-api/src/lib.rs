//! roster-api library - bhajan roster service core
//!
//! Four components behind a small HTTP surface:
//! - session registry (day-bucketed session resolution)
//! - roster synchronizer (transactional row-set application)
//! - pitch recommendation engine (pure derivation)
//! - catalog index (TTL-cached fuzzy title search)

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod catalog;
pub mod pitch;
pub mod registry;
pub mod sync;

use catalog::CatalogIndex;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Process-wide catalog search index
    pub catalog: Arc<CatalogIndex>,
    /// Shared secret gating mutation endpoints; empty disables the gate
    pub edit_secret: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, catalog: Arc<CatalogIndex>, edit_secret: String) -> Self {
        Self {
            db,
            catalog,
            edit_secret,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .route("/health", get(api::health))
        .route("/api/sessions/ensure", post(api::ensure_session))
        .route("/api/sessions/lookup", get(api::lookup_session))
        .route("/api/sessions/month", get(api::month_occupancy))
        .route(
            "/api/sessions/:id/rows",
            get(api::get_rows).post(api::synchronize_rows),
        )
        .route("/api/sessions/:id/notes", post(api::update_notes))
        .route(
            "/api/sessions/:id/instruments",
            get(api::get_instruments).post(api::add_instrument),
        )
        .route("/api/rows/:id", delete(api::delete_row))
        .route("/api/instruments/:id", delete(api::delete_instrument))
        .route("/api/catalog/search", get(api::search_catalog))
        .route("/api/catalog/entry", get(api::get_catalog_entry))
        .route("/api/catalog/pitches", get(api::get_pitch_suggestions))
        .with_state(state)
}
