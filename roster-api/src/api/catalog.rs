//! Catalog search and lookup endpoints

use crate::api::ApiError;
use crate::catalog::{self, CatalogHit, PitchSuggestions};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use roster_common::db::CatalogEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    items: Vec<CatalogHit>,
}

#[derive(Debug, Deserialize)]
pub struct EntryParams {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    bhajan: Option<CatalogEntry>,
}

/// GET /api/catalog/search?q= — empty query yields an empty list
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let items = state.catalog.search(&params.q).await?;
    Ok(Json(SearchResponse { items }))
}

/// GET /api/catalog/entry?id=
pub async fn get_catalog_entry(
    State(state): State<AppState>,
    Query(params): Query<EntryParams>,
) -> Result<Json<EntryResponse>, ApiError> {
    let id = params.id.trim();
    if id.is_empty() {
        return Err(ApiError::BadRequest("Missing catalog entry id".to_string()));
    }
    let bhajan = catalog::entry(&state.db, id).await?;
    Ok(Json(EntryResponse { bhajan }))
}

/// GET /api/catalog/pitches — static pitch labels and tabla map
pub async fn get_pitch_suggestions(
    State(state): State<AppState>,
) -> Result<Json<PitchSuggestions>, ApiError> {
    let suggestions = catalog::pitch_suggestions(&state.db).await?;
    Ok(Json(suggestions))
}
