//! Session and roster row endpoints

use crate::api::{require_edit, ApiError};
use crate::registry::{self, DayOccupancy};
use crate::sync::{self, RosterRowInput};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use roster_common::db::{RosterRow, SessionInstrument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct EnsureSessionRequest {
    date: String,
}

#[derive(Debug, Serialize)]
pub struct SessionIdResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    date: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    #[serde(default)]
    month: String,
}

#[derive(Debug, Serialize)]
pub struct MonthResponse {
    days: BTreeMap<String, DayOccupancy>,
}

#[derive(Debug, Serialize)]
pub struct RowsResponse {
    rows: Vec<RosterRow>,
}

#[derive(Debug, Deserialize)]
pub struct SynchronizeRequest {
    rows: Vec<RosterRowInput>,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
pub struct InstrumentRequest {
    instrument: String,
    #[serde(default)]
    person: String,
}

#[derive(Debug, Serialize)]
pub struct InstrumentsResponse {
    instruments: Vec<SessionInstrument>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

fn ok() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// POST /api/sessions/ensure
pub async fn ensure_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<EnsureSessionRequest>,
) -> Result<Json<SessionIdResponse>, ApiError> {
    require_edit(&state, &headers)?;
    let session_id = registry::ensure_session(&state.db, &req.date).await?;
    Ok(Json(SessionIdResponse { session_id }))
}

/// GET /api/sessions/lookup?date=YYYY-MM-DD
pub async fn lookup_session(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, ApiError> {
    let session_id = registry::lookup_session(&state.db, &params.date).await?;
    Ok(Json(LookupResponse { session_id }))
}

/// GET /api/sessions/month?month=YYYY-MM
///
/// Lenient by contract: a malformed month yields an empty day map.
pub async fn month_occupancy(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<MonthResponse>, ApiError> {
    let days = registry::month_occupancy(&state.db, &params.month).await?;
    Ok(Json(MonthResponse { days }))
}

/// GET /api/sessions/:id/rows
pub async fn get_rows(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<RowsResponse>, ApiError> {
    let rows = sync::session_rows(&state.db, &session_id).await?;
    Ok(Json(RowsResponse { rows }))
}

/// POST /api/sessions/:id/rows — full-array synchronize
pub async fn synchronize_rows(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SynchronizeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    require_edit(&state, &headers)?;
    sync::synchronize(&state.db, &session_id, &req.rows).await?;
    Ok(ok())
}

/// POST /api/sessions/:id/notes
pub async fn update_notes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<NotesRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    require_edit(&state, &headers)?;
    registry::update_notes(&state.db, &session_id, &req.notes).await?;
    Ok(ok())
}

/// GET /api/sessions/:id/instruments
pub async fn get_instruments(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InstrumentsResponse>, ApiError> {
    let instruments = sync::session_instruments(&state.db, &session_id).await?;
    Ok(Json(InstrumentsResponse { instruments }))
}

/// POST /api/sessions/:id/instruments
pub async fn add_instrument(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<InstrumentRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    require_edit(&state, &headers)?;
    sync::add_instrument(&state.db, &session_id, &req.instrument, &req.person).await?;
    Ok(ok())
}
