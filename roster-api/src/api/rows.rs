//! Row-level delete endpoints (outside the batch synchronize path)

use crate::api::{require_edit, ApiError};
use crate::sync;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

/// DELETE /api/rows/:id — deleting a nonexistent row is a no-op
pub async fn delete_row(
    State(state): State<AppState>,
    Path(row_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_edit(&state, &headers)?;
    sync::delete_row(&state.db, &row_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/instruments/:id
pub async fn delete_instrument(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_edit(&state, &headers)?;
    sync::delete_instrument(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
