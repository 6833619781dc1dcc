//! HTTP API handlers for the roster service
//!
//! Authorization is deliberately thin: mutation handlers resolve a
//! `can_edit` boolean from the `x-edit-secret` header and check it before
//! invoking the core; the core functions carry no capability logic.

pub mod catalog;
pub mod error;
pub mod health;
pub mod rows;
pub mod sessions;

pub use catalog::{get_catalog_entry, get_pitch_suggestions, search_catalog};
pub use error::ApiError;
pub use health::health;
pub use rows::{delete_instrument, delete_row};
pub use sessions::{
    add_instrument, ensure_session, get_instruments, get_rows, lookup_session, month_occupancy,
    synchronize_rows, update_notes,
};

use crate::AppState;
use axum::http::HeaderMap;

/// Header carrying the shared edit secret
pub const EDIT_SECRET_HEADER: &str = "x-edit-secret";

/// Resolve the edit capability for a request.
///
/// An empty configured secret disables the gate (development mode).
pub fn can_edit(state: &AppState, headers: &HeaderMap) -> bool {
    if state.edit_secret.is_empty() {
        return true;
    }
    headers
        .get(EDIT_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == state.edit_secret)
        .unwrap_or(false)
}

/// Reject a mutation attempt lacking the edit capability.
pub fn require_edit(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if can_edit(state, headers) {
        Ok(())
    } else {
        Err(ApiError::ReadOnly("Edit capability required".to_string()))
    }
}
