//! Database models

use serde::{Deserialize, Serialize};

/// One scheduled singing occasion for a calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// RFC 3339 UTC midnight instant for the day; unique per day
    pub date: String,
    pub notes: String,
}

/// One singer-and-selection entry within a session, ordered by slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRow {
    pub id: String,
    pub session_id: String,
    pub singer_id: String,
    /// Denormalized from singers.name at synchronization time
    pub singer_name: String,
    /// Denormalized free-text gender, normalized only during derivation
    pub singer_gender: Option<String>,
    /// Canonical catalog reference; independent of bhajan_title
    pub bhajan_id: Option<String>,
    /// Free text, preserved verbatim even when bhajan_id is null
    pub bhajan_title: Option<String>,
    pub confirmed_pitch: Option<String>,
    pub recommended_pitch: Option<String>,
    /// Derived from confirmed_pitch; empty whenever confirmed_pitch is empty
    pub tabla_pitch: Option<String>,
    /// 1-based display order within the session
    pub slot: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Singer {
    pub id: String,
    pub name: String,
    pub gender: Option<String>,
}

/// Canonical catalog entry with gender-specific reference pitches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub raga: Option<String>,
    pub lyrics: Option<String>,
    pub meaning: Option<String>,
    pub reference_gents_pitch: Option<String>,
    pub reference_ladies_pitch: Option<String>,
}

/// One row of the static pitch-to-tabla lookup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchLookupRow {
    pub label: String,
    pub tabla_pitch: Option<String>,
    pub sort_value: i64,
}

/// An instrument/person pairing attached to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInstrument {
    pub id: String,
    pub session_id: String,
    pub instrument: String,
    pub person: Option<String>,
}
