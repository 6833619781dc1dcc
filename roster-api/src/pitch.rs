//! Pitch recommendation engine
//!
//! Pure derivations, no I/O. The synchronizer calls [`recommend`] only to
//! fill an empty recommended-pitch field; a non-empty human-entered value
//! is never overwritten. [`tabla_for`] is recomputed on every sync so a
//! cleared confirmed pitch always clears the tabla pitch too.

use roster_common::db::CatalogEntry;
use std::collections::HashMap;

/// Normalized singer gender used for reference-pitch selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Gents,
    Ladies,
    Unknown,
}

impl Gender {
    /// Normalize free-text gender via case-insensitive synonym matching.
    ///
    /// Ladies synonyms are checked first: "woman" contains "man" and
    /// "female" contains "male", so the order is load-bearing.
    pub fn normalize(raw: Option<&str>) -> Gender {
        let s = raw.unwrap_or("").trim().to_lowercase();
        if s.is_empty() {
            return Gender::Unknown;
        }
        if s.starts_with('f') || s.contains("female") || s.contains("lady") || s.contains("woman") {
            return Gender::Ladies;
        }
        if s.starts_with('m') || s.contains("male") || s.contains("gent") || s.contains("man") {
            return Gender::Gents;
        }
        Gender::Unknown
    }
}

/// Derive the recommended pitch for a singer/catalog pairing.
///
/// Ladies prefer the ladies reference pitch, falling back to gents; gents
/// the mirror image; unknown prefers gents then ladies. When the catalog
/// entry is absent or carries no reference pitch, the caller-supplied
/// fallback (typically the confirmed pitch) is used, trimmed. Returns an
/// empty string when nothing applies.
pub fn recommend(
    singer_gender: Option<&str>,
    entry: Option<&CatalogEntry>,
    fallback_confirmed_pitch: &str,
) -> String {
    let from_entry = entry.map(|e| pick_reference(Gender::normalize(singer_gender), e));
    match from_entry {
        Some(p) if !p.is_empty() => p,
        _ => fallback_confirmed_pitch.trim().to_string(),
    }
}

fn pick_reference(gender: Gender, entry: &CatalogEntry) -> String {
    let gents = entry.reference_gents_pitch.as_deref().unwrap_or("").trim();
    let ladies = entry.reference_ladies_pitch.as_deref().unwrap_or("").trim();

    let picked = match gender {
        Gender::Ladies => {
            if !ladies.is_empty() {
                ladies
            } else {
                gents
            }
        }
        // Unknown singers get the gents reference first, like the catalog's
        // default voicing
        Gender::Gents | Gender::Unknown => {
            if !gents.is_empty() {
                gents
            } else {
                ladies
            }
        }
    };
    picked.to_string()
}

/// Look up the tabla tuning for a confirmed pitch.
///
/// An empty confirmed pitch always yields an empty tuning, regardless of
/// any stale prior value; an unmapped pitch yields an empty tuning too.
pub fn tabla_for(confirmed_pitch: &str, pitch_to_tabla: &HashMap<String, String>) -> String {
    let pitch = confirmed_pitch.trim();
    if pitch.is_empty() {
        return String::new();
    }
    pitch_to_tabla
        .get(pitch)
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}
