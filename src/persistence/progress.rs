//! Progress snapshot persistence
//!
//! Stored as JSON `{"levelIndex": n, "champion": b, "savedAt": ms}`. Anything
//! that does not match that shape is discarded wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KeyValueStorage;

/// Storage key for the progress snapshot
pub const PROGRESS_KEY: &str = "note_siege_progress_v1";

/// Durable progression point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub level_index: u32,
    pub champion: bool,
    /// Wall-clock epoch milliseconds
    pub saved_at: i64,
}

impl ProgressSnapshot {
    pub fn new(level_index: usize, champion: bool, saved_at: i64) -> Self {
        Self {
            level_index: u32::try_from(level_index).unwrap_or(u32::MAX),
            champion,
            saved_at,
        }
    }
}

/// Validate a decoded JSON value field by field
pub fn sanitize(value: &Value) -> Option<ProgressSnapshot> {
    let obj = value.as_object()?;
    let level_index = obj.get("levelIndex")?.as_f64()?;
    let champion = obj.get("champion")?.as_bool()?;
    let saved_at = obj.get("savedAt")?.as_f64()?;
    if !level_index.is_finite() || level_index < 0.0 || !saved_at.is_finite() {
        return None;
    }
    Some(ProgressSnapshot {
        // `as` saturates, clamping into the table happens on resume
        level_index: level_index.floor() as u32,
        champion,
        saved_at: saved_at.floor() as i64,
    })
}

/// Coarse "how long ago" text for a saved timestamp
pub fn format_elapsed_since(saved_at: i64, now_ms: i64) -> String {
    let minutes = now_ms.saturating_sub(saved_at).max(0) / 60_000;
    let plural = |n: i64, unit: &str| format!("{n} {unit}{}", if n > 1 { "s" } else { "" });
    match minutes {
        0 => "less than a minute".to_string(),
        1..60 => plural(minutes, "minute"),
        _ if minutes < 60 * 24 => plural(minutes / 60, "hour"),
        _ => plural(minutes / (60 * 24), "day"),
    }
}

/// Progress persistence on top of a key/value backend.
///
/// Never fails outward: read errors become `None`, write errors are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressStore;

impl ProgressStore {
    pub fn load(&self, storage: &dyn KeyValueStorage) -> Option<ProgressSnapshot> {
        let raw = match storage.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Progress unavailable: {e}");
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding unreadable progress: {e}");
                return None;
            }
        };
        let snapshot = sanitize(&value);
        match snapshot {
            Some(s) => log::debug!(
                "Loaded progress: level {} champion {}",
                s.level_index,
                s.champion
            ),
            None => log::warn!("Discarding malformed progress snapshot"),
        }
        snapshot
    }

    pub fn save(&self, storage: &mut dyn KeyValueStorage, snapshot: &ProgressSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode progress: {e}");
                return;
            }
        };
        match storage.set(PROGRESS_KEY, &json) {
            Ok(()) => log::debug!("Progress saved (level {})", snapshot.level_index),
            Err(e) => log::warn!("Failed to save progress: {e}"),
        }
    }

    pub fn clear(&self, storage: &mut dyn KeyValueStorage) {
        if let Err(e) = storage.remove(PROGRESS_KEY) {
            log::warn!("Failed to clear progress: {e}");
        }
    }
}
