//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (save timestamps)
//! - Keyboard input mapping

use crate::notes;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Milliseconds since the Unix epoch (0 if the clock is before 1970)
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Note index for a keyboard key name (`KeyboardEvent.key` style).
///
/// Only single printable characters map; modifiers and named keys do not.
pub fn note_for_key(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    notes::index_for_key(c)
}
