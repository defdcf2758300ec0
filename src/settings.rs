//! Game settings and preferences
//!
//! Persisted separately from progress in the key/value store.

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_MS;
use crate::notes::Clef;
use crate::persistence::KeyValueStorage;
use crate::sim::progression::BandConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Notation clef for the prompt staff
    pub clef: Clef,
    /// Difficulty band split and ramp gains
    pub bands: BandConfig,

    // === Timing ===
    /// Wall-clock cadence of progress autosaves while running
    pub autosave_interval_ms: u32,
    /// Input lockout after a wrong answer or timeout
    pub lockout_ms: u32,

    // === Visual Effects ===
    /// Screen shake on hits
    pub screen_shake: bool,
    /// Particle effects
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clef: Clef::Treble,
            bands: BandConfig::default(),

            autosave_interval_ms: 9_000,
            lockout_ms: 1_200,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "note_siege_settings";

    /// Apply start-up query parameters (`?clef=bass`).
    ///
    /// A missing `clef` keeps the stored choice; an unrecognized one resets
    /// it to the default clef.
    pub fn with_query(mut self, query: &str) -> Self {
        if let Some(value) = query_param(query, "clef") {
            self.clef = Clef::parse(value).unwrap_or_else(|| {
                log::warn!("Unknown clef {value:?} in query, using the default");
                Clef::default()
            });
        }
        self
    }

    /// Lockout length in simulation ticks
    pub fn lockout_ticks(&self) -> u64 {
        (self.lockout_ms as f64 / FRAME_MS).round() as u64
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective output gain
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(storage: &dyn KeyValueStorage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save settings (failures are logged, never propagated)
    pub fn save(&self, storage: &mut dyn KeyValueStorage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e}"),
            },
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }
}

/// First value for `key` in a `?a=b&c=d` query string
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
}
