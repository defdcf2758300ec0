//! Note Siege - a music-note reading arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemy, shots, collisions, progression)
//! - `notes`: Static note table and clef handling
//! - `persistence`: Progress snapshot storage with sanitization
//! - `session`: Frame loop host that wires the simulation to its collaborators
//! - `render` / `audio`: Narrow collaborator interfaces

pub mod audio;
pub mod highscores;
pub mod notes;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use notes::{Clef, NOTES, Note};
pub use session::{HudSnapshot, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one animation frame)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host frame delta accepted before clamping
    pub const MAX_FRAME_DT_MS: f64 = 100.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 340.0;

    /// Defender anchor (the point the enemy advances toward)
    pub const DEFENDER_X: f32 = 130.0;
    pub const DEFENDER_Y: f32 = FIELD_HEIGHT * 0.60;
    /// Enemy x below which it has broken through
    pub const CONTACT_X: f32 = 180.0;

    /// Player shots leave from just in front of the defender
    pub const PLAYER_SHOT_ORIGIN_X: f32 = 145.0;
    pub const PLAYER_SHOT_SPEED: f32 = 18.0;
    pub const PLAYER_SHOT_TRAIL: usize = 24;

    /// Enemy shots aim at the defender lane
    pub const ENEMY_SHOT_BASE_SPEED: f32 = 7.0;
    pub const ENEMY_SHOT_TRAIL: usize = 18;
    pub const ENEMY_SHOT_LANE_Y: f32 = DEFENDER_Y - 25.0;
    pub const DEFENDER_HIT_RADIUS: f32 = 38.0;

    /// Collision radii
    pub const ENEMY_HIT_RADIUS: f32 = 72.0;
    pub const INTERCEPT_RADIUS: f32 = 35.0;
    pub const INTERCEPT_RADIUS_MAX: f32 = 48.0;

    /// Scoring
    pub const INTERCEPT_BONUS: u64 = 5;
    pub const ANSWER_POINTS: u64 = 10;
    pub const STREAK_PER_COMBO: u32 = 5;

    /// Lives
    pub const MAX_LIVES: u8 = 5;

    /// Answer timer (abstract units, drained by TIMER_DRAIN per tick)
    pub const TIMER_MAX: f32 = 700.0;
    pub const TIMER_MIN: f32 = 300.0;
    pub const TIMER_STEP_PER_STAGE: f32 = 80.0;
    pub const TIMER_DRAIN: f32 = 0.8;
    pub const TIMER_REFUND: f32 = 100.0;

    /// Enemy timings (ticks)
    pub const ENEMY_GRACE_TICKS: u32 = 60;
    pub const ENEMY_DEATH_TICKS: u32 = 55;
    pub const VOLLEY_STAGGER_TICKS: u64 = 12;
    pub const FIRST_SPAWN_DELAY: f32 = 60.0;

    /// Particle cap
    pub const MAX_PARTICLES: usize = 512;
}

/// Squared distance check used by every radius test in the simulation
#[inline]
pub fn within_radius(a: glam::Vec2, b: glam::Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}
