//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Deferred work goes through the tick-keyed scheduler, never wall time
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod enemy;
pub mod entities;
pub mod events;
pub mod progression;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, EnemyHit, interception_radius, resolve};
pub use enemy::{Enemy, EnemyEvent, EnemyPhase, EnemyVariant};
pub use entities::{
    EnemyShot, EntityEvent, EntityList, FloatText, Particle, ParticleKind, PlayerShot, Transient,
};
pub use events::{GameEvent, SaveReason};
pub use progression::{
    BandConfig, Difficulty, LevelConfig, LevelTable, clamp_level_index, compute_ramp_ratio,
};
pub use schedule::{ScheduledEvent, Scheduler};
pub use state::{Advance, GamePhase, GameState};
pub use tick::{AnswerOutcome, TickInput, start_game, submit_answer, tick};
