//! Discrete events emitted by the simulation
//!
//! The tick pushes these onto `GameState::events`; the host drains them to
//! drive audio, HUD feedback and persistence.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyVariant;

/// Why a progress save was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveReason {
    Periodic,
    LevelAdvance,
    GameOver,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted { level_index: usize },
    NextNote { note: usize },
    CorrectAnswer { note: usize, points: u64 },
    WrongAnswer { expected: usize, pressed: usize },
    AnswerTimeout { expected: usize },
    ComboUp { combo: u32 },
    LockoutEnded,
    EnemySpawned { variant: EnemyVariant, hp: u32 },
    EnemyShoot,
    EnemyHit { lethal: bool },
    EnemyDestroyed,
    EnemyRemoved,
    Interception { pos: Vec2, bonus: u64 },
    Breakthrough,
    DefenderHit,
    LifeLost { remaining: u8 },
    LevelUp { level_index: usize },
    ChampionReached,
    GameOver { score: u64 },
    SaveRequested { reason: SaveReason },
}
