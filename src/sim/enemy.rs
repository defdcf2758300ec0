//! Enemy state machine
//!
//! One enemy at a time walks from the right edge toward the defender.
//! Approaching -> Dying (lethal hit or breakthrough) -> Removed (death
//! animation finished). The enemy never touches score or lives; it reports
//! what happened and the game loop reacts.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

const BASE_SPEEDS: [f32; 5] = [0.5, 0.8, 1.2, 1.6, 2.1];
const SHOOT_INTERVALS: [f32; 5] = [260.0, 230.0, 200.0, 175.0, 150.0];
const HIT_FLASH_TICKS: u32 = 22;
const SHOOT_ANIM_TICKS: u32 = 20;
const BASE_SCALE: f32 = 1.6;

/// Enemy look and projectile flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    GrumpyBlob,
    SonicBat,
    ChoirGhost,
    RhythmSlime,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 4] = [
        EnemyVariant::GrumpyBlob,
        EnemyVariant::SonicBat,
        EnemyVariant::ChoirGhost,
        EnemyVariant::RhythmSlime,
    ];

    pub fn id(&self) -> u8 {
        match self {
            EnemyVariant::GrumpyBlob => 0,
            EnemyVariant::SonicBat => 1,
            EnemyVariant::ChoirGhost => 2,
            EnemyVariant::RhythmSlime => 3,
        }
    }

    pub fn from_id(id: u8) -> Self {
        Self::ALL[(id % 4) as usize]
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Primary shot color
    pub fn shot_color(&self) -> u32 {
        match self {
            EnemyVariant::GrumpyBlob => 0xff6600,
            EnemyVariant::SonicBat => 0x8800ff,
            EnemyVariant::ChoirGhost => 0x00aaff,
            EnemyVariant::RhythmSlime => 0xff0088,
        }
    }

    /// Trail spark color
    pub fn spark_color(&self) -> u32 {
        match self {
            EnemyVariant::GrumpyBlob => 0xffaa00,
            EnemyVariant::SonicBat => 0xcc88ff,
            EnemyVariant::ChoirGhost => 0x88ddff,
            EnemyVariant::RhythmSlime => 0xff88cc,
        }
    }
}

/// Lifecycle tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyPhase {
    Approaching,
    Dying { ticks: u32 },
    Removed,
}

/// What a step of the enemy produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyEvent {
    /// Shoot interval elapsed; the loop schedules a volley
    Shoot,
    /// Death animation finished; the loop detaches the enemy
    Removed,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub variant: EnemyVariant,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: EnemyPhase,
    /// Stage-derived walking speed before multipliers
    pub base_speed: f32,
    pub shoot_timer: f32,
    pub shoot_interval: f32,
    pub on_screen_frames: u32,
    /// Volley size when it shoots
    pub volley: u32,

    // Cosmetic state read by the renderer
    pub hit_flash: u32,
    pub squash: f32,
    pub anger: f32,
    pub bob: f32,
    pub shoot_anim: u32,
    pub scale: f32,
}

impl Enemy {
    /// Spawn a new enemy for the given stage phase (0-based)
    pub fn spawn(id: u32, phase: u32, rng: &mut Pcg32) -> Self {
        let tier = (phase as usize).min(BASE_SPEEDS.len() - 1);
        let base_speed = BASE_SPEEDS[tier] * (0.75 + rng.random::<f32>() * 0.35);
        let shoot_interval = SHOOT_INTERVALS[tier] + (rng.random::<f32>() * 30.0 - 15.0);
        let hp = 1 + phase / 2;
        Self {
            id,
            pos: Vec2::new(FIELD_WIDTH + 90.0, FIELD_HEIGHT * 0.65),
            variant: EnemyVariant::random(rng),
            hp,
            max_hp: hp,
            phase: EnemyPhase::Approaching,
            base_speed,
            shoot_timer: (shoot_interval * 0.5).floor(),
            shoot_interval,
            on_screen_frames: 0,
            volley: 1 + (phase / 2).min(2),
            hit_flash: 0,
            squash: 0.0,
            anger: 0.0,
            bob: rng.random::<f32>() * std::f32::consts::TAU,
            shoot_anim: 0,
            scale: BASE_SCALE,
        }
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.phase, EnemyPhase::Dying { .. })
    }

    pub fn is_removed(&self) -> bool {
        self.phase == EnemyPhase::Removed
    }

    /// Still a valid target (not dying, not removed)
    pub fn is_active(&self) -> bool {
        self.phase == EnemyPhase::Approaching
    }

    /// 0 far away, 1 at the defender
    pub fn danger_ratio(&self) -> f32 {
        (1.0 - (self.pos.x - 100.0) / 500.0).clamp(0.0, 1.0)
    }

    /// Death animation progress in [0, 1]
    pub fn death_progress(&self) -> f32 {
        match self.phase {
            EnemyPhase::Dying { ticks } => (ticks as f32 / ENEMY_DEATH_TICKS as f32).min(1.0),
            EnemyPhase::Removed => 1.0,
            EnemyPhase::Approaching => 0.0,
        }
    }

    /// Where its shots leave from
    pub fn muzzle(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, 20.0)
    }

    /// Advance one tick
    pub fn step(&mut self, speed_multiplier: f32, fire_rate: f32) -> Option<EnemyEvent> {
        if self.hit_flash > 0 {
            self.hit_flash -= 1;
        }
        match self.phase {
            EnemyPhase::Removed => None,
            EnemyPhase::Dying { ticks } => {
                let ticks = ticks + 1;
                if ticks >= ENEMY_DEATH_TICKS {
                    self.phase = EnemyPhase::Removed;
                    Some(EnemyEvent::Removed)
                } else {
                    self.phase = EnemyPhase::Dying { ticks };
                    None
                }
            }
            EnemyPhase::Approaching => {
                self.bob += 0.042;
                self.anger = self.danger_ratio();
                self.squash *= 0.86;
                self.pos.x -= self.base_speed * (1.0 + self.anger * 0.45) * speed_multiplier;
                self.on_screen_frames += 1;
                if self.shoot_anim > 0 {
                    self.shoot_anim -= 1;
                }
                let target_scale = if self.shoot_anim > 0 { BASE_SCALE * 1.18 } else { BASE_SCALE };
                self.scale += (target_scale - self.scale) * 0.12;

                if self.on_screen_frames > ENEMY_GRACE_TICKS {
                    self.shoot_timer += fire_rate;
                    if self.shoot_timer >= self.shoot_interval {
                        self.shoot_timer = 0.0;
                        self.shoot_anim = SHOOT_ANIM_TICKS;
                        return Some(EnemyEvent::Shoot);
                    }
                }
                None
            }
        }
    }

    /// Absorb one hit. Returns true if the hit was lethal.
    ///
    /// No effect once dying or removed.
    pub fn take_damage(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        self.hit_flash = HIT_FLASH_TICKS;
        self.squash = 0.32;
        if self.hp == 0 {
            self.die();
            return true;
        }
        false
    }

    /// Enter the death animation (idempotent)
    pub fn die(&mut self) {
        if self.is_active() {
            self.phase = EnemyPhase::Dying { ticks: 0 };
        }
    }

    /// Crossed the contact boundary, regardless of health
    pub fn reached_contact(&self) -> bool {
        self.pos.x < CONTACT_X
    }
}
