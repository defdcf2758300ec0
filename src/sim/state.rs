//! Game state and core simulation types
//!
//! Everything the simulation reads or writes lives in `GameState`, which is
//! passed by `&mut` into every subsystem.

use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enemy::Enemy;
use super::entities::{EnemyShot, EntityList, FloatText, Particle, PlayerShot};
use super::events::{GameEvent, SaveReason};
use super::progression::{Difficulty, LevelConfig, LevelTable, unlocked_note_indices};
use super::schedule::Scheduler;
use crate::consts::*;
use crate::notes::Clef;
use crate::settings::Settings;

/// Top-level loop phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start overlay, nothing ticks
    Idle,
    /// Simulation ticking, answers accepted
    Running,
    /// Simulation ticking, answers ignored while the correct note is shown
    Lockout,
    /// Lives exhausted
    GameOver,
}

/// Screen shake (offset is re-rolled each tick while power decays)
#[derive(Debug, Clone, Copy, Default)]
pub struct Shake {
    pub offset: Vec2,
    pub power: f32,
}

impl Shake {
    pub fn kick(&mut self, power: f32) {
        self.power = self.power.max(power);
    }

    pub fn update(&mut self, rng: &mut Pcg32) {
        if self.power > 0.0 {
            self.offset =
                Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * self.power;
            self.power *= 0.85;
            if self.power < 0.5 {
                *self = Self::default();
            }
        } else {
            self.offset = Vec2::ZERO;
        }
    }
}

/// Result of one progression step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to this level index
    Advanced(usize),
    /// Cleared the last level; champion flag now set
    Champion,
    /// Champion already set, nothing changes
    Unchanged,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Incremented by every start; scheduled work from older runs is stale
    pub run_id: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub tick: u64,

    pub lives: u8,
    pub score: u64,
    pub combo: u32,
    pub streak: u32,
    pub best_streak: u32,

    // Progression pointers
    pub wave: u32,
    pub stage: u32,
    pub stage_level: u32,
    pub level_index: usize,
    pub champion: bool,
    pub levels: LevelTable,
    pub unlocked_note_count: u32,
    pub difficulty: Difficulty,
    pub level_elapsed_ms: f64,
    pub total_elapsed_ms: f64,

    // Prompt
    pub clef: Clef,
    pub current_note: Option<usize>,
    /// Correct note highlighted during a lockout
    pub revealed_note: Option<usize>,
    pub timer_max: f32,
    pub timer_left: f32,
    pub timer_running: bool,

    // Entities
    pub enemy: Option<Enemy>,
    pub spawn_delay: f32,
    pub player_shots: EntityList<PlayerShot>,
    pub enemy_shots: EntityList<EnemyShot>,
    pub particles: EntityList<Particle>,
    pub floats: EntityList<FloatText>,
    pub shake: Shake,
    pub shake_enabled: bool,
    pub particles_enabled: bool,

    // Deferred work and outputs
    pub scheduler: Scheduler,
    pub events: Vec<GameEvent>,
    pub lockout_ticks: u64,
    pub lockout_id: u32,
    pub autosave_interval_ms: f64,
    pub autosave_elapsed_ms: f64,

    next_id: u32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let levels = LevelTable::new(settings.bands);
        let first = levels.get(0).clone();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run_id: 0,
            phase: GamePhase::Idle,
            tick: 0,
            lives: MAX_LIVES,
            score: 0,
            combo: 0,
            streak: 0,
            best_streak: 0,
            wave: 1,
            stage: first.stage,
            stage_level: first.stage_level,
            level_index: 0,
            champion: false,
            unlocked_note_count: first.unlocked_notes,
            difficulty: Difficulty::default(),
            levels,
            level_elapsed_ms: 0.0,
            total_elapsed_ms: 0.0,
            clef: settings.clef,
            current_note: None,
            revealed_note: None,
            timer_max: TIMER_MAX,
            timer_left: TIMER_MAX,
            timer_running: false,
            enemy: None,
            spawn_delay: FIRST_SPAWN_DELAY,
            player_shots: EntityList::new(),
            enemy_shots: EntityList::new(),
            particles: EntityList::new(),
            floats: EntityList::new(),
            shake: Shake::default(),
            shake_enabled: settings.effective_screen_shake(),
            particles_enabled: settings.particles,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            lockout_ticks: settings.lockout_ticks(),
            lockout_id: 0,
            autosave_interval_ms: settings.autosave_interval_ms as f64,
            autosave_elapsed_ms: 0.0,
            next_id: 1,
        };
        state.apply_level(0);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Answers are accepted or a lockout is pending
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Lockout)
    }

    pub fn current_level(&self) -> &LevelConfig {
        self.levels.get(self.level_index)
    }

    /// Note indices currently offered
    pub fn available_note_indices(&self) -> Range<usize> {
        unlocked_note_indices(self.unlocked_note_count)
    }

    pub fn is_note_unlocked(&self, index: usize) -> bool {
        self.available_note_indices().contains(&index)
    }

    /// Answer timer as a fraction of its maximum
    pub fn timer_fraction(&self) -> f32 {
        if self.timer_max <= 0.0 {
            0.0
        } else {
            (self.timer_left / self.timer_max).clamp(0.0, 1.0)
        }
    }

    /// Load a level's configuration and reset the per-level clock
    pub fn apply_level(&mut self, index: usize) {
        self.level_index = index.min(self.levels.last_index());
        let level = self.levels.get(self.level_index).clone();
        self.stage = level.stage;
        self.stage_level = level.stage_level;
        self.wave = level.id;
        self.unlocked_note_count = level.unlocked_notes;
        self.timer_max =
            (TIMER_MAX - (level.stage - 1) as f32 * TIMER_STEP_PER_STAGE).max(TIMER_MIN);
        self.timer_left = self.timer_left.min(self.timer_max);
        self.level_elapsed_ms = 0.0;
        self.difficulty = self.levels.difficulty_at(self.level_index, 0.0);
        self.ensure_note_valid();
    }

    /// Step the progression pointer once. Idempotent after champion.
    pub fn advance_level(&mut self) -> Advance {
        if self.champion {
            return Advance::Unchanged;
        }
        if self.level_index >= self.levels.last_index() {
            self.champion = true;
            log::info!("Champion reached at level {}", self.level_index + 1);
            self.push_event(GameEvent::ChampionReached);
            self.push_event(GameEvent::SaveRequested { reason: SaveReason::LevelAdvance });
            return Advance::Champion;
        }
        let next = self.level_index + 1;
        self.apply_level(next);
        log::info!(
            "Advanced to {} ({} notes)",
            self.current_level().label(),
            self.unlocked_note_count
        );
        self.push_event(GameEvent::LevelUp { level_index: next });
        self.push_event(GameEvent::SaveRequested { reason: SaveReason::LevelAdvance });
        Advance::Advanced(next)
    }

    /// Advance if the level's duration has been served
    pub fn try_advance(&mut self) -> Option<Advance> {
        if self.champion {
            return None;
        }
        let duration = self.current_level().duration_ms as f64;
        if self.level_elapsed_ms >= duration {
            Some(self.advance_level())
        } else {
            None
        }
    }

    /// Replace the pending note if progression no longer offers it
    pub fn ensure_note_valid(&mut self) {
        let Some(note) = self.current_note else { return };
        if !self.is_note_unlocked(note) {
            log::debug!("Pending note {note} no longer unlocked, replacing");
            self.current_note = None;
            self.pick_next_note();
        }
    }

    /// Present a fresh note from the unlocked set and refill the timer
    pub fn pick_next_note(&mut self) {
        let range = self.available_note_indices();
        let mut note = self.rng.random_range(range.clone());
        // One reroll keeps immediate repeats rare without forbidding them
        if Some(note) == self.current_note && range.len() > 1 {
            note = self.rng.random_range(range);
        }
        self.current_note = Some(note);
        self.timer_left = self.timer_max;
        self.push_event(GameEvent::NextNote { note });
    }

    /// Queue particles, honoring the particle cap and toggle
    pub fn add_particles(&mut self, particles: Vec<Particle>) {
        if !self.particles_enabled {
            return;
        }
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for p in particles.into_iter().take(room) {
            self.particles.push(p);
        }
    }

    pub fn add_float(&mut self, pos: Vec2, text: impl Into<String>, color: u32, size: f32) {
        self.floats.push(FloatText::new(pos, text, color, size));
    }

    pub fn kick_shake(&mut self, power: f32) {
        if self.shake_enabled {
            self.shake.kick(power);
        }
    }

    /// Reset everything for a fresh run at the given progression point
    pub fn reset_for_run(&mut self, level_index: usize, champion: bool) {
        self.run_id = self.run_id.wrapping_add(1);
        self.phase = GamePhase::Running;
        self.lives = MAX_LIVES;
        self.score = 0;
        self.combo = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.champion = champion;
        self.total_elapsed_ms = 0.0;
        self.current_note = None;
        self.revealed_note = None;
        self.timer_running = false;
        self.timer_left = TIMER_MAX;
        self.enemy = None;
        self.spawn_delay = FIRST_SPAWN_DELAY;
        self.player_shots.clear();
        self.enemy_shots.clear();
        self.particles.clear();
        self.floats.clear();
        self.shake = Shake::default();
        self.autosave_elapsed_ms = 0.0;
        self.apply_level(self.levels.clamp_index(level_index as f64));
        self.pick_next_note();
    }
}
