//! Frame loop host
//!
//! `Session` owns the simulation and its collaborators. The host calls
//! `frame` once per animation frame with the elapsed wall time; the session
//! runs fixed substeps, dispatches the resulting events to audio and
//! persistence, and exposes a HUD snapshot.

use std::collections::VecDeque;

use serde::Serialize;

use crate::audio::{self, AudioSink};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::notes::NOTES;
use crate::persistence::{KeyValueStorage, ProgressSnapshot, ProgressStore, format_elapsed_since};
use crate::platform;
use crate::settings::Settings;
use crate::sim::{
    AnswerOutcome, GameEvent, GamePhase, GameState, SaveReason, TickInput, start_game,
    submit_answer, tick,
};

/// Everything the HUD shows, read once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: &'static str,
    pub score: u64,
    pub best: u64,
    pub lives: u8,
    pub combo: u32,
    pub streak: u32,
    pub wave: u32,
    pub level_label: String,
    pub champion: bool,
    pub unlocked_notes: u32,
    /// Name of the note being asked (hidden during a lockout)
    pub prompt: Option<&'static str>,
    /// Correct answer shown during a lockout
    pub revealed: Option<&'static str>,
    pub timer: f32,
    /// Progress through the current level, 0..=1
    pub level_progress: f32,
    pub clef: &'static str,
    /// How long ago the resumed progress was saved
    pub saved_ago: Option<String>,
}

pub struct Session {
    state: GameState,
    settings: Settings,
    storage: Box<dyn KeyValueStorage>,
    progress: ProgressStore,
    highscores: HighScores,
    audio: Box<dyn AudioSink>,
    accumulator: f64,
    /// Presses waiting for the next substep, one per tick
    pending: VecDeque<usize>,
    last_rank: Option<usize>,
    /// Snapshot the current run resumed from
    resumed: Option<ProgressSnapshot>,
}

impl Session {
    /// Build a session, loading settings and best scores from storage
    pub fn new(seed: u64, storage: Box<dyn KeyValueStorage>, audio: Box<dyn AudioSink>) -> Self {
        let settings = Settings::load(&*storage);
        Self::with_settings(seed, settings, storage, audio)
    }

    pub fn with_settings(
        seed: u64,
        settings: Settings,
        storage: Box<dyn KeyValueStorage>,
        mut audio: Box<dyn AudioSink>,
    ) -> Self {
        let highscores = HighScores::load(&*storage);
        audio.set_volume(settings.effective_volume());
        Self {
            state: GameState::new(seed, &settings),
            settings,
            storage,
            progress: ProgressStore,
            highscores,
            audio,
            accumulator: 0.0,
            pending: VecDeque::new(),
            last_rank: None,
            resumed: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    /// Leaderboard rank achieved by the last finished run
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Start (or restart) a run from the saved progression point
    pub fn start(&mut self) {
        self.resumed = self.progress.load(&*self.storage);
        let (level_index, champion) = match self.resumed {
            Some(snap) => (snap.level_index as usize, snap.champion),
            None => (0, false),
        };
        self.accumulator = 0.0;
        self.pending.clear();
        self.last_rank = None;
        self.audio.resume();
        start_game(&mut self.state, level_index, champion);
    }

    /// Queue a note press for the next tick
    pub fn press(&mut self, note: usize) {
        if self.state.is_running() {
            self.pending.push_back(note);
        }
    }

    /// Queue a press by keyboard key name; returns false for unmapped keys
    pub fn press_key(&mut self, key: &str) -> bool {
        match platform::note_for_key(key) {
            Some(note) => {
                self.press(note);
                true
            }
            None => false,
        }
    }

    /// Run the simulation for `dt_ms` of wall time and dispatch its events
    pub fn frame(&mut self, dt_ms: f64, now_ms: i64) -> Vec<GameEvent> {
        let dt = if dt_ms.is_finite() { dt_ms.clamp(0.0, MAX_FRAME_DT_MS) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                note: self.pending.pop_front(),
            };
            tick(&mut self.state, &input);
            self.accumulator -= FRAME_MS;
            substeps += 1;
        }
        if !self.state.is_running() {
            self.pending.clear();
        }

        let events = self.state.drain_events();
        for event in &events {
            self.dispatch(event, now_ms);
        }
        events
    }

    fn dispatch(&mut self, event: &GameEvent, now_ms: i64) {
        if let Some(effect) = audio::effect_for(event) {
            self.audio.play(effect);
        }
        match event {
            GameEvent::SaveRequested { reason } => self.save_progress(*reason, now_ms),
            GameEvent::GameOver { score } => {
                self.last_rank =
                    self.highscores
                        .add_score(*score, self.state.current_level().id, now_ms);
                if let Some(rank) = self.last_rank {
                    log::info!("New high score {score} at rank {rank}");
                    self.highscores.save(&mut *self.storage);
                }
            }
            _ => {}
        }
    }

    fn save_progress(&mut self, reason: SaveReason, now_ms: i64) {
        let snapshot = ProgressSnapshot::new(self.state.level_index, self.state.champion, now_ms);
        log::debug!("Saving progress ({reason:?})");
        self.progress.save(&mut *self.storage, &snapshot);
    }

    /// Final save when the page or process goes away
    pub fn shutdown(&mut self) {
        if self.state.phase == GamePhase::Idle {
            return;
        }
        self.save_progress(SaveReason::Shutdown, platform::now_ms());
        log::info!("Session shut down at {}", self.state.current_level().label());
    }

    /// Forget saved progression and return to the start screen
    pub fn reset_progress(&mut self) {
        self.progress.clear(&mut *self.storage);
        self.state = GameState::new(self.state.seed, &self.settings);
        self.resumed = None;
        self.accumulator = 0.0;
        self.pending.clear();
        log::info!("Progress reset");
    }

    pub fn hud(&self) -> HudSnapshot {
        let s = &self.state;
        let level = s.current_level();
        let note_name = |i: Option<usize>| i.and_then(|i| NOTES.get(i)).map(|n| n.name);
        HudSnapshot {
            phase: match s.phase {
                GamePhase::Idle => "idle",
                GamePhase::Running => "running",
                GamePhase::Lockout => "lockout",
                GamePhase::GameOver => "game_over",
            },
            score: s.score,
            best: self.highscores.best().max(s.score),
            lives: s.lives,
            combo: s.combo,
            streak: s.streak,
            wave: s.wave,
            level_label: level.label(),
            champion: s.champion,
            unlocked_notes: s.unlocked_note_count,
            prompt: if s.phase == GamePhase::Lockout { None } else { note_name(s.current_note) },
            revealed: note_name(s.revealed_note),
            timer: s.timer_fraction(),
            level_progress: (s.level_elapsed_ms / level.duration_ms.max(1) as f64).min(1.0) as f32,
            clef: s.clef.as_str(),
            saved_ago: self
                .resumed
                .map(|snap| format_elapsed_since(snap.saved_at, platform::now_ms())),
        }
    }

    /// Apply an answer immediately, bypassing the queue (used by bots)
    pub fn answer_now(&mut self, note: usize) -> AnswerOutcome {
        submit_answer(&mut self.state, note)
    }
}
