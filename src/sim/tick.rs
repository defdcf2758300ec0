//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically, one
//! animation frame per call.

use glam::Vec2;

use super::collision::{self, CollisionReport};
use super::enemy::{Enemy, EnemyEvent};
use super::entities::{self, EntityEvent, PlayerShot, UpdateCtx};
use super::events::{GameEvent, SaveReason};
use super::schedule::ScheduledEvent;
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::notes::{NOTE_COUNT, NOTES};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Note index pressed this frame
    pub note: Option<usize>,
}

/// How an answer press was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Not accepted (wrong phase, no target, out of range, locked out)
    Ignored,
    Correct,
    Wrong,
}

/// Begin a run at a progression point (fresh or resumed)
pub fn start_game(state: &mut GameState, level_index: usize, champion: bool) {
    state.reset_for_run(level_index, champion);
    log::info!(
        "Run {} started at {} (seed {})",
        state.run_id,
        state.current_level().label(),
        state.seed
    );
    state.push_event(GameEvent::GameStarted {
        level_index: state.level_index,
    });
}

/// Handle one note press
pub fn submit_answer(state: &mut GameState, pressed: usize) -> AnswerOutcome {
    if state.phase != GamePhase::Running || pressed >= NOTE_COUNT {
        return AnswerOutcome::Ignored;
    }
    if !state.enemy.as_ref().is_some_and(Enemy::is_active) {
        return AnswerOutcome::Ignored;
    }
    state.ensure_note_valid();
    let Some(expected) = state.current_note else {
        return AnswerOutcome::Ignored;
    };
    if !state.is_note_unlocked(pressed) {
        return AnswerOutcome::Ignored;
    }

    if pressed == expected {
        on_correct(state, pressed);
        AnswerOutcome::Correct
    } else {
        state.push_event(GameEvent::WrongAnswer { expected, pressed });
        let mut fx = Vec::new();
        entities::burst(
            &mut fx,
            &mut state.rng,
            Vec2::new(DEFENDER_X, DEFENDER_Y),
            12,
            &entities::ParticleStyle {
                color: 0xffbbbb,
                speed: 5.0,
                ..Default::default()
            },
        );
        state.add_particles(fx);
        state.kick_shake(6.0);
        begin_lockout(state);
        AnswerOutcome::Wrong
    }
}

fn on_correct(state: &mut GameState, note: usize) {
    state.streak += 1;
    state.best_streak = state.best_streak.max(state.streak);
    if state.streak.is_multiple_of(STREAK_PER_COMBO) {
        state.combo += 1;
        state.push_event(GameEvent::ComboUp { combo: state.combo });
    }
    let points = ANSWER_POINTS * (1 + state.combo as u64);
    state.score += points;
    state.add_float(
        Vec2::new(PLAYER_SHOT_ORIGIN_X, FIELD_HEIGHT * 0.55),
        format!("+{points}"),
        0x44ee88,
        24.0,
    );
    state.push_event(GameEvent::CorrectAnswer { note, points });

    if let Some(enemy) = &state.enemy {
        state
            .player_shots
            .push(PlayerShot::new(enemy.pos, NOTES[note].frequency));
    }
    // Next prompt is ready immediately so the player can fire rapidly
    state.pick_next_note();
}

/// Stop the timer, reveal the answer and ignore input for a while
fn begin_lockout(state: &mut GameState) {
    state.streak = 0;
    state.combo = 0;
    state.timer_running = false;
    state.revealed_note = state.current_note;
    state.phase = GamePhase::Lockout;
    state.lockout_id = state.lockout_id.wrapping_add(1);
    state.scheduler.schedule(
        state.tick + state.lockout_ticks,
        ScheduledEvent::EndLockout {
            run_id: state.run_id,
            lockout_id: state.lockout_id,
        },
    );
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.streak = 0;
    state.combo = 0;
    state.kick_shake(10.0);
    let mut fx = Vec::new();
    entities::defender_hit(&mut fx, &mut state.rng, Vec2::new(DEFENDER_X, DEFENDER_Y));
    state.add_particles(fx);
    state.push_event(GameEvent::LifeLost {
        remaining: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.timer_running = false;
        log::info!(
            "Game over: score {} at {} ({} ms played)",
            state.score,
            state.current_level().label(),
            state.total_elapsed_ms.round()
        );
        state.push_event(GameEvent::GameOver { score: state.score });
        state.push_event(GameEvent::SaveRequested {
            reason: SaveReason::GameOver,
        });
    }
}

fn run_scheduled(state: &mut GameState) {
    for event in state.scheduler.drain_due(state.tick) {
        match event {
            ScheduledEvent::EnemyShot {
                run_id,
                enemy_id,
                variant,
            } => {
                if run_id != state.run_id {
                    continue;
                }
                // The enemy may have died or been replaced since the volley was queued
                let Some(enemy) = state.enemy.as_ref() else { continue };
                if enemy.id != enemy_id || !enemy.is_active() {
                    continue;
                }
                let shot = entities::EnemyShot::new(
                    enemy.muzzle(),
                    variant,
                    state.difficulty.projectile_speed,
                );
                state.enemy_shots.push(shot);
            }
            ScheduledEvent::EndLockout { run_id, lockout_id } => {
                if run_id != state.run_id
                    || lockout_id != state.lockout_id
                    || state.phase != GamePhase::Lockout
                {
                    continue;
                }
                state.phase = GamePhase::Running;
                state.revealed_note = None;
                state.pick_next_note();
                state.timer_running = true;
                state.push_event(GameEvent::LockoutEnded);
            }
        }
    }
}

fn spawn_enemy(state: &mut GameState) {
    let id = state.next_entity_id();
    let enemy = Enemy::spawn(id, state.stage.saturating_sub(1), &mut state.rng);
    log::debug!(
        "Spawned {:?} (hp {}, speed {:.2})",
        enemy.variant,
        enemy.hp,
        enemy.base_speed
    );
    state.push_event(GameEvent::EnemySpawned {
        variant: enemy.variant,
        hp: enemy.hp,
    });
    state.enemy = Some(enemy);
    if state.phase == GamePhase::Running {
        state.timer_running = true;
    }
}

fn schedule_volley(state: &mut GameState) {
    let Some(enemy) = state.enemy.as_ref() else { return };
    let (enemy_id, variant, volley) = (enemy.id, enemy.variant, enemy.volley);
    state.push_event(GameEvent::EnemyShoot);
    for i in 0..volley as u64 {
        state.scheduler.schedule(
            state.tick + i * VOLLEY_STAGGER_TICKS,
            ScheduledEvent::EnemyShot {
                run_id: state.run_id,
                enemy_id,
                variant,
            },
        );
    }
}

fn apply_collisions(state: &mut GameState, report: CollisionReport) {
    let mut fx = Vec::new();
    for pos in &report.interceptions {
        state.score += INTERCEPT_BONUS;
        entities::note_explosion(&mut fx, &mut state.rng, *pos, 0xaaddff);
        state.add_float(*pos, format!("+{INTERCEPT_BONUS}"), 0xaaaaff, 16.0);
        state.push_event(GameEvent::Interception {
            pos: *pos,
            bonus: INTERCEPT_BONUS,
        });
    }
    for hit in &report.hits {
        entities::note_explosion(&mut fx, &mut state.rng, hit.pos, 0xaaddff);
        state.push_event(GameEvent::EnemyHit { lethal: hit.lethal });
        if let Some(enemy) = &state.enemy {
            entities::hit_spark(&mut fx, &mut state.rng, enemy.muzzle());
        }
        if hit.lethal {
            if let Some(pos) = state.enemy.as_ref().map(|e| e.pos - Vec2::new(0.0, 40.0)) {
                state.add_float(pos, "DESTROYED!", 0xffaa00, 26.0);
            }
            state.kick_shake(12.0);
            state.push_event(GameEvent::EnemyDestroyed);
        }
    }
    state.add_particles(fx);

    if report.breakthrough {
        state.push_event(GameEvent::Breakthrough);
        lose_life(state);
    }
}

fn step_entities(state: &mut GameState) {
    let mut spawned = Vec::new();
    let mut ctx = UpdateCtx {
        rng: &mut state.rng,
        spawned: &mut spawned,
    };
    state.player_shots.step(&mut ctx);
    let hits = state.enemy_shots.step(&mut ctx);
    state.particles.step(&mut ctx);
    state.floats.step(&mut ctx);
    state.add_particles(spawned);

    for event in hits {
        match event {
            EntityEvent::HitDefender { .. } => {
                if state.phase == GamePhase::GameOver {
                    break;
                }
                state.push_event(GameEvent::DefenderHit);
                lose_life(state);
            }
        }
    }
}

/// Detach a finished enemy and run the removal-time checks
fn on_enemy_removed(state: &mut GameState) {
    state.enemy = None;
    state.spawn_delay = state.difficulty.spawn_delay;
    if state.timer_running {
        state.timer_left += (state.timer_max - state.timer_left).min(TIMER_REFUND);
    }
    state.push_event(GameEvent::EnemyRemoved);
    state.try_advance();
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(note) = input.note {
        submit_answer(state, note);
    }

    if !state.is_running() {
        return;
    }

    // Clocks
    state.tick += 1;
    state.level_elapsed_ms += FRAME_MS;
    state.total_elapsed_ms += FRAME_MS;
    state.shake.update(&mut state.rng);

    run_scheduled(state);

    // Difficulty from ramp
    state.difficulty = state
        .levels
        .difficulty_at(state.level_index, state.level_elapsed_ms);

    // Answer timer
    if state.timer_running {
        state.timer_left -= TIMER_DRAIN;
        if state.timer_left <= 0.0 {
            state.timer_left = 0.0;
            if let Some(expected) = state.current_note {
                state.push_event(GameEvent::AnswerTimeout { expected });
            }
            lose_life(state);
            if state.phase == GamePhase::GameOver {
                return;
            }
            begin_lockout(state);
        }
    }

    // Spawn
    if state.enemy.is_none() {
        if state.spawn_delay <= 0.0 {
            spawn_enemy(state);
        } else {
            state.spawn_delay -= 1.0;
        }
    }

    // Enemy
    let (speed, fire_rate) = (state.difficulty.monster_speed, state.difficulty.fire_rate);
    let enemy_event = state.enemy.as_mut().and_then(|e| e.step(speed, fire_rate));
    if enemy_event == Some(EnemyEvent::Shoot) {
        schedule_volley(state);
    }

    // Collisions
    let radius = collision::interception_radius(state.difficulty.projectile_speed);
    let report = collision::resolve(
        &mut state.player_shots,
        &mut state.enemy_shots,
        state.enemy.as_mut(),
        radius,
    );
    apply_collisions(state, report);
    if state.phase == GamePhase::GameOver {
        return;
    }

    step_entities(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    // Removal-time advancement
    if state.enemy.as_ref().is_some_and(Enemy::is_removed) {
        on_enemy_removed(state);
    }

    // Autosave cadence
    state.autosave_elapsed_ms += FRAME_MS;
    if state.autosave_interval_ms > 0.0
        && state.autosave_elapsed_ms >= state.autosave_interval_ms
    {
        state.autosave_elapsed_ms = 0.0;
        state.push_event(GameEvent::SaveRequested {
            reason: SaveReason::Periodic,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::enemy::EnemyPhase;

    fn running() -> GameState {
        let mut state = GameState::new(12345, &Settings::default());
        start_game(&mut state, 0, false);
        state
    }

    /// Tick until an enemy is on screen
    fn with_enemy() -> GameState {
        let mut state = running();
        let input = TickInput::default();
        while state.enemy.is_none() {
            tick(&mut state, &input);
        }
        state
    }

    /// Keep the enemy out of range and its gun cold
    fn park_enemy(state: &mut GameState) {
        if let Some(e) = state.enemy.as_mut() {
            e.pos.x = FIELD_WIDTH;
            e.shoot_timer = 0.0;
        }
    }

    fn wrong_note(state: &GameState) -> usize {
        if state.current_note == Some(0) { 1 } else { 0 }
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(1, &Settings::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.tick, 0);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_first_spawn_after_delay() {
        let mut state = running();
        let input = TickInput::default();
        for _ in 0..FIRST_SPAWN_DELAY as usize {
            tick(&mut state, &input);
            assert!(state.enemy.is_none());
        }
        tick(&mut state, &input);
        assert!(state.enemy.is_some());
        assert!(state.timer_running);
    }

    #[test]
    fn test_input_ignored_without_enemy() {
        let mut state = running();
        let note = state.current_note.unwrap();
        assert_eq!(submit_answer(&mut state, note), AnswerOutcome::Ignored);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_correct_answer_scores_and_fires() {
        let mut state = with_enemy();
        let note = state.current_note.unwrap();
        assert_eq!(submit_answer(&mut state, note), AnswerOutcome::Correct);
        assert_eq!(state.score, ANSWER_POINTS);
        assert_eq!(state.streak, 1);
        assert_eq!(state.player_shots.len(), 1);
        assert!(state.current_note.is_some());
    }

    #[test]
    fn test_combo_every_five() {
        let mut state = with_enemy();
        for _ in 0..5 {
            let note = state.current_note.unwrap();
            submit_answer(&mut state, note);
        }
        assert_eq!(state.combo, 1);
        // 4 answers at 10, the fifth at 20
        assert_eq!(state.score, 60);
    }

    #[test]
    fn test_out_of_range_input_ignored() {
        let mut state = with_enemy();
        assert_eq!(submit_answer(&mut state, 99), AnswerOutcome::Ignored);
        // Index 10 exists but is not unlocked at level 0
        assert_eq!(submit_answer(&mut state, 10), AnswerOutcome::Ignored);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_wrong_answer_locks_out_then_recovers() {
        let mut state = with_enemy();
        state.streak = 3;
        let expected = state.current_note.unwrap();
        let wrong = if expected == 0 { 1 } else { 0 };
        assert_eq!(submit_answer(&mut state, wrong), AnswerOutcome::Wrong);
        assert_eq!(state.phase, GamePhase::Lockout);
        assert_eq!(state.revealed_note, Some(expected));
        assert_eq!(state.streak, 0);
        assert!(!state.timer_running);

        // Input is ignored while locked out
        assert_eq!(submit_answer(&mut state, expected), AnswerOutcome::Ignored);

        // Keep the enemy far away so nothing else interferes
        let input = TickInput::default();
        for _ in 0..state.lockout_ticks + 1 {
            if let Some(e) = state.enemy.as_mut() {
                e.pos.x = FIELD_WIDTH;
                e.shoot_timer = 0.0;
            }
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.revealed_note, None);
        assert!(state.timer_running);
        assert!(state.events.contains(&GameEvent::LockoutEnded));
    }

    #[test]
    fn test_timeout_costs_a_life() {
        let mut state = with_enemy();
        state.timer_left = TIMER_DRAIN / 2.0;
        if let Some(e) = state.enemy.as_mut() {
            e.pos.x = FIELD_WIDTH;
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Lockout);
    }

    #[test]
    fn test_breakthrough_at_full_health_costs_life() {
        let mut state = with_enemy();
        {
            let e = state.enemy.as_mut().unwrap();
            e.hp = 3;
            e.max_hp = 3;
            e.pos.x = CONTACT_X + 0.01;
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, MAX_LIVES - 1);
        let e = state.enemy.as_ref().unwrap();
        assert!(e.is_dying());
        assert_eq!(e.hp, 3);
        assert!(state.events.contains(&GameEvent::Breakthrough));
    }

    #[test]
    fn test_enemy_removed_after_death_animation() {
        let mut state = with_enemy();
        state.enemy.as_mut().unwrap().die();
        let input = TickInput::default();
        for _ in 0..ENEMY_DEATH_TICKS - 1 {
            tick(&mut state, &input);
            assert!(state.enemy.is_some());
        }
        tick(&mut state, &input);
        assert!(state.enemy.is_none());
        assert_eq!(state.spawn_delay, state.difficulty.spawn_delay);
    }

    #[test]
    fn test_advance_checked_at_removal() {
        let mut state = with_enemy();
        state.level_elapsed_ms = state.current_level().duration_ms as f64 + 1.0;
        tick(&mut state, &TickInput::default());
        // Still fighting: no advancement mid-fight
        assert_eq!(state.level_index, 0);

        state.enemy.as_mut().unwrap().phase = EnemyPhase::Dying {
            ticks: ENEMY_DEATH_TICKS - 1,
        };
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level_index, 1);
        assert!(state.events.contains(&GameEvent::LevelUp { level_index: 1 }));
    }

    #[test]
    fn test_volley_rechecks_enemy_liveness() {
        let mut state = with_enemy();
        {
            let e = state.enemy.as_mut().unwrap();
            e.volley = 3;
            e.on_screen_frames = ENEMY_GRACE_TICKS + 1;
            e.shoot_timer = e.shoot_interval;
            e.pos.x = FIELD_WIDTH;
        }
        let input = TickInput::default();
        tick(&mut state, &input);
        assert!(state.events.contains(&GameEvent::EnemyShoot));
        assert_eq!(state.scheduler.len(), 3);

        // First shot fires on the next tick
        tick(&mut state, &input);
        assert_eq!(state.enemy_shots.len(), 1);

        // Enemy dies before the rest of the volley
        state.enemy.as_mut().unwrap().die();
        for _ in 0..30 {
            tick(&mut state, &input);
        }
        assert!(state.scheduler.is_empty());
        assert!(state.enemy_shots.len() <= 1);
    }

    #[test]
    fn test_restart_mid_lockout_ignores_stale_end() {
        let mut state = with_enemy();
        park_enemy(&mut state);
        let wrong = wrong_note(&state);
        assert_eq!(submit_answer(&mut state, wrong), AnswerOutcome::Wrong);
        let input = TickInput::default();
        for _ in 0..state.lockout_ticks / 2 {
            park_enemy(&mut state);
            tick(&mut state, &input);
        }

        // New run with an enemy already in place, locked out again
        start_game(&mut state, 0, false);
        let id = state.next_entity_id();
        state.enemy = Some(Enemy::spawn(id, 0, &mut state.rng));
        park_enemy(&mut state);
        let wrong = wrong_note(&state);
        assert_eq!(submit_answer(&mut state, wrong), AnswerOutcome::Wrong);
        let began = state.tick;

        // The first run's EndLockout comes due halfway through; it must not count
        let mut ended = None;
        for _ in 0..state.lockout_ticks + 1 {
            park_enemy(&mut state);
            tick(&mut state, &input);
            if ended.is_none() && state.phase == GamePhase::Running {
                ended = Some(state.tick);
            }
        }
        assert_eq!(ended, Some(began + state.lockout_ticks));
    }

    #[test]
    fn test_restart_mid_volley_drops_stale_shots() {
        let mut state = with_enemy();
        {
            let e = state.enemy.as_mut().unwrap();
            e.volley = 3;
            e.on_screen_frames = ENEMY_GRACE_TICKS + 1;
            e.shoot_timer = e.shoot_interval;
            e.pos.x = FIELD_WIDTH;
        }
        let input = TickInput::default();
        tick(&mut state, &input);
        assert!(state.events.contains(&GameEvent::EnemyShoot));
        assert_eq!(state.scheduler.len(), 3);

        // Restart before any shot leaves, keeping the same enemy (same id) on screen
        let enemy = state.enemy.clone();
        start_game(&mut state, 0, false);
        state.enemy = enemy;
        for _ in 0..3 * VOLLEY_STAGGER_TICKS {
            park_enemy(&mut state);
            tick(&mut state, &input);
            assert!(state.enemy_shots.is_empty());
        }
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_replaced_enemy_gets_no_stale_shots() {
        let mut state = with_enemy();
        {
            let e = state.enemy.as_mut().unwrap();
            e.volley = 2;
            e.on_screen_frames = ENEMY_GRACE_TICKS + 1;
            e.shoot_timer = e.shoot_interval;
            e.pos.x = FIELD_WIDTH;
        }
        let input = TickInput::default();
        tick(&mut state, &input);
        assert_eq!(state.scheduler.len(), 2);

        // Same run, different enemy
        let id = state.next_entity_id();
        state.enemy = Some(Enemy::spawn(id, 0, &mut state.rng));
        for _ in 0..2 * VOLLEY_STAGGER_TICKS {
            park_enemy(&mut state);
            tick(&mut state, &input);
            assert!(state.enemy_shots.is_empty());
        }
    }

    #[test]
    fn test_enemy_removal_refunds_timer() {
        let mut state = with_enemy();
        assert!(state.timer_running);
        let max = state.timer_max;

        // Refund is capped at TIMER_REFUND
        state.timer_left = 200.0;
        state.enemy.as_mut().unwrap().phase = EnemyPhase::Dying {
            ticks: ENEMY_DEATH_TICKS - 1,
        };
        tick(&mut state, &TickInput::default());
        assert!(state.enemy.is_none());
        let expected = 200.0 - TIMER_DRAIN + TIMER_REFUND;
        assert!((state.timer_left - expected).abs() < 1e-3);

        // ...and never fills past the maximum
        while state.enemy.is_none() {
            tick(&mut state, &TickInput::default());
        }
        state.timer_left = max - 20.0;
        state.enemy.as_mut().unwrap().phase = EnemyPhase::Dying {
            ticks: ENEMY_DEATH_TICKS - 1,
        };
        tick(&mut state, &TickInput::default());
        assert!(state.enemy.is_none());
        assert!((state.timer_left - max).abs() < 1e-3);
    }

    #[test]
    fn test_removal_refunds_nothing_while_timer_stopped() {
        let mut state = with_enemy();
        park_enemy(&mut state);
        let wrong = wrong_note(&state);
        submit_answer(&mut state, wrong);
        assert!(!state.timer_running);
        let left = state.timer_left;
        state.enemy.as_mut().unwrap().phase = EnemyPhase::Dying {
            ticks: ENEMY_DEATH_TICKS - 1,
        };
        tick(&mut state, &TickInput::default());
        assert!(state.enemy.is_none());
        assert_eq!(state.timer_left, left);
    }

    #[test]
    fn test_game_over_when_lives_run_out() {
        let mut state = with_enemy();
        state.lives = 1;
        state.timer_left = 0.1;
        if let Some(e) = state.enemy.as_mut() {
            e.pos.x = FIELD_WIDTH;
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::SaveRequested {
            reason: SaveReason::GameOver
        }));

        // Frozen afterwards
        let t = state.tick;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.tick, t);
    }

    #[test]
    fn test_periodic_autosave_request() {
        let mut state = running();
        let input = TickInput::default();
        let ticks = (state.autosave_interval_ms / FRAME_MS).ceil() as usize + 1;
        let mut saves = 0;
        for _ in 0..ticks {
            tick(&mut state, &input);
            saves += state
                .drain_events()
                .iter()
                .filter(|e| {
                    matches!(e, GameEvent::SaveRequested { reason: SaveReason::Periodic })
                })
                .count();
            if state.phase != GamePhase::Running && state.phase != GamePhase::Lockout {
                break;
            }
        }
        assert_eq!(saves, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = running();
        let mut b = running();
        for i in 0..600 {
            let input = TickInput {
                note: if i % 40 == 0 { a.current_note } else { None },
            };
            let input_b = TickInput {
                note: if i % 40 == 0 { b.current_note } else { None },
            };
            tick(&mut a, &input);
            tick(&mut b, &input_b);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.tick, b.tick);
        assert_eq!(a.current_note, b.current_note);
    }
}
