//! Property tests for progression, persistence and the tick loop

use note_siege::persistence::{ProgressSnapshot, sanitize};
use note_siege::settings::Settings;
use note_siege::sim::{
    Enemy, GameState, LevelTable, TickInput, clamp_level_index, compute_ramp_ratio, start_game,
    tick,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

proptest! {
    #[test]
    fn ramp_is_monotonic_and_capped(
        a in 0.0f64..200_000.0,
        b in 0.0f64..200_000.0,
        duration in 1.0f64..100_000.0,
        cap in 0.0f32..1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let r_lo = compute_ramp_ratio(lo, duration, cap);
        let r_hi = compute_ramp_ratio(hi, duration, cap);
        prop_assert!(r_lo <= r_hi);
        prop_assert!((0.0..=cap).contains(&r_hi));
    }

    #[test]
    fn difficulty_never_eases_within_a_level(
        index in 0usize..15,
        a in 0.0f64..120_000.0,
        b in 0.0f64..120_000.0,
    ) {
        let table = LevelTable::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let early = table.difficulty_at(index, lo);
        let late = table.difficulty_at(index, hi);
        prop_assert!(late.monster_speed >= early.monster_speed);
        prop_assert!(late.projectile_speed >= early.projectile_speed);
        prop_assert!(late.fire_rate >= early.fire_rate);
        prop_assert!(late.spawn_delay <= early.spawn_delay);
    }

    #[test]
    fn clamped_index_is_in_range(raw in any::<f64>(), last in 0usize..64) {
        prop_assert!(clamp_level_index(raw, last) <= last);
    }

    #[test]
    fn level_index_stays_in_table(steps in 0usize..60, start in 0usize..40) {
        let mut state = GameState::new(1, &Settings::default());
        start_game(&mut state, start, false);
        for _ in 0..steps {
            state.advance_level();
            prop_assert!(state.level_index <= state.levels.last_index());
            let note = state.current_note.unwrap_or(0);
            prop_assert!(state.is_note_unlocked(note));
        }
    }

    #[test]
    fn snapshot_survives_json(
        level in 0u32..1000,
        champion in any::<bool>(),
        saved_at in 0i64..4_000_000_000_000,
    ) {
        let snap = ProgressSnapshot { level_index: level, champion, saved_at };
        let value = serde_json::to_value(snap).unwrap();
        prop_assert_eq!(sanitize(&value), Some(snap));
    }

    #[test]
    fn malformed_snapshot_is_rejected(level in -1000.0f64..-0.001, champion in any::<bool>()) {
        let value = serde_json::json!({"levelIndex": level, "champion": champion, "savedAt": 0});
        prop_assert_eq!(sanitize(&value), None);
    }

    #[test]
    fn take_damage_never_underflows(phase in 0u32..10, hits in 0usize..12) {
        let mut rng = Pcg32::seed_from_u64(phase as u64);
        let mut enemy = Enemy::spawn(1, phase, &mut rng);
        let max = enemy.max_hp;
        let mut lethal = 0;
        for _ in 0..hits {
            if enemy.take_damage() {
                lethal += 1;
            }
        }
        prop_assert!(enemy.hp <= max);
        prop_assert!(lethal <= 1);
        prop_assert_eq!(enemy.is_dying(), hits >= max as usize);
    }

    #[test]
    fn score_never_decreases(
        seed in any::<u64>(),
        presses in proptest::collection::vec(0usize..15, 0..200),
    ) {
        let mut state = GameState::new(seed, &Settings::default());
        start_game(&mut state, 0, false);
        let mut last = state.score;
        for (i, p) in presses.iter().enumerate() {
            // Sprinkle presses between idle frames
            for _ in 0..(i % 7) {
                tick(&mut state, &TickInput::default());
            }
            tick(&mut state, &TickInput { note: Some(*p) });
            prop_assert!(state.score >= last);
            prop_assert!(state.lives <= 5);
            last = state.score;
        }
    }
}
