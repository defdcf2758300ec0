//! Level progression table and in-level difficulty ramp
//!
//! The table is a fixed ordered list of level configurations. Each entry
//! unlocks a non-decreasing number of notes; entries with at most
//! `BandConfig::learning_max_notes` unlocked notes form the learning band,
//! the rest form the expansion band. The two bands use different level
//! factor formulas and different in-level ramp gains.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::notes::NOTE_COUNT;

/// Unlocked note count per level, in order
pub const UNLOCK_STEPS: [u32; 15] = [2, 3, 4, 5, 6, 7, 8, 8, 9, 10, 11, 12, 13, 14, 15];
pub const LEVELS_PER_STAGE: usize = 3;
/// Fewest notes ever offered
pub const MIN_UNLOCKED_NOTES: usize = 2;
/// Spawn delay never ramps below this many ticks
pub const MIN_RAMPED_SPAWN_DELAY: f32 = 30.0;

/// Difficulty band parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Highest unlocked-note count still in the learning band
    pub learning_max_notes: u32,
    /// Learning-band level factor saturates at this value
    pub learning_anchor: f32,
    /// Expansion-band factor per note beyond the band split
    pub expansion_note_weight: f32,
    /// Expansion-band factor per level beyond the last learning level
    pub expansion_level_weight: f32,
    /// In-level ramp gain while in the learning band
    pub learning_ramp_gain: f32,
    /// In-level ramp gain while in the expansion band
    pub expansion_ramp_gain: f32,
    /// Upper bound of the ramp ratio
    pub ramp_cap: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            learning_max_notes: 8,
            learning_anchor: 3.0,
            expansion_note_weight: 0.95,
            expansion_level_weight: 0.25,
            learning_ramp_gain: 0.35,
            expansion_ramp_gain: 0.95,
            ramp_cap: 0.5,
        }
    }
}

/// One level of the progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level id
    pub id: u32,
    pub stage: u32,
    /// 1..=LEVELS_PER_STAGE
    pub stage_level: u32,
    pub unlocked_notes: u32,
    pub duration_ms: u32,
    pub monster_speed: f32,
    pub projectile_speed: f32,
    pub fire_rate: f32,
    /// Ticks between enemy removal and the next spawn
    pub spawn_delay: f32,
    pub learning_band: bool,
}

impl LevelConfig {
    pub fn label(&self) -> String {
        format!("Stage {} - Level {}", self.stage, self.stage_level)
    }
}

/// Ordered, immutable level table
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
    band: BandConfig,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(BandConfig::default())
    }
}

impl LevelTable {
    pub fn new(band: BandConfig) -> Self {
        let last_learning = UNLOCK_STEPS
            .iter()
            .rposition(|&n| n <= band.learning_max_notes)
            .unwrap_or(0);

        let levels = UNLOCK_STEPS
            .iter()
            .enumerate()
            .map(|(index, &unlocked_notes)| {
                let stage = (index / LEVELS_PER_STAGE) as u32 + 1;
                let stage_level = (index % LEVELS_PER_STAGE) as u32 + 1;
                let learning_band = unlocked_notes <= band.learning_max_notes;

                let factor = if learning_band {
                    (index as f32).min(band.learning_anchor)
                } else {
                    band.learning_anchor
                        + (unlocked_notes - band.learning_max_notes) as f32
                            * band.expansion_note_weight
                        + index.saturating_sub(last_learning) as f32 * band.expansion_level_weight
                };

                let duration_ms = if learning_band {
                    42_000 + stage_level * 5_000
                } else {
                    34_000 + stage_level * 4_500
                };

                LevelConfig {
                    id: index as u32 + 1,
                    stage,
                    stage_level,
                    unlocked_notes,
                    duration_ms,
                    monster_speed: 1.0 + factor * 0.045,
                    projectile_speed: 1.0 + factor * 0.04,
                    fire_rate: 1.0 + factor * 0.038,
                    spawn_delay: (74.0 - factor * 2.2).max(38.0),
                    learning_band,
                }
            })
            .collect();

        Self { levels, band }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    /// Level config for an index, clamped into the table
    pub fn get(&self, index: usize) -> &LevelConfig {
        &self.levels[index.min(self.last_index())]
    }

    /// Clamp an arbitrary (possibly non-finite) index into the table
    pub fn clamp_index(&self, index: f64) -> usize {
        clamp_level_index(index, self.last_index())
    }

    /// Ramp gain for a level, chosen by band
    pub fn ramp_gain(&self, level: &LevelConfig) -> f32 {
        if level.learning_band {
            self.band.learning_ramp_gain
        } else {
            self.band.expansion_ramp_gain
        }
    }

    /// Difficulty multipliers for a level at a given elapsed time
    pub fn difficulty_at(&self, index: usize, level_elapsed_ms: f64) -> Difficulty {
        let level = self.get(index);
        let ratio =
            compute_ramp_ratio(level_elapsed_ms, level.duration_ms as f64, self.band.ramp_cap);
        Difficulty::ramped(level, ratio, self.ramp_gain(level))
    }
}

/// Clamp an index into `[0, last]`; non-finite input maps to 0
pub fn clamp_level_index(index: f64, last: usize) -> usize {
    if !index.is_finite() || index < 0.0 {
        return 0;
    }
    let floored = index.floor();
    if floored > last as f64 {
        last
    } else {
        floored as usize
    }
}

/// Time-derived ramp in `[0, cap]`, non-decreasing in elapsed time
pub fn compute_ramp_ratio(level_elapsed_ms: f64, duration_ms: f64, cap: f32) -> f32 {
    if duration_ms <= 0.0 || !level_elapsed_ms.is_finite() {
        return 0.0;
    }
    let ratio = (level_elapsed_ms / duration_ms) as f32 * 0.5;
    ratio.clamp(0.0, cap.max(0.0))
}

/// Note indices offered for a given unlocked count
pub fn unlocked_note_indices(unlocked_count: u32) -> Range<usize> {
    0..(unlocked_count as usize).clamp(MIN_UNLOCKED_NOTES, NOTE_COUNT)
}

/// Live difficulty multipliers derived from the current level and ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub monster_speed: f32,
    pub projectile_speed: f32,
    pub fire_rate: f32,
    pub spawn_delay: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            monster_speed: 1.0,
            projectile_speed: 1.0,
            fire_rate: 1.0,
            spawn_delay: 74.0,
        }
    }
}

impl Difficulty {
    pub fn ramped(level: &LevelConfig, ratio: f32, gain: f32) -> Self {
        let r = ratio * gain;
        Self {
            monster_speed: level.monster_speed * (1.0 + r),
            projectile_speed: level.projectile_speed * (1.0 + r * 0.8),
            fire_rate: level.fire_rate * (1.0 + r),
            spawn_delay: (level.spawn_delay * (1.0 - r * 0.5)).max(MIN_RAMPED_SPAWN_DELAY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_layout() {
        let table = LevelTable::default();
        assert_eq!(table.len(), 15);
        assert_eq!(table.get(0).stage, 1);
        assert_eq!(table.get(0).stage_level, 1);
        assert_eq!(table.get(4).stage, 2);
        assert_eq!(table.get(4).stage_level, 2);
        assert_eq!(table.get(14).stage, 5);
        assert_eq!(table.get(14).stage_level, 3);
        assert_eq!(table.get(99).id, 15);
    }

    #[test]
    fn test_unlocked_notes_non_decreasing() {
        let table = LevelTable::default();
        for pair in table.levels().windows(2) {
            assert!(pair[0].unlocked_notes <= pair[1].unlocked_notes);
        }
    }

    #[test]
    fn test_band_split() {
        let table = LevelTable::default();
        assert!(table.get(7).learning_band);
        assert!(!table.get(8).learning_band);
        assert_eq!(table.get(0).duration_ms, 47_000);
        assert_eq!(table.get(8).duration_ms, 34_000 + 3 * 4_500);

        // Learning band saturates at the anchor
        assert_eq!(table.get(3).monster_speed, table.get(7).monster_speed);
        assert!(table.get(8).monster_speed > table.get(7).monster_speed);
    }

    #[test]
    fn test_band_split_is_configurable() {
        let table = LevelTable::new(BandConfig {
            learning_max_notes: 5,
            ..BandConfig::default()
        });
        assert!(table.get(3).learning_band);
        assert!(!table.get(4).learning_band);
        assert!((table.ramp_gain(table.get(4)) - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_spawn_delay_floor() {
        let table = LevelTable::default();
        for level in table.levels() {
            assert!(level.spawn_delay >= 38.0);
        }
    }

    #[test]
    fn test_clamp_level_index() {
        assert_eq!(clamp_level_index(-3.0, 14), 0);
        assert_eq!(clamp_level_index(f64::NAN, 14), 0);
        assert_eq!(clamp_level_index(f64::INFINITY, 14), 0);
        assert_eq!(clamp_level_index(3.9, 14), 3);
        assert_eq!(clamp_level_index(40.0, 14), 14);
    }

    #[test]
    fn test_ramp_ratio_caps() {
        assert_eq!(compute_ramp_ratio(0.0, 1000.0, 0.5), 0.0);
        assert!((compute_ramp_ratio(500.0, 1000.0, 0.5) - 0.25).abs() < 1e-6);
        assert_eq!(compute_ramp_ratio(1000.0, 1000.0, 0.5), 0.5);
        assert_eq!(compute_ramp_ratio(1.0e9, 1000.0, 0.5), 0.5);
        assert_eq!(compute_ramp_ratio(500.0, 0.0, 0.5), 0.0);
        assert_eq!(compute_ramp_ratio(1000.0, 1000.0, 0.3), 0.3);
    }

    #[test]
    fn test_unlocked_note_indices_clamped() {
        assert_eq!(unlocked_note_indices(0), 0..2);
        assert_eq!(unlocked_note_indices(9), 0..9);
        assert_eq!(unlocked_note_indices(40), 0..15);
    }

    #[test]
    fn test_difficulty_ramps_within_level() {
        let table = LevelTable::default();
        let start = table.difficulty_at(9, 0.0);
        let end = table.difficulty_at(9, 1.0e7);
        assert!(end.monster_speed > start.monster_speed);
        assert!(end.projectile_speed > start.projectile_speed);
        assert!(end.fire_rate > start.fire_rate);
        assert!(end.spawn_delay < start.spawn_delay);
        assert!(end.spawn_delay >= MIN_RAMPED_SPAWN_DELAY);
    }
}
