//! High score leaderboard system
//!
//! Persisted in the key/value store, tracks top 10 scores.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStorage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Level id (1-based) reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: i64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "note_siege_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        // Sorted descending by score, ties keep the older entry first
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score so far, 0 when empty
    pub fn best(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }

    /// Load high scores, starting fresh on any failure
    pub fn load(storage: &dyn KeyValueStorage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.entries.sort_by_key(|e| Reverse(e.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring malformed high scores: {e}");
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("High scores unavailable: {e}");
                Self::new()
            }
        }
    }

    /// Save high scores (failures are logged)
    pub fn save(&self, storage: &mut dyn KeyValueStorage) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode high scores: {e}");
                return;
            }
        };
        match storage.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.best(), 0);
    }

    #[test]
    fn test_ranked_insert_and_trim() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.add_score(s * 10, 1, 0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.best(), 120);
        assert_eq!(scores.entries.last().unwrap().score, 30);

        assert_eq!(scores.add_score(25, 1, 0), None);
        assert_eq!(scores.add_score(500, 9, 0), Some(1));
        assert_eq!(scores.add_score(115, 4, 0), Some(3));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut scores = HighScores::new();
        scores.add_score(50, 1, 1);
        assert_eq!(scores.add_score(50, 2, 2), Some(2));
        assert_eq!(scores.entries[0].timestamp, 1);
    }

    #[test]
    fn test_load_save() {
        let mut storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        scores.add_score(140, 3, 1_000);
        scores.save(&mut storage);
        assert_eq!(HighScores::load(&storage), scores);

        storage.set(HighScores::STORAGE_KEY, "[]").unwrap();
        assert!(HighScores::load(&storage).is_empty());
    }

    #[test]
    fn test_load_orders_by_score() {
        let mut storage = MemoryStorage::new();
        let json = r#"{"entries":[
            {"score":30,"level":1,"timestamp":1},
            {"score":90,"level":4,"timestamp":2},
            {"score":30,"level":2,"timestamp":3},
            {"score":60,"level":3,"timestamp":4}
        ]}"#;
        storage.set(HighScores::STORAGE_KEY, json).unwrap();
        let scores = HighScores::load(&storage);
        let order: Vec<(u64, i64)> =
            scores.entries.iter().map(|e| (e.score, e.timestamp)).collect();
        // Equal scores keep their stored order
        assert_eq!(order, vec![(90, 2), (60, 4), (30, 1), (30, 3)]);
    }
}
