//! Static note table and clef handling
//!
//! Two octaves of white keys (C4..C6). Staff positions are measured in
//! line/space steps from the treble-clef bottom line (E4 = 0).

use serde::{Deserialize, Serialize};

/// A playable note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub name: &'static str,
    /// Pitch in Hz
    pub frequency: f32,
    /// Treble-clef staff position (rendering only)
    pub staff_position: i32,
    /// Keyboard key that answers this note
    pub key: char,
}

pub const NOTE_COUNT: usize = 15;

pub const NOTES: [Note; NOTE_COUNT] = [
    Note { name: "C4", frequency: 261.63, staff_position: -2, key: 'q' },
    Note { name: "D4", frequency: 293.66, staff_position: -1, key: 'w' },
    Note { name: "E4", frequency: 329.63, staff_position: 0, key: 'e' },
    Note { name: "F4", frequency: 349.23, staff_position: 1, key: 'r' },
    Note { name: "G4", frequency: 392.00, staff_position: 2, key: 't' },
    Note { name: "A4", frequency: 440.00, staff_position: 3, key: 'y' },
    Note { name: "B4", frequency: 493.88, staff_position: 4, key: 'u' },
    Note { name: "C5", frequency: 523.25, staff_position: 5, key: 'i' },
    Note { name: "D5", frequency: 587.33, staff_position: 6, key: 'o' },
    Note { name: "E5", frequency: 659.25, staff_position: 7, key: 'p' },
    Note { name: "F5", frequency: 698.46, staff_position: 8, key: 'a' },
    Note { name: "G5", frequency: 783.99, staff_position: 9, key: 's' },
    Note { name: "A5", frequency: 880.00, staff_position: 10, key: 'd' },
    Note { name: "B5", frequency: 987.77, staff_position: 11, key: 'f' },
    Note { name: "C6", frequency: 1046.50, staff_position: 12, key: 'g' },
];

/// Map a pressed key to its note index (case-insensitive)
pub fn index_for_key(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    NOTES.iter().position(|n| n.key == key)
}

/// Notation clef used to display the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    #[default]
    Treble,
    Bass,
    Alto,
    Tenor,
}

impl Clef {
    pub const ALL: [Clef; 4] = [Clef::Treble, Clef::Bass, Clef::Alto, Clef::Tenor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
            Clef::Alto => "alto",
            Clef::Tenor => "tenor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "treble" | "g" => Some(Clef::Treble),
            "bass" | "f" => Some(Clef::Bass),
            "alto" => Some(Clef::Alto),
            "tenor" => Some(Clef::Tenor),
            _ => None,
        }
    }

    /// Steps between this clef's bottom line and the treble bottom line (E4)
    fn staff_offset(&self) -> i32 {
        match self {
            Clef::Treble => 0,
            // Bottom line G2
            Clef::Bass => 12,
            // Bottom line F3
            Clef::Alto => 6,
            // Bottom line D3
            Clef::Tenor => 8,
        }
    }

    /// Staff position of a note under this clef
    pub fn staff_position(&self, note: &Note) -> i32 {
        note.staff_position + self.staff_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ascending() {
        for pair in NOTES.windows(2) {
            assert!(pair[0].frequency < pair[1].frequency);
            assert_eq!(pair[0].staff_position + 1, pair[1].staff_position);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, n) in NOTES.iter().enumerate() {
            assert_eq!(index_for_key(n.key), Some(i));
        }
        assert_eq!(index_for_key('Q'), Some(0));
        assert_eq!(index_for_key('z'), None);
    }

    #[test]
    fn test_clef_parse_and_offsets() {
        assert_eq!(Clef::parse("Bass"), Some(Clef::Bass));
        assert_eq!(Clef::parse("banjo"), None);
        // Middle C sits on the first ledger line above the bass staff
        assert_eq!(Clef::Bass.staff_position(&NOTES[0]), 10);
        // ...and on the middle line of the alto staff
        assert_eq!(Clef::Alto.staff_position(&NOTES[0]), 4);
        for clef in Clef::ALL {
            assert_eq!(Clef::parse(clef.as_str()), Some(clef));
        }
    }
}
