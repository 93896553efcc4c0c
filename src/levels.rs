//! Level content: the spawn sequences each game mode feeds the engine
//!
//! The simulation treats values as opaque strings; everything here is just
//! the ordered content a level hands to `Playfield::enqueue_spawns`.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Letters are dispensed to the player in groups of this many
pub const GROUP_SIZE: usize = 5;

/// The playable level kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    Alphabet,
    LowerCase,
    Numbers,
    Shapes,
    Colors,
}

impl LevelKind {
    pub const ALL: [LevelKind; 5] = [
        LevelKind::Alphabet,
        LevelKind::LowerCase,
        LevelKind::Numbers,
        LevelKind::Shapes,
        LevelKind::Colors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelKind::Alphabet => "alphabet",
            LevelKind::LowerCase => "clcase",
            LevelKind::Numbers => "numbers",
            LevelKind::Shapes => "shapes",
            LevelKind::Colors => "colors",
        }
    }

    /// The full ordered content sequence for this level kind
    pub fn sequence(&self) -> Vec<String> {
        match self {
            LevelKind::Alphabet => ('A'..='Z').map(String::from).collect(),
            LevelKind::LowerCase => ('a'..='z').map(String::from).collect(),
            LevelKind::Numbers => (1..=10).map(|n| n.to_string()).collect(),
            LevelKind::Shapes => ["Circle", "Square", "Triangle", "Rectangle", "Pentagon"]
                .map(String::from)
                .to_vec(),
            LevelKind::Colors => ["Red", "Blue", "Green", "Yellow", "Purple"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// The sequence split into dispensing groups
    pub fn groups(&self) -> Vec<Vec<String>> {
        self.sequence()
            .chunks(GROUP_SIZE)
            .map(|c| c.to_vec())
            .collect()
    }

    /// A shuffled copy of the sequence, for scrambled dispensing
    pub fn scrambled<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        let mut values = self.sequence();
        values.shuffle(rng);
        values
    }
}

/// Difficulty presets controlling the spawn cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Frames between spawns
    pub fn spawn_interval(&self) -> u32 {
        match self {
            Difficulty::Easy => 90,
            Difficulty::Medium => 60,
            Difficulty::Hard => 40,
        }
    }
}
