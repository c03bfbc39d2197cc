//! Global leaderboard model
//!
//! One best entry per player name, top 10, sorted by score descending. The
//! same record shape is stored remotely and in the local fallback file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    pub coins: u32,
    /// Survival time in seconds, one decimal
    pub time: f64,
    pub jumps: u32,
    /// Local time the run ended (`YYYY-MM-DD HH:MM`)
    pub date: String,
}

impl HighScoreEntry {
    pub fn new(
        name: impl Into<String>,
        score: u64,
        coins: u32,
        time_secs: f64,
        jumps: u32,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            score,
            coins,
            time: (time_secs * 10.0).round() / 10.0,
            jumps,
            date: date.into(),
        }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a normalized leaderboard from raw entries
    pub fn from_entries(entries: impl IntoIterator<Item = HighScoreEntry>) -> Self {
        let mut scores = Self {
            entries: entries.into_iter().collect(),
        };
        scores.normalize();
        scores
    }

    /// Keep the best entry per name, sort descending and cut to the top 10.
    /// On equal scores for one name the entry seen first is kept.
    pub fn normalize(&mut self) {
        let mut best: HashMap<String, usize> = HashMap::new();
        let mut kept: Vec<HighScoreEntry> = Vec::with_capacity(self.entries.len());

        for entry in self.entries.drain(..) {
            match best.get(&entry.name) {
                Some(&i) => {
                    if entry.score > kept[i].score {
                        kept[i] = entry;
                    }
                }
                None => {
                    best.insert(entry.name.clone(), kept.len());
                    kept.push(entry);
                }
            }
        }

        // Stable sort keeps first-seen order among equal scores
        kept.sort_by(|a, b| b.score.cmp(&a.score));
        kept.truncate(MAX_HIGH_SCORES);
        self.entries = kept;
    }

    /// Merge a new entry into the board.
    /// Returns the rank held by that name afterwards (1-indexed), if listed.
    pub fn merge(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let name = entry.name.clone();
        self.entries.push(entry);
        self.normalize();
        self.rank_of(&name)
    }

    /// Copy of the board with `entry` merged in
    pub fn with_entry(&self, entry: HighScoreEntry) -> Self {
        let mut merged = self.clone();
        merged.merge(entry);
        merged
    }

    /// Rank of a player's entry (1-indexed)
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Document stored by the leaderboard backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteRecord {
    pub player_name: String,
    pub personal_highscore: u64,
    pub global_rankings: Vec<HighScoreEntry>,
    pub last_updated: String,
}

/// Last-known leaderboard data held by the session.
///
/// Only ever replaced wholesale from a successful fetch or upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaderboardState {
    pub personal_best: u64,
    pub global: HighScores,
}

impl LeaderboardState {
    pub fn from_record(record: RemoteRecord) -> Self {
        Self {
            personal_best: record.personal_highscore,
            global: HighScores::from_entries(record.global_rankings),
        }
    }

    /// Record to upload for a finished run: the known board with the new
    /// entry merged and the personal best raised if beaten
    pub fn submission(&self, entry: HighScoreEntry) -> RemoteRecord {
        let personal_highscore = self.personal_best.max(entry.score);
        let player_name = entry.name.clone();
        let last_updated = entry.date.clone();
        RemoteRecord {
            player_name,
            personal_highscore,
            global_rankings: self.global.with_entry(entry).entries,
            last_updated,
        }
    }
}
