//! High score leaderboard
//!
//! Tracks the top 10 finished sessions and can be handed to the engine as
//! its game-over listener. Persisted as a JSON file by the host.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::engine::{GameOverListener, GameOverReport};
use crate::error::Result;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Projectiles fired during the session
    pub shots: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies, returning the rank achieved
    pub fn add_score(&mut self, score: u64, shots: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            shots,
            timestamp,
        };

        // Sorted descending; ties keep the older entry first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a leaderboard file; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let scores: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl GameOverListener for HighScores {
    fn game_over(&mut self, report: &GameOverReport) {
        match self.add_score(report.score, report.shots, now_ms()) {
            Some(rank) => log::info!("New high score {} (rank {})", report.score, rank),
            None => log::debug!("Score {} did not place", report.score),
        }
    }
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_entries_stay_sorted_and_capped() {
        let mut scores = HighScores::new();
        for s in 1..=15u64 {
            scores.add_score(s * 3, s as u32, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(45));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!scores.qualifies(18));
        assert_eq!(scores.potential_rank(19), Some(10));
    }

    #[test]
    fn test_add_returns_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(10, 5, 0.0), Some(1));
        assert_eq!(scores.add_score(20, 5, 0.0), Some(1));
        assert_eq!(scores.add_score(15, 5, 0.0), Some(2));
        assert_eq!(scores.add_score(15, 5, 0.0), Some(3));
    }

    #[test]
    fn test_listener_records_report() {
        let mut scores = HighScores::new();
        scores.game_over(&GameOverReport {
            score: 12,
            shots: 30,
            ticks: 900,
            seed: 1,
        });
        assert_eq!(scores.top_score(), Some(12));
        assert_eq!(scores.entries[0].shots, 30);
        assert!(scores.entries[0].timestamp > 0.0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "cluster_shot_scores_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        assert!(HighScores::load(&path).expect("missing file").is_empty());

        let mut scores = HighScores::new();
        scores.add_score(42, 7, 1.0);
        scores.save(&path).expect("save");
        let loaded = HighScores::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, scores);
    }
}
