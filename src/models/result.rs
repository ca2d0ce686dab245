//! Final result of a play session.

use crate::models::stats::HitStats;

/// Result payload emitted once when a session finishes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameResultData {
    pub score: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    pub max_combo: u32,
}

impl GameResultData {
    pub fn new(score: u32, max_combo: u32, stats: &HitStats) -> Self {
        Self {
            score,
            perfect: stats.perfect,
            great: stats.great,
            good: stats.good,
            miss: stats.miss,
            max_combo,
        }
    }
}

impl std::fmt::Display for GameResultData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Score {} | Max Combo {} | PERFECT {} GREAT {} GOOD {} MISS {}",
            self.score, self.max_combo, self.perfect, self.great, self.good, self.miss
        )
    }
}
