//! Score accumulation: points, tier counters and combo.

use crate::models::engine::MAX_SCORE;
use crate::models::result::GameResultData;
use crate::models::stats::{HitStats, Judgement};

/// Running score state for one session.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreAccumulator {
    /// Points for a PERFECT, fixed when the session starts.
    pub per_note: u32,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub hit_stats: HitStats,
}

impl ScoreAccumulator {
    /// A chart without notes scores nothing.
    pub fn new(note_count: usize) -> Self {
        let per_note = match u32::try_from(note_count) {
            Ok(0) => 0,
            Ok(count) => MAX_SCORE / count,
            Err(_) => 0,
        };

        Self {
            per_note,
            score: 0,
            combo: 0,
            max_combo: 0,
            hit_stats: HitStats::new(),
        }
    }

    /// Applies one judgement to score, counters and combo.
    pub fn apply(&mut self, judgement: Judgement) {
        self.hit_stats.record(judgement);
        if judgement.is_miss() {
            self.combo = 0;
        } else {
            self.combo += 1;
            self.score += judgement.points(self.per_note);
        }
        self.refresh_max_combo();
    }

    pub fn refresh_max_combo(&mut self) {
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn judged(&self) -> u32 {
        self.hit_stats.total()
    }

    pub fn result(&self) -> GameResultData {
        GameResultData::new(self.score, self.max_combo, &self.hit_stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_note_is_floored() {
        assert_eq!(ScoreAccumulator::new(1).per_note, 1_000_000);
        assert_eq!(ScoreAccumulator::new(3).per_note, 333_333);
        assert_eq!(ScoreAccumulator::new(0).per_note, 0);
    }

    #[test]
    fn all_perfect_clear_keeps_rounding_slack() {
        let mut score = ScoreAccumulator::new(3);
        for _ in 0..3 {
            score.apply(Judgement::Perfect);
        }
        assert_eq!(score.score, 999_999);
        assert_eq!(score.combo, 3);
        assert_eq!(score.max_combo, 3);
    }

    #[test]
    fn miss_resets_combo_but_not_max() {
        let mut score = ScoreAccumulator::new(4);
        score.apply(Judgement::Great);
        score.apply(Judgement::Good);
        score.apply(Judgement::Miss);
        assert_eq!(score.combo, 0);
        assert_eq!(score.max_combo, 2);
        assert_eq!(score.score, 225_000 + 125_000);
        score.apply(Judgement::Perfect);
        assert_eq!(score.combo, 1);
        assert_eq!(score.max_combo, 2);
        assert_eq!(score.judged(), 4);
    }
}
