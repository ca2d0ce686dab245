//! Hit window timing thresholds.

use super::constants::{GOOD_WINDOW_MS, GREAT_WINDOW_MS, PERFECT_WINDOW_MS};
use crate::models::stats::Judgement;

/// Inclusive upper bounds of each accuracy tier, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
}

impl HitWindow {
    /// The single fixed difficulty: 30 / 60 / 90 ms.
    pub fn new() -> Self {
        Self {
            perfect_ms: PERFECT_WINDOW_MS,
            great_ms: GREAT_WINDOW_MS,
            good_ms: GOOD_WINDOW_MS,
        }
    }

    /// Classifies a signed timing difference (note time minus input time).
    ///
    /// Boundaries are inclusive, so a tie resolves to the better tier.
    pub fn judge(&self, timing_diff_ms: f64) -> Judgement {
        let abs_diff = timing_diff_ms.abs();

        if abs_diff <= self.perfect_ms {
            Judgement::Perfect
        } else if abs_diff <= self.great_ms {
            Judgement::Great
        } else if abs_diff <= self.good_ms {
            Judgement::Good
        } else {
            Judgement::Miss
        }
    }

    /// True once the latest acceptable input instant for a note has passed.
    pub fn is_expired(&self, note_time_ms: f64, song_time_ms: f64) -> bool {
        song_time_ms - note_time_ms > self.good_ms
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}
