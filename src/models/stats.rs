//! Hit statistics and judgement types.
//!
//! This module defines the accuracy tiers used for scoring and the
//! per-tier counters accumulated over a play session.

/// Accuracy tiers from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Judgement {
    /// Within the tightest window.
    Perfect,
    /// Slightly off.
    Great,
    /// Acceptable timing.
    Good,
    /// Outside every window, or never hit.
    Miss,
}

impl Judgement {
    /// Points awarded for this tier given the per-note value.
    ///
    /// Fractions are floored with integer arithmetic.
    pub fn points(self, per_note: u32) -> u32 {
        match self {
            Judgement::Perfect => per_note,
            Judgement::Great => per_note * 9 / 10,
            Judgement::Good => per_note / 2,
            Judgement::Miss => 0,
        }
    }

    pub fn is_miss(self) -> bool {
        self == Judgement::Miss
    }

    pub fn label(self) -> &'static str {
        match self {
            Judgement::Perfect => "PERFECT",
            Judgement::Great => "GREAT",
            Judgement::Good => "GOOD",
            Judgement::Miss => "MISS",
        }
    }
}

impl std::fmt::Display for Judgement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HitStats {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Good => self.good += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Number of judged notes.
    pub fn total(&self) -> u32 {
        self.perfect + self.great + self.good + self.miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_floored() {
        assert_eq!(Judgement::Perfect.points(333_333), 333_333);
        assert_eq!(Judgement::Great.points(333_333), 299_999);
        assert_eq!(Judgement::Good.points(333_333), 166_666);
        assert_eq!(Judgement::Miss.points(333_333), 0);
    }

    #[test]
    fn record_counts_each_tier() {
        let mut stats = HitStats::new();
        for j in [Judgement::Perfect, Judgement::Great, Judgement::Miss, Judgement::Miss] {
            stats.record(j);
        }
        assert_eq!(stats.perfect, 1);
        assert_eq!(stats.great, 1);
        assert_eq!(stats.good, 0);
        assert_eq!(stats.miss, 2);
        assert_eq!(stats.total(), 4);
    }
}
