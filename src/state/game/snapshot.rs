//! Snapshot creation for GameEngine - get_snapshot

use super::GameEngine;
use crate::shared::snapshot::{FlashView, GameplaySnapshot, NoteView};

impl GameEngine {
    /// Captures the state computed by the last `update_notes` call.
    pub fn get_snapshot(&self, song_time_ms: f64) -> GameplaySnapshot {
        let notes = self
            .notes
            .iter()
            .map(|note| NoteView {
                lane: note.lane,
                y: note.position,
                visible: !note.judged && note.visible,
            })
            .collect();

        GameplaySnapshot {
            song_time: song_time_ms,
            lane_count: self.lane_count(),
            notes,
            judge_line_y: self.playfield.judge_line_y(),
            score: self.score.score,
            combo: self.score.combo,
            max_combo: self.score.max_combo,
            hit_stats: self.score.hit_stats.clone(),
            remaining_notes: self.remaining_notes(),
            flash: self.last_hit.map(|flash| FlashView {
                lane: flash.lane,
                judgement: flash.judgement,
                timing_ms: flash.timing_ms,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::chart;
    use super::*;
    use crate::models::engine::PlayfieldConfig;
    use crate::models::stats::Judgement;

    #[test]
    fn judged_notes_are_hidden() {
        let mut engine = GameEngine::new(
            &chart(4, &[(1000.0, 0), (1200.0, 3)]),
            PlayfieldConfig::new(720.0, 600.0),
        );
        engine.update_notes(900.0);
        engine.process_hit(0, 1000.0);
        engine.update_notes(1000.0);

        let snapshot = engine.get_snapshot(1000.0);
        assert_eq!(snapshot.lane_count, 4);
        assert_eq!(snapshot.notes.len(), 2);
        assert!(!snapshot.notes[0].visible);
        assert!(snapshot.notes[1].visible);
        assert_eq!(snapshot.notes[1].lane, 3);
        assert_eq!(snapshot.remaining_notes, 1);
        assert_eq!(snapshot.flash.map(|f| f.judgement), Some(Judgement::Perfect));
    }
}
