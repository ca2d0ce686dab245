//! Note processing - update_notes, sweep_misses

use super::GameEngine;
use crate::models::engine::HIT_FLASH_MS;
use crate::models::stats::Judgement;

impl GameEngine {
    /// Advances note state for one frame.
    ///
    /// Expired notes are auto-missed first, then every unjudged note gets
    /// its screen position. Returns the number of notes auto-missed.
    pub fn update_notes(&mut self, song_time_ms: f64) -> usize {
        let missed = self.sweep_misses(song_time_ms);

        for note in &mut self.notes {
            if note.judged {
                note.visible = false;
                continue;
            }
            let y = self.playfield.note_y(note.time_ms, song_time_ms);
            note.position = y;
            note.visible = self.playfield.is_on_screen(y);
        }

        if self
            .last_hit
            .is_some_and(|flash| song_time_ms - flash.at_ms > HIT_FLASH_MS)
        {
            self.last_hit = None;
        }

        self.score.refresh_max_combo();
        missed
    }

    /// Judges as MISS every unjudged note whose GOOD window has elapsed.
    fn sweep_misses(&mut self, song_time_ms: f64) -> usize {
        let mut missed = 0;

        for lane in 0..self.lanes.len() {
            while let Some(idx) = self.first_pending(lane) {
                if !self.hit_window.is_expired(self.notes[idx].time_ms, song_time_ms) {
                    break;
                }
                self.commit(idx, Judgement::Miss);
                self.cursors[lane] += 1;
                missed += 1;
            }
        }

        if missed > 0 {
            log::debug!("ENGINE: {} note(s) auto-missed at {:.0} ms", missed, song_time_ms);
        }
        missed
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::chart;
    use super::*;
    use crate::models::engine::PlayfieldConfig;

    fn engine(notes: &[(f64, usize)]) -> GameEngine {
        GameEngine::new(&chart(4, notes), PlayfieldConfig::new(720.0, 600.0))
    }

    #[test]
    fn untouched_notes_are_auto_missed() {
        let mut engine = engine(&[(1000.0, 0), (1200.0, 0)]);
        assert_eq!(engine.update_notes(1090.0), 0);
        assert_eq!(engine.update_notes(1291.0), 2);
        assert!(engine.is_all_judged());
        assert_eq!(engine.score.hit_stats.miss, 2);
        assert_eq!(engine.score.score, 0);
        assert_eq!(engine.score.max_combo, 0);
    }

    #[test]
    fn sweep_resets_combo() {
        let mut engine = engine(&[(1000.0, 0), (1000.0, 1), (1500.0, 2)]);
        engine.process_hit(0, 1000.0);
        engine.process_hit(1, 1000.0);
        assert_eq!(engine.score.combo, 2);
        engine.update_notes(1600.0);
        assert_eq!(engine.score.combo, 0);
        assert_eq!(engine.score.max_combo, 2);
        assert_eq!(engine.score.hit_stats.miss, 1);
    }

    #[test]
    fn input_after_sweep_moves_to_next_note() {
        let mut engine = engine(&[(1000.0, 0), (1500.0, 0)]);
        engine.update_notes(1100.0);
        assert!(engine.notes[0].judged);
        assert_eq!(engine.process_hit(0, 1500.0), Some(Judgement::Perfect));
        assert_eq!(engine.score.hit_stats.miss, 1);
        assert_eq!(engine.score.hit_stats.perfect, 1);
    }

    #[test]
    fn positions_follow_song_time() {
        let mut engine = engine(&[(1000.0, 0), (5000.0, 1)]);
        engine.update_notes(0.0);
        assert_eq!(engine.notes[0].position, 580.0 - 600.0 - 8.0);
        assert!(engine.notes[0].visible);
        // Four seconds away: far above the viewport.
        assert!(!engine.notes[1].visible);

        engine.process_hit(0, 1000.0);
        engine.update_notes(1000.0);
        assert!(!engine.notes[0].visible);
    }

    #[test]
    fn hit_flash_expires() {
        let mut engine = engine(&[(1000.0, 0), (3000.0, 0)]);
        engine.process_hit(0, 1000.0);
        engine.update_notes(1050.0);
        assert!(engine.last_hit.is_some());
        engine.update_notes(1061.0);
        assert!(engine.last_hit.is_none());
    }
}
