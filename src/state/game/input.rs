//! Input handling for GameEngine - process_hit

use super::{GameEngine, HitFlash};
use crate::models::stats::Judgement;

impl GameEngine {
    /// Judges a key press on `lane` at `song_time_ms`.
    ///
    /// Matching is FIFO per lane: the earliest unjudged note of the lane is
    /// judged, even when a later note is closer in time. Presses on unknown
    /// lanes or on lanes with nothing left are ignored and return `None`.
    pub fn process_hit(&mut self, lane: usize, song_time_ms: f64) -> Option<Judgement> {
        let idx = self.first_pending(lane)?;

        let timing_ms = self.notes[idx].delta(song_time_ms);
        let judgement = self.hit_window.judge(timing_ms);

        self.commit(idx, judgement);
        self.cursors[lane] += 1;
        self.last_hit = Some(HitFlash {
            lane,
            judgement,
            timing_ms,
            at_ms: song_time_ms,
        });

        log::debug!(
            "ENGINE: note #{} lane {} {} ({:+.1} ms), combo {}",
            self.notes[idx].chart_index,
            lane,
            judgement,
            timing_ms,
            self.score.combo
        );
        Some(judgement)
    }

    /// Arena index of the first unjudged note in `lane`, advancing the
    /// cursor over notes judged by the sweep.
    pub(crate) fn first_pending(&mut self, lane: usize) -> Option<usize> {
        let queue = self.lanes.get(lane)?;
        let cursor = &mut self.cursors[lane];

        while let Some(&idx) = queue.get(*cursor) {
            if !self.notes[idx].judged {
                return Some(idx);
            }
            *cursor += 1;
        }
        None
    }
}
