//! Core gameplay engine for tap judgement.
//!
//! The `GameEngine` owns everything that changes while a chart is played:
//! - the note arena and per-lane cursors
//! - hit judgement and the auto-miss sweep
//! - score and combo tracking
//!
//! It never reads a clock itself. Every operation takes the current song
//! time, which keeps judgement deterministic and independent of frame rate.

mod input;
mod notes;
mod score;
mod snapshot;

pub use score::ScoreAccumulator;

use crate::models::chart::Chart;
use crate::models::engine::{HitWindow, NoteRuntime, PlayfieldConfig};
use crate::models::result::GameResultData;
use crate::models::stats::Judgement;

/// Transient acknowledgement of the latest judgement, for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitFlash {
    pub lane: usize,
    pub judgement: Judgement,
    /// Note time minus input time (ms). Positive means early.
    pub timing_ms: f64,
    /// Song time of the judgement.
    pub at_ms: f64,
}

/// Main gameplay engine handling note matching, scoring and note positions.
pub struct GameEngine {
    /// All notes, sorted by effective time.
    pub notes: Vec<NoteRuntime>,
    /// Per lane, the arena indices of its notes in time order.
    lanes: Vec<Vec<usize>>,
    /// Per lane, the position in `lanes` of the first unjudged note.
    cursors: Vec<usize>,
    pub score: ScoreAccumulator,
    pub hit_window: HitWindow,
    pub playfield: PlayfieldConfig,
    pub last_hit: Option<HitFlash>,
}

impl GameEngine {
    /// Creates the runtime state for a validated chart.
    pub fn new(chart: &Chart, playfield: PlayfieldConfig) -> Self {
        let notes = NoteRuntime::from_chart(chart);

        let mut lanes = vec![Vec::new(); chart.lane_count];
        for (idx, note) in notes.iter().enumerate() {
            lanes[note.lane].push(idx);
        }

        Self {
            score: ScoreAccumulator::new(notes.len()),
            notes,
            cursors: vec![0; lanes.len()],
            lanes,
            hit_window: HitWindow::new(),
            playfield,
            last_hit: None,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Number of notes not yet judged.
    pub fn remaining_notes(&self) -> usize {
        self.notes.len() - self.score.judged() as usize
    }

    pub fn is_all_judged(&self) -> bool {
        self.remaining_notes() == 0
    }

    /// Builds the result payload from the current score state.
    pub fn result(&self) -> GameResultData {
        self.score.result()
    }

    /// Marks a note judged and applies the judgement. Callers guarantee the
    /// note was unjudged.
    fn commit(&mut self, idx: usize, judgement: Judgement) {
        debug_assert!(!self.notes[idx].judged, "note {idx} judged twice");
        let note = &mut self.notes[idx];
        note.judged = true;
        note.visible = false;
        self.score.apply(judgement);
    }
}
