//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of game state sent from the logic thread
//! to the render thread. This decouples game logic from rendering.
//! The window only reads a summary; per-note geometry is there for graphical
//! front ends.

#![allow(dead_code)]

use crate::models::result::GameResultData;
use crate::models::stats::{HitStats, Judgement};

/// High-level render state representing the current session phase.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderState {
    /// Chart loaded, waiting for the player to start.
    Ready { title: String },
    /// Start requested, waiting for the audio engine.
    Loading { title: String },
    /// Active gameplay.
    InGame(GameplaySnapshot),
    /// Post-game result.
    Result(GameResultData),
    /// The session could not start or was closed.
    Closed { reason: String },
}

/// Screen placement of one note for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteView {
    pub lane: usize,
    /// Top edge in pixels from the top of the viewport.
    pub y: f32,
    /// False for judged notes and for notes outside the viewport.
    pub visible: bool,
}

/// Hit acknowledgement shown briefly after a judgement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashView {
    pub lane: usize,
    pub judgement: Judgement,
    /// Note time minus input time in ms.
    pub timing_ms: f64,
}

/// Snapshot of gameplay state for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct GameplaySnapshot {
    /// Current song time in milliseconds.
    pub song_time: f64,
    pub lane_count: usize,
    /// One entry per note, in time order.
    pub notes: Vec<NoteView>,
    pub judge_line_y: f32,

    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub hit_stats: HitStats,
    pub remaining_notes: usize,

    pub flash: Option<FlashView>,
}
