//! Gameplay state.
//!
//! `GameEngine` owns the note arena, the judgement cursors and the score of
//! one play. It is driven by `logic::session::Session`.

pub mod game;

pub use game::GameEngine;
