//! Playfield geometry: where a note sits on screen at a given song time.

use super::constants::{
    CULL_MARGIN_PX, DEFAULT_SCROLL_SPEED, JUDGE_LINE_OFFSET_PX, NOTE_HEIGHT_PX,
};

/// Configuration for the vertical scrolling playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayfieldConfig {
    /// Pixels travelled per second of song time.
    pub scroll_speed: f32,
    pub viewport_height: f32,
    pub judge_line_offset_pixels: f32,
    pub note_height_pixels: f32,
    pub cull_margin_pixels: f32,
}

impl PlayfieldConfig {
    pub fn new(viewport_height: f32, scroll_speed: f32) -> Self {
        Self {
            scroll_speed,
            viewport_height,
            judge_line_offset_pixels: JUDGE_LINE_OFFSET_PX,
            note_height_pixels: NOTE_HEIGHT_PX,
            cull_margin_pixels: CULL_MARGIN_PX,
        }
    }

    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
    }

    /// Y coordinate of the judgement line.
    pub fn judge_line_y(&self) -> f32 {
        self.viewport_height - self.judge_line_offset_pixels
    }

    /// Y of a note's top edge, so that its center crosses the line on time.
    pub fn note_y(&self, note_time_ms: f64, song_time_ms: f64) -> f32 {
        let seconds_until_hit = ((note_time_ms - song_time_ms) / 1000.0) as f32;
        self.judge_line_y()
            - seconds_until_hit * self.scroll_speed
            - self.note_height_pixels / 2.0
    }

    pub fn is_on_screen(&self, y: f32) -> bool {
        y > -self.cull_margin_pixels && y < self.viewport_height + self.cull_margin_pixels
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self::new(720.0, DEFAULT_SCROLL_SPEED)
    }
}
