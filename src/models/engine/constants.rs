//! Gameplay constants shared by the engine and the playfield.

/// Score reached by a chart cleared entirely with PERFECT (before rounding).
pub const MAX_SCORE: u32 = 1_000_000;

/// Upper bound of the PERFECT window, inclusive (ms).
pub const PERFECT_WINDOW_MS: f64 = 30.0;
/// Upper bound of the GREAT window, inclusive (ms).
pub const GREAT_WINDOW_MS: f64 = 60.0;
/// Upper bound of the GOOD window, inclusive (ms). Notes older than this are auto-missed.
pub const GOOD_WINDOW_MS: f64 = 90.0;

/// Silence scheduled before the song so playback starts on an exact clock instant.
pub const DEFAULT_PRE_ROLL_MS: f64 = 100.0;

/// How long a hit flash stays visible, in song time (ms).
pub const HIT_FLASH_MS: f64 = 60.0;

/// Default scroll speed in pixels per second.
pub const DEFAULT_SCROLL_SPEED: f32 = 600.0;
/// Distance between the bottom of the viewport and the judgement line.
pub const JUDGE_LINE_OFFSET_PX: f32 = 140.0;
pub const NOTE_HEIGHT_PX: f32 = 16.0;
/// Notes further than this outside the viewport are culled.
pub const CULL_MARGIN_PX: f32 = 50.0;
