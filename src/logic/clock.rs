//! Song clock derived from the audio engine.
//!
//! Frame delivery and audio delivery are scheduled independently, so all
//! timing decisions read one authoritative source: the count of samples the
//! audio thread has handed to the output device.

use crate::logic::session::SessionError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonic time source, in seconds.
pub trait ClockSource {
    fn now_secs(&self) -> f64;
}

/// Clock driven by the playback sample counter.
///
/// The counter counts interleaved samples, so one second is
/// `sample_rate * channels` ticks.
pub struct SampleClock {
    position: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
}

impl SampleClock {
    pub fn new(
        position: Arc<AtomicU64>,
        sample_rate: Arc<AtomicU64>,
        channels: Arc<AtomicU64>,
    ) -> Self {
        Self {
            position,
            sample_rate,
            channels,
        }
    }
}

impl ClockSource for SampleClock {
    fn now_secs(&self) -> f64 {
        let samples = self.position.load(Ordering::Acquire) as f64;
        let sample_rate = self.sample_rate.load(Ordering::Relaxed).max(1) as f64;
        let channels = self.channels.load(Ordering::Relaxed).max(1) as f64;

        samples / (sample_rate * channels)
    }
}

/// Song time relative to a scheduled start instant.
pub struct AudioClock {
    source: Box<dyn ClockSource>,
    /// Clock time (s) at which the song's first sample plays.
    start_at: f64,
}

impl AudioClock {
    /// Fails when the start instant is not a usable clock origin.
    pub fn new(source: Box<dyn ClockSource>, start_at: f64) -> Result<Self, SessionError> {
        if !start_at.is_finite() {
            return Err(SessionError::InvalidClockOrigin(start_at));
        }
        Ok(Self { source, start_at })
    }

    /// Milliseconds since `start_at`; negative during the pre-roll.
    pub fn now_ms(&self) -> f64 {
        (self.source.now_secs() - self.start_at) * 1000.0
    }
}

/// Hand-driven clock for tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ManualClock(std::rc::Rc<std::cell::Cell<f64>>);

#[cfg(test)]
impl ManualClock {
    pub(crate) fn set_secs(&self, secs: f64) {
        self.0.set(secs);
    }

    pub(crate) fn set_ms(&self, ms: f64) {
        self.0.set(ms / 1000.0);
    }
}

#[cfg(test)]
impl ClockSource for ManualClock {
    fn now_secs(&self) -> f64 {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_clock_counts_interleaved_samples() {
        let position = Arc::new(AtomicU64::new(0));
        let clock = SampleClock::new(
            position.clone(),
            Arc::new(AtomicU64::new(48_000)),
            Arc::new(AtomicU64::new(2)),
        );
        position.store(96_000, Ordering::Release);
        assert_eq!(clock.now_secs(), 1.0);
    }

    #[test]
    fn song_time_is_negative_during_pre_roll() {
        let manual = ManualClock::default();
        let clock = AudioClock::new(Box::new(manual.clone()), 0.1).unwrap();
        assert!((clock.now_ms() + 100.0).abs() < 1e-9);
        manual.set_secs(1.1);
        assert!((clock.now_ms() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_undefined_origin() {
        let result = AudioClock::new(Box::new(ManualClock::default()), f64::NAN);
        assert!(matches!(result, Err(SessionError::InvalidClockOrigin(_))));
    }
}
