//! Session controller: drives one play of a chart from start to result.
//!
//! Phases only move forward: `Ready -> Playing -> Finished`. Starting is
//! asynchronous: `request_start` asks the audio engine for playback, and
//! `begin` is the continuation that arrives once the clock origin is known.
//! A session that has been torn down ignores that continuation and every
//! later input or tick.

use crate::logic::clock::AudioClock;
use crate::models::chart::Chart;
use crate::models::engine::PlayfieldConfig;
use crate::models::result::GameResultData;
use crate::models::stats::Judgement;
use crate::shared::snapshot::RenderState;
use crate::state::GameEngine;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {action} while the session is {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("audio playback could not start: {0}")]
    AudioStart(String),
    #[error("clock origin {0} is not a valid instant")]
    InvalidClockOrigin(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Ready,
    Playing,
    Finished,
}

/// What happened to a start continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The session was torn down before audio became ready.
    Dropped,
}

pub struct Session {
    id: u64,
    title: String,
    phase: SessionPhase,
    engine: GameEngine,
    clock: Option<AudioClock>,
    /// Length of the playable buffer (ms).
    duration_ms: f64,
    start_requested: bool,
    torn_down: bool,
}

impl Session {
    pub fn new(id: u64, chart: &Chart, playfield: PlayfieldConfig) -> Self {
        Self {
            id,
            title: chart.title.clone(),
            phase: SessionPhase::Ready,
            engine: GameEngine::new(chart, playfield),
            clock: None,
            duration_ms: 0.0,
            start_requested: false,
            torn_down: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Marks the session as waiting for audio. Only valid once, while ready.
    pub fn request_start(&mut self) -> Result<(), SessionError> {
        if self.torn_down || self.phase != SessionPhase::Ready || self.start_requested {
            return Err(SessionError::InvalidTransition {
                action: "request start",
                phase: self.phase,
            });
        }
        self.start_requested = true;
        Ok(())
    }

    /// Audio is playing: install the clock and enter `Playing`.
    pub fn begin(&mut self, clock: AudioClock, duration_secs: f64) -> Result<StartOutcome, SessionError> {
        if self.torn_down {
            log::debug!("LOGIC: Session {} already closed, ignoring audio start", self.id);
            return Ok(StartOutcome::Dropped);
        }
        if self.phase != SessionPhase::Ready || !self.start_requested {
            return Err(SessionError::InvalidTransition {
                action: "begin playback",
                phase: self.phase,
            });
        }

        self.duration_ms = duration_secs.max(0.0) * 1000.0;
        self.clock = Some(clock);
        self.phase = SessionPhase::Playing;
        log::info!(
            "LOGIC: Session {} playing '{}' ({} notes, {:.1}s of audio)",
            self.id,
            self.title,
            self.engine.note_count(),
            duration_secs
        );
        Ok(StartOutcome::Started)
    }

    /// The audio engine refused to start. The session never plays.
    pub fn fail(&mut self, reason: String) -> SessionError {
        self.teardown();
        SessionError::AudioStart(reason)
    }

    /// Current song time, if the clock is running.
    pub fn song_time(&self) -> Option<f64> {
        self.clock.as_ref().map(AudioClock::now_ms)
    }

    /// Judges a key press on `lane`. Ignored outside `Playing`.
    pub fn handle_hit(&mut self, lane: usize) -> Option<Judgement> {
        if self.torn_down || self.phase != SessionPhase::Playing {
            return None;
        }
        let song_time = self.song_time()?;
        self.engine.process_hit(lane, song_time)
    }

    /// Runs one frame. Returns the result on the frame the session finishes.
    pub fn tick(&mut self) -> Option<GameResultData> {
        if self.torn_down || self.phase != SessionPhase::Playing {
            return None;
        }
        let song_time = self.song_time()?;

        self.engine.update_notes(song_time);

        if self.engine.is_all_judged() && song_time >= self.duration_ms {
            self.phase = SessionPhase::Finished;
            let result = self.engine.result();
            log::info!("LOGIC: Session {} finished: {}", self.id, result);
            return Some(result);
        }
        None
    }

    pub fn resize(&mut self, viewport_height: f32) {
        self.engine.playfield.resize(viewport_height);
    }

    /// Stops all further processing. Idempotent.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::info!("LOGIC: Session {} torn down in phase {:?}", self.id, self.phase);
        }
        self.torn_down = true;
        self.clock = None;
    }

    pub fn render_state(&self) -> RenderState {
        if self.is_torn_down() {
            return RenderState::Closed {
                reason: "session closed".to_string(),
            };
        }
        match self.phase {
            SessionPhase::Ready if self.start_requested => RenderState::Loading {
                title: self.title.clone(),
            },
            SessionPhase::Ready => RenderState::Ready {
                title: self.title.clone(),
            },
            SessionPhase::Playing => {
                let song_time = self.song_time().unwrap_or_default();
                RenderState::InGame(self.engine.get_snapshot(song_time))
            }
            SessionPhase::Finished => RenderState::Result(self.engine.result()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::ManualClock;
    use crate::models::chart::ChartNote;
    use crate::models::engine::MAX_SCORE;

    fn chart(notes: &[(f64, usize)]) -> Chart {
        Chart {
            title: "session".to_string(),
            bpm: 120.0,
            offset_ms: 0.0,
            lane_count: 4,
            notes: notes.iter().map(|&(t, lane)| ChartNote::tap(t, lane)).collect(),
        }
    }

    /// A playing session with a 100 ms pre-roll, clock at the start of the pre-roll.
    fn playing(notes: &[(f64, usize)], duration_secs: f64) -> (Session, ManualClock) {
        let mut session = Session::new(1, &chart(notes), PlayfieldConfig::default());
        let manual = ManualClock::default();
        session.request_start().unwrap();
        let clock = AudioClock::new(Box::new(manual.clone()), 0.1).unwrap();
        assert_eq!(session.begin(clock, duration_secs).unwrap(), StartOutcome::Started);
        (session, manual)
    }

    /// Sets the song time (ms after the pre-roll).
    fn at(manual: &ManualClock, song_ms: f64) {
        manual.set_ms(song_ms + 100.0);
    }

    #[test]
    fn input_is_ignored_before_playing() {
        let mut session = Session::new(1, &chart(&[(1000.0, 0)]), PlayfieldConfig::default());
        assert_eq!(session.handle_hit(0), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn begin_requires_a_start_request() {
        let mut session = Session::new(1, &chart(&[]), PlayfieldConfig::default());
        let clock = AudioClock::new(Box::new(ManualClock::default()), 0.0).unwrap();
        assert!(matches!(
            session.begin(clock, 1.0),
            Err(SessionError::InvalidTransition { .. })
        ));
        session.request_start().unwrap();
        assert!(session.request_start().is_err());
    }

    #[test]
    fn perfect_single_note_scenario() {
        let (mut session, manual) = playing(&[(1000.0, 0)], 2.0);
        at(&manual, 1005.0);
        assert_eq!(session.handle_hit(0), Some(Judgement::Perfect));
        assert_eq!(session.tick(), None);

        at(&manual, 2001.0);
        let result = session.tick().unwrap();
        assert_eq!(result.score, MAX_SCORE);
        assert_eq!(result.perfect, 1);
        assert_eq!(result.max_combo, 1);
        assert_eq!(session.phase(), SessionPhase::Finished);
    }

    #[test]
    fn no_input_scenario_misses_everything() {
        let (mut session, manual) = playing(&[(1000.0, 0), (1200.0, 0)], 1.0);
        at(&manual, 1280.0);
        assert_eq!(session.tick(), None);
        at(&manual, 1291.0);
        let result = session.tick().unwrap();
        assert_eq!(result.miss, 2);
        assert_eq!(result.score, 0);
        assert_eq!(result.max_combo, 0);
    }

    #[test]
    fn waits_for_audio_after_last_judgement() {
        let (mut session, manual) = playing(&[(500.0, 1)], 3.0);
        at(&manual, 500.0);
        session.handle_hit(1);
        at(&manual, 2999.0);
        assert_eq!(session.tick(), None);
        at(&manual, 3001.0);
        assert!(session.tick().is_some());
    }

    #[test]
    fn result_is_emitted_once() {
        let (mut session, manual) = playing(&[], 0.5);
        at(&manual, 600.0);
        assert!(session.tick().is_some());
        assert_eq!(session.tick(), None);
        assert_eq!(session.handle_hit(0), None);
    }

    #[test]
    fn empty_chart_finishes_with_zero_score() {
        let (mut session, manual) = playing(&[], 10.0);
        at(&manual, 5000.0);
        assert_eq!(session.tick(), None);
        at(&manual, 10_001.0);
        let result = session.tick().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.miss, 0);
    }

    #[test]
    fn start_continuation_after_teardown_is_dropped() {
        let mut session = Session::new(3, &chart(&[(1000.0, 0)]), PlayfieldConfig::default());
        session.request_start().unwrap();
        session.teardown();
        let clock = AudioClock::new(Box::new(ManualClock::default()), 0.1).unwrap();
        assert_eq!(session.begin(clock, 1.0).unwrap(), StartOutcome::Dropped);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.song_time(), None);
    }

    #[test]
    fn teardown_stops_judgement_and_ticks() {
        let (mut session, manual) = playing(&[(1000.0, 0)], 1.0);
        session.teardown();
        at(&manual, 1000.0);
        assert_eq!(session.handle_hit(0), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.engine().remaining_notes(), 1);
        assert!(matches!(session.render_state(), RenderState::Closed { .. }));
    }

    #[test]
    fn audio_failure_is_fatal() {
        let mut session = Session::new(1, &chart(&[(1000.0, 0)]), PlayfieldConfig::default());
        session.request_start().unwrap();
        let err = session.fail("no output device".to_string());
        assert!(matches!(err, SessionError::AudioStart(_)));
        assert!(session.is_torn_down());
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn render_state_follows_phase() {
        let mut session = Session::new(1, &chart(&[(1000.0, 0)]), PlayfieldConfig::default());
        assert!(matches!(session.render_state(), RenderState::Ready { .. }));
        session.request_start().unwrap();
        assert!(matches!(session.render_state(), RenderState::Loading { .. }));
    }
}
