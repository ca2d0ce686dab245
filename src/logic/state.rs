//! State owned by the logic thread.
//!
//! `LogicState` holds the loaded chart, the settings and at most one live
//! session. Actions and audio events are applied here between ticks, so the
//! session never needs a lock.

use crate::input::events::GameAction;
use crate::logic::audio::AudioManager;
use crate::logic::clock::AudioClock;
use crate::logic::session::{Session, SessionError, SessionPhase, StartOutcome};
use crate::models::chart::Chart;
use crate::models::engine::PlayfieldConfig;
use crate::models::result::GameResultData;
use crate::models::settings::SettingsState;
use crate::shared::snapshot::RenderState;

pub struct LogicState {
    chart: Chart,
    settings: SettingsState,
    audio: AudioManager,
    session: Option<Session>,
    next_session_id: u64,
    viewport_height: f32,
    /// Why the last session ended abnormally, shown until the next start.
    closed_reason: Option<String>,
}

impl LogicState {
    pub fn new(chart: Chart, settings: SettingsState, audio: AudioManager) -> Self {
        Self {
            viewport_height: settings.window_height as f32,
            chart,
            settings,
            audio,
            session: None,
            next_session_id: 1,
            closed_reason: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn handle_action(&mut self, action: GameAction) {
        match action {
            GameAction::Start => self.start_session(),
            GameAction::Hit { lane } => {
                if let Some(session) = self.session.as_mut() {
                    session.handle_hit(lane);
                }
            }
            GameAction::Back => self.close_session(),
        }
    }

    fn start_session(&mut self) {
        if let Some(session) = &self.session
            && session.phase() != SessionPhase::Finished
        {
            log::debug!("LOGIC: Session {} already active, ignoring start", session.id());
            return;
        }

        let id = self.next_session_id;
        self.next_session_id += 1;

        let playfield = PlayfieldConfig::new(self.viewport_height, self.settings.scroll_speed);
        let mut session = Session::new(id, &self.chart, playfield);
        if let Err(e) = session.request_start() {
            log::error!("LOGIC: {}", e);
            return;
        }

        self.audio.start(
            id,
            &self.settings.audio_path,
            self.settings.pre_roll_ms / 1000.0,
            self.settings.master_volume,
        );
        self.session = Some(session);
        self.closed_reason = None;
        log::info!(
            "LOGIC: Session {} waiting for audio ({} notes)",
            id,
            self.session.as_ref().map_or(0, |s| s.engine().note_count())
        );
    }

    /// Tears down the live session and stops playback.
    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
            self.audio.stop();
        }
    }

    /// Playback is running for `session_id`; install its clock.
    pub fn on_audio_started(&mut self, session_id: u64, start_at_secs: f64, duration_secs: f64) {
        let Some(session) = self.session.as_mut().filter(|s| s.id() == session_id) else {
            log::debug!("LOGIC: Dropping audio start for stale session {}", session_id);
            return;
        };

        let outcome = AudioClock::new(Box::new(self.audio.clock_source()), start_at_secs)
            .and_then(|clock| session.begin(clock, duration_secs));

        match outcome {
            Ok(StartOutcome::Started) => {}
            Ok(StartOutcome::Dropped) => self.audio.stop(),
            Err(e) => self.abort(e),
        }
    }

    pub fn on_audio_failed(&mut self, session_id: u64, reason: String) {
        let Some(session) = self.session.as_mut().filter(|s| s.id() == session_id) else {
            log::debug!("LOGIC: Dropping audio failure for stale session {}", session_id);
            return;
        };
        let err = session.fail(reason);
        self.abort(err);
    }

    /// Ends the live session on a fatal error.
    fn abort(&mut self, err: SessionError) {
        log::error!("LOGIC: {}", err);
        self.close_session();
        self.closed_reason = Some(err.to_string());
    }

    /// One logic tick. Returns the result on the tick the session finishes.
    pub fn update(&mut self) -> Option<GameResultData> {
        let result = self.session.as_mut()?.tick()?;
        self.audio.stop();
        Some(result)
    }

    /// False once the live session has finished. Its result has already
    /// been handed out by `update`, and nothing changes until the next action.
    pub fn wants_frames(&self) -> bool {
        self.session
            .as_ref()
            .is_none_or(|s| s.phase() != SessionPhase::Finished)
    }

    pub fn resize(&mut self, _width: u32, height: u32) {
        self.viewport_height = height as f32;
        if let Some(session) = self.session.as_mut() {
            session.resize(self.viewport_height);
        }
    }

    pub fn shutdown(&mut self) {
        log::info!("LOGIC: Shutting down");
        self.close_session();
    }

    pub fn create_snapshot(&self) -> RenderState {
        match (&self.session, &self.closed_reason) {
            (Some(session), _) => session.render_state(),
            (None, Some(reason)) => RenderState::Closed {
                reason: reason.clone(),
            },
            (None, None) => RenderState::Ready {
                title: self.chart.title.clone(),
            },
        }
    }
}
