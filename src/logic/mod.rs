//! Logic thread module for session management and updates.
//!
//! This module contains the main loop that runs at a fixed tick rate
//! and coordinates between input, audio, and rendering subsystems.

pub mod audio;
pub mod audio_thread;
pub mod clock;
pub mod session;
pub mod state;

use crate::logic::audio::AudioManager;
use crate::logic::state::LogicState;
use crate::models::chart::Chart;
use crate::models::settings::SettingsState;
use crate::shared::snapshot::RenderState;
use crate::system::bus::{AudioEvent, SystemBus, SystemEvent};
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the logic thread.
const TPS: u64 = 200;

const RESULT_SEND_TIMEOUT: Duration = Duration::from_millis(500);

/// Spawns the logic thread that owns the session.
///
/// Each iteration:
/// 1. Applies input actions from the input thread
/// 2. Applies audio events (start continuations, failures)
/// 3. Handles system events (resize, quit)
/// 4. Ticks the session at a fixed rate, forwarding the result once
/// 5. Sends a render snapshot to the main thread while the session is live
pub fn start_thread(bus: SystemBus, chart: Chart, settings: SettingsState) -> std::io::Result<()> {
    audio_thread::start_audio_thread(bus.clone())?;

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let audio = AudioManager::new(&bus);
            let mut state = LogicState::new(chart, settings, audio);
            let _ = bus.render_tx.try_send(state.create_snapshot());

            let mut accumulator = Duration::new(0, 0);
            let mut last_time = Instant::now();
            let target_dt = Duration::from_secs_f64(1.0 / TPS as f64);

            loop {
                // 1. Process input actions
                while let Ok(action) = bus.action_rx.try_recv() {
                    state.handle_action(action);
                }

                // 2. Audio continuations
                while let Ok(event) = bus.audio_evt_rx.try_recv() {
                    match event {
                        AudioEvent::Started {
                            session_id,
                            start_at_secs,
                            duration_secs,
                        } => state.on_audio_started(session_id, start_at_secs, duration_secs),
                        AudioEvent::Failed { session_id, reason } => {
                            state.on_audio_failed(session_id, reason)
                        }
                    }
                }

                // 3. Handle system events
                while let Ok(sys_evt) = bus.sys_rx.try_recv() {
                    match sys_evt {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received...");
                            state.shutdown();
                            return;
                        }
                        SystemEvent::Resize { width, height } => {
                            state.resize(width, height);
                        }
                    }
                }

                // 4. Fixed-timestep update loop
                let current_time = Instant::now();
                let delta = current_time - last_time;
                last_time = current_time;
                accumulator += delta;

                let mut updated = false;
                let mut loops = 0;
                while accumulator >= target_dt && loops < 10 {
                    if let Some(result) = state.update() {
                        // Waits for room: the result must not be dropped like a frame
                        let sent = bus
                            .render_tx
                            .send_timeout(RenderState::Result(result), RESULT_SEND_TIMEOUT);
                        if sent.is_err() {
                            log::error!("LOGIC: Render side not draining, result not delivered");
                        }
                    }
                    accumulator -= target_dt;
                    loops += 1;
                    updated = true;
                }

                // 5. Send render snapshot only if we updated
                if updated && state.wants_frames() {
                    let _ = bus.render_tx.try_send(state.create_snapshot());
                }

                if loops == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        })?;
    Ok(())
}
