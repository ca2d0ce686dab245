//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` provides a centralized communication hub for all threads
//! in the application, using lock-free channels for message passing.

use crate::input::events::{GameAction, RawInputEvent};
use crate::shared::snapshot::RenderState;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// System-level events broadcast to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Window resized to new dimensions.
    Resize { width: u32, height: u32 },
    /// Application shutdown requested.
    Quit,
}

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Decode the song and start playback after `pre_roll_secs` of silence.
    Start {
        session_id: u64,
        path: PathBuf,
        pre_roll_secs: f64,
        volume: f32,
    },
    /// Stop playback and reset the sample counter.
    Stop,
}

/// Notifications from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Playback is running. `start_at_secs` is the clock time of the song's
    /// first sample.
    Started {
        session_id: u64,
        start_at_secs: f64,
        duration_secs: f64,
    },
    /// Playback could not start.
    Failed { session_id: u64, reason: String },
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SystemBus {
    /// Main → Input: raw keyboard events.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Input → Logic: processed gameplay actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic → Render: game state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Main → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Audio: audio commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Audio → Logic: playback notifications.
    pub audio_evt_tx: Sender<AudioEvent>,
    pub audio_evt_rx: Receiver<AudioEvent>,

    /// Interleaved samples delivered to the output.
    /// Written by the audio thread, read by the logic thread.
    pub audio_position: Arc<AtomicU64>,

    /// Current audio sample rate.
    pub audio_sample_rate: Arc<AtomicU64>,

    /// Number of audio channels.
    pub audio_channels: Arc<AtomicU64>,
}

impl SystemBus {
    /// Creates a new system bus with all channels initialized.
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();
        let (audio_evt_tx, audio_evt_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
            audio_cmd_tx,
            audio_cmd_rx,
            audio_evt_tx,
            audio_evt_rx,
            audio_position: Arc::new(AtomicU64::new(0)),
            audio_sample_rate: Arc::new(AtomicU64::new(44100)),
            audio_channels: Arc::new(AtomicU64::new(2)),
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
