//! Audio manager that sends commands to the dedicated audio thread.
//!
//! The logic thread never touches the output device. It queues commands and
//! reads the playback position from the atomics the audio thread publishes.

use crate::logic::clock::SampleClock;
use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
}

impl AudioManager {
    /// Creates a new audio manager connected to the system bus.
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            position: bus.audio_position.clone(),
            sample_rate: bus.audio_sample_rate.clone(),
            channels: bus.audio_channels.clone(),
        }
    }

    /// Asks the audio thread to decode `path` and play it after `pre_roll_secs`
    /// of silence. The answer arrives as an `AudioEvent` tagged `session_id`.
    pub fn start(&self, session_id: u64, path: &Path, pre_roll_secs: f64, volume: f32) {
        let cmd = AudioCommand::Start {
            session_id,
            path: path.to_path_buf(),
            pre_roll_secs,
            volume,
        };
        if self.cmd_tx.send(cmd).is_err() {
            log::error!("LOGIC: Audio thread is gone, cannot start session {}", session_id);
        }
    }

    /// Stops playback and resets the sample counter.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    /// A clock reading the shared sample counter.
    pub fn clock_source(&self) -> SampleClock {
        SampleClock::new(
            self.position.clone(),
            self.sample_rate.clone(),
            self.channels.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::ClockSource;
    use std::sync::atomic::Ordering;

    #[test]
    fn start_queues_a_tagged_command() {
        let bus = SystemBus::new();
        let manager = AudioManager::new(&bus);
        manager.start(7, Path::new("song.ogg"), 0.1, 0.5);

        match bus.audio_cmd_rx.try_recv() {
            Ok(AudioCommand::Start {
                session_id,
                pre_roll_secs,
                ..
            }) => {
                assert_eq!(session_id, 7);
                assert_eq!(pre_roll_secs, 0.1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn clock_source_reads_bus_counter() {
        let bus = SystemBus::new();
        let manager = AudioManager::new(&bus);
        bus.audio_sample_rate.store(1000, Ordering::Relaxed);
        bus.audio_channels.store(1, Ordering::Relaxed);
        bus.audio_position.store(2500, Ordering::Release);
        assert_eq!(manager.clock_source().now_secs(), 2.5);
    }
}
