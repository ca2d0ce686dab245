//! Dedicated audio thread that owns the output device.
//!
//! A song is decoded up front into memory, then queued behind a pre-roll of
//! silence and followed by endless silence. Every queued sample passes through
//! `AudioMonitor`, so the shared counter is the song clock.

use crate::system::bus::{AudioCommand, AudioEvent, SystemBus};
use rodio::buffer::SamplesBuffer;
use rodio::source::Zero;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::f32::consts::TAU;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

const FALLBACK_SAMPLE_RATE: u32 = 44_100;
const FALLBACK_SECS: u32 = 10;
const FALLBACK_FREQUENCY: f32 = 440.0;
const FALLBACK_AMPLITUDE: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("cannot open file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("file contains no samples")]
    Empty,
}

/// A fully decoded, interleaved song.
struct SongBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl SongBuffer {
    fn decode(path: &Path) -> Result<Self, DecodeError> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;
        let channels = source.channels();
        let sample_rate = source.sample_rate();
        let samples: Vec<f32> = source.convert_samples().collect();

        if samples.is_empty() || channels == 0 || sample_rate == 0 {
            return Err(DecodeError::Empty);
        }
        Ok(Self {
            channels,
            sample_rate,
            samples,
        })
    }

    /// Ten seconds of a quiet 440 Hz mono sine, so a session stays playable
    /// without its audio file.
    fn fallback_tone() -> Self {
        let len = (FALLBACK_SAMPLE_RATE * FALLBACK_SECS) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / FALLBACK_SAMPLE_RATE as f32;
                (TAU * FALLBACK_FREQUENCY * t).sin() * FALLBACK_AMPLITUDE
            })
            .collect();
        Self {
            channels: 1,
            sample_rate: FALLBACK_SAMPLE_RATE,
            samples,
        }
    }

    fn load(path: &Path) -> Self {
        match Self::decode(path) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("AUDIO: {:?}: {}, using fallback tone", path, e);
                Self::fallback_tone()
            }
        }
    }

    fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

struct AudioWorker {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    position_counter: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
}

impl AudioWorker {
    fn new(bus: &SystemBus) -> Self {
        Self {
            output: Self::open_output(),
            sink: None,
            position_counter: bus.audio_position.clone(),
            sample_rate: bus.audio_sample_rate.clone(),
            channels: bus.audio_channels.clone(),
        }
    }

    fn open_output() -> Option<(OutputStream, OutputStreamHandle)> {
        match OutputStream::try_default() {
            Ok(output) => {
                log::info!("AUDIO: Device found, audio enabled");
                Some(output)
            }
            Err(e) => {
                log::warn!("AUDIO: No audio device found ({})", e);
                None
            }
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand, bus: &SystemBus) {
        match cmd {
            AudioCommand::Start {
                session_id,
                path,
                pre_roll_secs,
                volume,
            } => {
                let event = match self.start(&path, pre_roll_secs, volume) {
                    Ok(duration_secs) => AudioEvent::Started {
                        session_id,
                        start_at_secs: pre_roll_secs,
                        duration_secs,
                    },
                    Err(reason) => {
                        log::error!("AUDIO: Session {} cannot start: {}", session_id, reason);
                        AudioEvent::Failed { session_id, reason }
                    }
                };
                let _ = bus.audio_evt_tx.send(event);
            }
            AudioCommand::Stop => self.stop(),
        }
    }

    /// Queues pre-roll, song and trailing silence, then starts the counter.
    /// Returns the song duration in seconds.
    fn start(&mut self, path: &Path, pre_roll_secs: f64, volume: f32) -> Result<f64, String> {
        self.stop();

        if self.output.is_none() {
            self.output = Self::open_output();
        }
        let Some((_, handle)) = &self.output else {
            return Err("no audio output device".to_string());
        };
        let sink = Sink::try_new(handle).map_err(|e| format!("failed to create sink: {e}"))?;
        sink.pause();
        sink.set_volume(volume);

        let song = SongBuffer::load(path);
        let duration_secs = song.duration_secs();
        let (channels, sample_rate) = (song.channels, song.sample_rate);

        let pre_roll = Duration::from_secs_f64(pre_roll_secs.max(0.0));
        sink.append(self.monitor(Zero::<f32>::new(channels, sample_rate).take_duration(pre_roll)));
        sink.append(self.monitor(SamplesBuffer::new(channels, sample_rate, song.samples)));
        sink.append(self.monitor(Zero::<f32>::new(channels, sample_rate)));

        self.sample_rate.store(sample_rate as u64, Ordering::Relaxed);
        self.channels.store(channels as u64, Ordering::Relaxed);
        self.position_counter.store(0, Ordering::Release);
        sink.play();
        self.sink = Some(sink);

        log::info!(
            "AUDIO: Playing {:?} ({:.1}s, {} Hz, {} ch) after {:.0} ms pre-roll",
            path,
            duration_secs,
            sample_rate,
            channels,
            pre_roll_secs * 1000.0
        );
        Ok(duration_secs)
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            log::info!("AUDIO: Stopped");
        }
        self.position_counter.store(0, Ordering::Release);
    }

    fn monitor<I>(&self, inner: I) -> AudioMonitor<I> {
        AudioMonitor {
            inner,
            position_counter: self.position_counter.clone(),
        }
    }
}

/// Counts every sample handed to the output.
struct AudioMonitor<I> {
    inner: I,
    position_counter: Arc<AtomicU64>,
}

impl<I> Iterator for AudioMonitor<I>
where
    I: Iterator,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.position_counter.fetch_add(1, Ordering::Release);
        }
        item
    }
}

impl<I> Source for AudioMonitor<I>
where
    I: Source,
    I::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }
    fn channels(&self) -> u16 {
        self.inner.channels()
    }
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Starts the dedicated audio thread.
pub fn start_audio_thread(bus: SystemBus) -> std::io::Result<()> {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let mut worker = AudioWorker::new(&bus);

            while let Ok(cmd) = bus.audio_cmd_rx.recv() {
                worker.handle_command(cmd, &bus);
            }

            log::info!("AUDIO: Thread stopped");
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_tone_is_ten_quiet_seconds() {
        let tone = SongBuffer::fallback_tone();
        assert_eq!(tone.channels, 1);
        assert_eq!(tone.sample_rate, 44_100);
        assert_eq!(tone.samples.len(), 441_000);
        assert_eq!(tone.duration_secs(), 10.0);
        assert!(tone.samples.iter().all(|s| s.abs() <= FALLBACK_AMPLITUDE + f32::EPSILON));
        assert!(tone.samples.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn missing_file_falls_back() {
        let path = Path::new("this/file/does/not/exist.ogg");
        assert!(matches!(SongBuffer::decode(path), Err(DecodeError::Io(_))));
        assert_eq!(SongBuffer::load(path).duration_secs(), 10.0);
    }

    #[test]
    fn monitor_counts_interleaved_samples() {
        let counter = Arc::new(AtomicU64::new(0));
        let source = SamplesBuffer::new(2, 100, vec![0.0f32; 50]);
        let monitor = AudioMonitor {
            inner: source,
            position_counter: counter.clone(),
        };
        assert_eq!(monitor.count(), 50);
        assert_eq!(counter.load(Ordering::Acquire), 50);
    }
}
