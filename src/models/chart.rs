//! Chart model and JSON loading.
//!
//! A chart is pure data: the timed tap notes of one song plus its global
//! timing metadata. It is validated once at load time and never mutated.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Errors raised while loading or validating a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("cannot read chart file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed chart JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("chart declares {0} lanes, at least 1 is required")]
    NoLanes(usize),
    #[error("note #{index} uses lane {lane} but the chart only has {lane_count} lanes")]
    LaneOutOfRange {
        index: usize,
        lane: usize,
        lane_count: usize,
    },
    #[error("note #{index} has a non-finite time")]
    InvalidTime { index: usize },
    #[error("chart offset must be finite")]
    InvalidOffset,
}

/// Kind of a chart note. Only taps are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Tap,
}

/// A static chart note as authored (time is before the chart offset).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartNote {
    /// Nominal hit instant in milliseconds.
    #[serde(rename = "t")]
    pub time_ms: f64,
    pub lane: usize,
    /// Checked by deserialization; there is nothing else to branch on yet.
    #[serde(rename = "type")]
    #[allow(dead_code)]
    pub kind: NoteKind,
}

impl ChartNote {
    #[cfg(test)]
    pub fn tap(time_ms: f64, lane: usize) -> Self {
        Self {
            time_ms,
            lane,
            kind: NoteKind::Tap,
        }
    }
}

/// Immutable description of a song's notes and timing metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chart {
    pub title: String,
    pub bpm: f64,
    /// Latency compensation added to every note time.
    #[serde(rename = "offsetMs", default)]
    pub offset_ms: f64,
    #[serde(rename = "keys")]
    pub lane_count: usize,
    #[serde(default)]
    pub notes: Vec<ChartNote>,
}

impl Chart {
    /// Parses and validates a chart from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let chart: Chart = serde_json::from_str(json)?;
        chart.validate()?;
        Ok(chart)
    }

    /// Loads a chart file from disk.
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let content = fs::read_to_string(path)?;
        let chart = Self::from_json(&content)?;
        log::info!(
            "CHART: Loaded '{}' ({} notes, {} lanes, {} bpm)",
            chart.title,
            chart.note_count(),
            chart.lane_count,
            chart.bpm
        );
        Ok(chart)
    }

    /// Checks the lane and timing invariants.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.lane_count == 0 {
            return Err(ChartError::NoLanes(self.lane_count));
        }
        if !self.offset_ms.is_finite() {
            return Err(ChartError::InvalidOffset);
        }
        for (index, note) in self.notes.iter().enumerate() {
            if note.lane >= self.lane_count {
                return Err(ChartError::LaneOutOfRange {
                    index,
                    lane: note.lane,
                    lane_count: self.lane_count,
                });
            }
            if !note.time_ms.is_finite() {
                return Err(ChartError::InvalidTime { index });
            }
        }
        Ok(())
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Effective hit instant of a note, with the chart offset applied.
    pub fn effective_time(&self, note: &ChartNote) -> f64 {
        note.time_ms + self.offset_ms
    }
}
