//! Live per-note state used during a play session.

use crate::models::chart::Chart;

/// Runtime record for one chart note.
///
/// Created once when a session starts and owned by the engine. `judged`
/// only ever goes from `false` to `true`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteRuntime {
    /// Index of the note in the source chart.
    pub chart_index: usize,
    /// Hit instant with the chart offset applied (ms).
    pub time_ms: f64,
    pub lane: usize,
    pub judged: bool,
    /// Screen Y of the note's top edge, recomputed every frame while unjudged.
    pub position: f32,
    pub visible: bool,
}

impl NoteRuntime {
    /// Builds the runtime arena for a chart, sorted by effective time.
    ///
    /// The sort is stable, so notes sharing an instant keep chart order.
    pub fn from_chart(chart: &Chart) -> Vec<Self> {
        let mut notes: Vec<Self> = chart
            .notes
            .iter()
            .enumerate()
            .map(|(chart_index, note)| Self {
                chart_index,
                time_ms: chart.effective_time(note),
                lane: note.lane,
                judged: false,
                position: 0.0,
                visible: false,
            })
            .collect();
        notes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        notes
    }

    /// Signed distance to the hit instant: positive while the note is still early.
    pub fn delta(&self, song_time_ms: f64) -> f64 {
        self.time_ms - song_time_ms
    }
}
