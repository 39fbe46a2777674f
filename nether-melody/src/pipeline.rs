//! Per-track conversion: tracker, analyzer, encoder

use crate::{EncodeConfig, Event, MelodyError, Note, Track, TrackAnalysis, WarningCode};

/// Everything produced for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    /// 1-based track number
    pub number: usize,
    pub name: String,
    /// Distinct warnings, ordered by code
    pub warnings: Vec<WarningCode>,
    pub analysis: TrackAnalysis,
    pub notes: Vec<Note>,
    /// Rendered sketch; `None` for empty tracks and inspection runs
    pub sketch: Option<String>,
}

impl TrackReport {
    /// No sounding note; nothing gets written
    pub fn is_empty(&self) -> bool {
        self.notes.iter().all(Note::is_silent)
    }
}

/// Run the tracker and analyzer without encoding
pub fn inspect_track(number: usize, events: &[Event], config: &EncodeConfig) -> TrackReport {
    let track = Track::from_events(events);
    let analysis = TrackAnalysis::of(&track.notes, &config.volume);

    tracing::debug!(
        track = number,
        notes = track.notes.len(),
        sequence = track.sequence_count,
        "track finished"
    );

    TrackReport {
        number,
        name: track.name,
        warnings: track.warnings.into_iter().collect(),
        analysis,
        notes: track.notes,
        sketch: None,
    }
}

/// Convert one track to a sketch with the configured encoder
pub fn convert_track(
    number: usize,
    events: &[Event],
    config: &EncodeConfig,
) -> Result<TrackReport, MelodyError> {
    let mut report = inspect_track(number, events, config);
    if !report.is_empty() {
        report.sketch = Some(config.render_sketch(&report.notes, &report.analysis)?);
    }
    Ok(report)
}
