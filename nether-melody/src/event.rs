//! Typed track events produced by the dump tokenizer

/// Absolute time in MIDI ticks.
///
/// Signed so that out-of-order timestamps and lookback delays stay representable.
pub type Tick = i64;

/// A single event of one track, in stream order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key pressed (a zero-velocity note-on is tokenized as [`Event::NoteOff`])
    NoteOn { time: Tick, pitch: u8, volume: u8 },
    /// Key released
    NoteOff { time: Tick, pitch: u8 },
    /// Sequence or track name
    TrackMeta { name: String },
    /// End of the track; freezes the tracker
    TrackEnd,
}

impl Event {
    /// Event time, for timed events
    pub fn time(&self) -> Option<Tick> {
        match self {
            Event::NoteOn { time, .. } | Event::NoteOff { time, .. } => Some(*time),
            Event::TrackMeta { .. } | Event::TrackEnd => None,
        }
    }
}
