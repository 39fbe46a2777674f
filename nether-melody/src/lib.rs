//! Nether-Melody: MIDI dump to single-voice buzzer melody converter
//!
//! This crate turns a textual MIDI dump (the `mf2t`/`midicomp` format) into
//! melodies for the Pololu Zumo buzzer, a device that can sound exactly one
//! note at a time. Each track is processed on its own, start to finish.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  dump text (.txt) │
//! └────────┬─────────┘
//!          │ parse_dump()
//!          ▼
//!     Vec<Event> per track
//!          │ TrackState (note tracker)
//!          ▼
//!     ┌────────────────────────────────┐
//!     │ Track                          │
//!     │  - notes: Vec<Note> (by index) │
//!     │  - warnings: WarningCode set   │
//!     └────────────────────────────────┘
//!          │ TrackAnalysis::of()
//!          ▼
//!   TableEncoder  |  CompactEncoder
//!          │
//!          ▼
//!     Arduino sketch (.ino)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use nether_melody::{EncodeConfig, convert_track, parse_dump};
//!
//! let dump = parse_dump(&std::fs::read_to_string("song.txt")?)?;
//! let config = EncodeConfig::default();
//! for track in &dump.tracks {
//!     let events = track.events.as_ref()?;
//!     let report = convert_track(track.number, events, &config)?;
//!     if let Some(sketch) = &report.sketch {
//!         println!("{}", sketch);
//!     }
//! }
//! ```
//!
//! Volumes are quantized from the MIDI 0-127 range down to the buzzer range
//! by [`VolumeScale::map`]. The mapping is lossy; the original velocity cannot
//! be recovered from an encoded sketch.

mod analysis;
mod config;
mod dump;
mod encoder;
mod error;
mod event;
mod pipeline;
mod tracker;
mod volume;

pub use analysis::TrackAnalysis;
pub use config::{CompactSettings, EncodeConfig, EncoderKind};
pub use dump::{DumpFile, DumpHeader, DumpLine, TrackDump, parse_dump, parse_line};
pub use encoder::{
    CompactEncoder, CompactProgram, MelodyEncoder, Sketch, TableEncoder, TableProgram,
    baseline_octave,
};
pub use error::{DumpError, MelodyError};
pub use event::{Event, Tick};
pub use pipeline::{TrackReport, convert_track, inspect_track};
pub use tracker::{Note, Track, TrackState, WarningCode};
pub use volume::VolumeScale;

// =============================================================================
// Constants
// =============================================================================

/// Highest MIDI note-on velocity
pub const MIDI_VOLUME_MAX: u8 = 127;

/// Highest MIDI pitch value
pub const MIDI_PITCH_MAX: u8 = 127;

/// Semitones per octave
pub const SEMITONES: u8 = 12;

/// Baseline tempo (quarter notes per minute) used by the compact melody encoder
pub const BASELINE_BPM: u32 = 120;

/// Rest subdivision (quarter note value squared) used to size compact rest tokens
pub const REST_SUBDIVISION: u32 = 16;

/// Longest run of rest tokens the compact encoder emits for a single gap
pub const MAX_REST_TOKENS: usize = 4096;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MIDI_VOLUME_MAX, 127);
        assert_eq!(SEMITONES, 12);
        assert_eq!(REST_SUBDIVISION, 4 * 4);
    }
}
