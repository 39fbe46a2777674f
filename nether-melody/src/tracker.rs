//! Note tracker: linearizes overlapping note events into a single voice
//!
//! Notes are ordered by *note-on* order. Each note-on reserves the next
//! 1-based sequence index, and the finished note lands in slot
//! `sequence_index - 1` no matter when its note-off arrives. Gaps before a
//! note-on (with nothing sounding) become silent notes that consume an index
//! like any other note.
//!
//! End times are kept separately in commit order: each commit inserts its
//! time at `min(sequence_index - 1, len)`. A note closing while that list
//! already reaches past its own index takes its delay from the entry sitting
//! at its index; otherwise its delay is its duration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{Event, SEMITONES, Tick};

/// Non-fatal conditions recorded while tracking a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WarningCode {
    /// A note-on arrived for a pitch that is already sounding
    DuplicateNoteOn,
    /// A note-on arrived while another pitch was sounding
    OverlappingNotes,
    /// The track ended while notes were still sounding; they were dropped
    UnterminatedNote,
}

impl WarningCode {
    /// Operator-facing description
    pub fn message(&self) -> &'static str {
        match self {
            WarningCode::DuplicateNoteOn => {
                "There is a note that is turned on without being turned off beforehand."
            }
            WarningCode::OverlappingNotes => "Multiple notes are playing at the same time.",
            WarningCode::UnterminatedNote => {
                "There is a note that is never turned off; it was dropped."
            }
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One entry of the single-voice melody
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// 1-based position assigned at note-on
    pub sequence_index: usize,
    /// MIDI pitch, `None` for silence
    pub pitch: Option<u8>,
    /// Sounding time in ticks
    pub duration: Tick,
    /// Ticks until the next note starts (may be zero or negative after reordering)
    pub delay: Tick,
    /// Raw MIDI velocity
    pub volume: u8,
}

impl Note {
    pub fn is_silent(&self) -> bool {
        self.pitch.is_none()
    }

    /// MIDI octave (`pitch / 12`) of a sounding note
    pub fn octave(&self) -> Option<u8> {
        self.pitch.map(|p| p / SEMITONES)
    }

    /// Chromatic index (`pitch % 12`, C = 0) of a sounding note
    pub fn semitone(&self) -> Option<u8> {
        self.pitch.map(|p| p % SEMITONES)
    }
}

/// A pitch that is currently sounding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveNote {
    sequence_index: usize,
    start_time: Tick,
    volume: u8,
}

/// Per-track tracker state.
///
/// Constructed fresh for every track and consumed by [`TrackState::finish`];
/// nothing is shared between tracks.
#[derive(Debug, Default)]
pub struct TrackState {
    active: BTreeMap<u8, ActiveNote>,
    /// Finished notes, slot `i` holds sequence index `i + 1`
    slots: Vec<Option<Note>>,
    /// Committed end times, inserted at `min(index - 1, len)`
    committed_times: Vec<Tick>,
    last_time: Tick,
    sequence_count: usize,
    warnings: BTreeSet<WarningCode>,
    name: String,
    ended: bool,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. Events after [`Event::TrackEnd`] are ignored.
    pub fn apply(&mut self, event: &Event) {
        if self.ended {
            tracing::debug!(?event, "event after track end ignored");
            return;
        }

        match event {
            Event::NoteOn {
                time,
                pitch,
                volume,
            } => self.note_on(*time, *pitch, *volume),
            Event::NoteOff { time, pitch } => self.note_off(*time, *pitch),
            Event::TrackMeta { name } => self.name = name.clone(),
            Event::TrackEnd => self.ended = true,
        }
    }

    pub fn note_on(&mut self, time: Tick, pitch: u8, volume: u8) {
        if self.active.is_empty() && time > self.last_time {
            let gap = time.saturating_sub(self.last_time);
            let index = self.reserve();
            tracing::debug!(index, gap, "silence before note-on");
            self.commit(
                Note {
                    sequence_index: index,
                    pitch: None,
                    duration: gap,
                    delay: gap,
                    volume,
                },
                time,
            );
        }

        if self.active.keys().any(|&p| p != pitch) {
            self.warnings.insert(WarningCode::OverlappingNotes);
        }

        if let Some(existing) = self.active.get_mut(&pitch) {
            // Keep the reserved index; the latest note-on owns the start
            self.warnings.insert(WarningCode::DuplicateNoteOn);
            existing.start_time = time;
            existing.volume = volume;
            return;
        }

        let index = self.reserve();
        self.active.insert(
            pitch,
            ActiveNote {
                sequence_index: index,
                start_time: time,
                volume,
            },
        );
    }

    /// Close a sounding pitch. A note-off without a matching note-on is dropped silently.
    pub fn note_off(&mut self, time: Tick, pitch: u8) {
        let Some(active) = self.active.remove(&pitch) else {
            tracing::debug!(pitch, time, "note-off without note-on dropped");
            return;
        };

        let index = active.sequence_index;
        let duration = time.saturating_sub(active.start_time);

        // Commits already reach past this index: the note completed out of order
        let delay = if index >= self.committed_times.len() {
            duration
        } else {
            self.committed_times[index - 1].saturating_sub(time)
        };

        self.commit(
            Note {
                sequence_index: index,
                pitch: Some(pitch),
                duration,
                delay,
                volume: active.volume,
            },
            time,
        );
        self.last_time = self.last_time.max(time);
    }

    /// Number of sequence indices handed out so far
    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn warnings(&self) -> &BTreeSet<WarningCode> {
        &self.warnings
    }

    /// Whether [`Event::TrackEnd`] has been seen
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Freeze the state into a finished track.
    ///
    /// Pitches still sounding are dropped (with [`WarningCode::UnterminatedNote`])
    /// and their reserved slots removed.
    pub fn finish(mut self) -> Track {
        if !self.active.is_empty() {
            tracing::debug!(open = self.active.len(), "dropping unterminated notes");
            self.warnings.insert(WarningCode::UnterminatedNote);
        }

        Track {
            name: self.name,
            notes: self.slots.into_iter().flatten().collect(),
            sequence_count: self.sequence_count,
            warnings: self.warnings,
        }
    }

    fn reserve(&mut self) -> usize {
        self.sequence_count += 1;
        self.slots.push(None);
        self.sequence_count
    }

    fn commit(&mut self, note: Note, time: Tick) {
        let slot = note.sequence_index - 1;
        self.slots[slot] = Some(note);
        let at = slot.min(self.committed_times.len());
        self.committed_times.insert(at, time);
    }
}

/// A finalized, read-only track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    /// Notes in sequence-index order
    pub notes: Vec<Note>,
    /// Sequence indices handed out, including dropped unterminated notes
    pub sequence_count: usize,
    pub warnings: BTreeSet<WarningCode>,
}

impl Track {
    /// Build a finished track from a complete event stream
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut state = TrackState::new();
        for event in events {
            state.apply(event);
        }
        state.finish()
    }

    /// A track without any sounding note produces no output
    pub fn is_empty(&self) -> bool {
        self.notes.iter().all(Note::is_silent)
    }

    /// Sounding (non-silent) notes
    pub fn sounding_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.is_silent())
    }
}
