//! Track analysis shared by both encoders

use crate::{Note, VolumeScale};

/// Derived facts about a finished note sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackAnalysis {
    /// Mapped volume shared by every note, if there is exactly one
    pub uniform_volume: Option<i32>,
    /// `duration == delay` for every note: notes are back to back, so the
    /// buzzer's own "still playing" state can stand in for an explicit delay
    pub duration_equals_delay: bool,
}

impl TrackAnalysis {
    /// Inspect a finished sequence. Pure; the notes are only read.
    pub fn of(notes: &[Note], scale: &VolumeScale) -> Self {
        let mut volumes = notes.iter().map(|n| scale.map(n.volume));
        let uniform_volume = match volumes.next() {
            Some(first) => volumes.all(|v| v == first).then_some(first),
            None => None,
        };

        let duration_equals_delay = notes.iter().all(|n| n.duration == n.delay);

        Self {
            uniform_volume,
            duration_equals_delay,
        }
    }
}
