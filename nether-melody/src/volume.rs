//! MIDI velocity to buzzer volume mapping

use serde::{Deserialize, Serialize};

use crate::MIDI_VOLUME_MAX;

/// Linear mapping from MIDI velocity (0-127) to a device volume range.
///
/// `map(v) = max(min, floor(v / 127 * max) + offset)`. There is no upper clamp;
/// velocities above 127 scale past `max + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeScale {
    /// Device volume reached by a full-scale velocity (before the offset)
    pub max: u8,
    /// Lowest volume ever emitted
    pub min: u8,
    /// Added after scaling
    pub offset: i16,
}

impl VolumeScale {
    /// ZumoBuzzer `playNote` volume range (0-15), biased towards audible levels
    pub const ZUMO: Self = Self {
        max: 15,
        min: 9,
        offset: -2,
    };

    /// Map a raw velocity to the device range
    pub fn map(&self, velocity: u8) -> i32 {
        let scaled = i32::from(velocity) * i32::from(self.max) / i32::from(MIDI_VOLUME_MAX);
        (scaled + i32::from(self.offset)).max(i32::from(self.min))
    }
}

impl Default for VolumeScale {
    fn default() -> Self {
        Self::ZUMO
    }
}
