//! Encoder selection and tuning

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{BASELINE_BPM, MelodyError, REST_SUBDIVISION, VolumeScale};

/// Output format of a converted track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Parallel `notes`/`durations`/`delays`/`volumes` arrays played by index
    Table,
    /// One melody string for `ZumoBuzzer::playFromProgramSpace`
    #[default]
    Compact,
}

impl FromStr for EncoderKind {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "array" => Ok(EncoderKind::Table),
            "compact" | "sequence" => Ok(EncoderKind::Compact),
            _ => Err(MelodyError::UnknownEncoder(s.to_string())),
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderKind::Table => f.write_str("table"),
            EncoderKind::Compact => f.write_str("compact"),
        }
    }
}

/// Compact melody encoder constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactSettings {
    /// Baseline tempo the note divisors and `T` token are derived from
    pub bpm: u32,
    /// Rest token size divisor
    pub rest_subdivision: u32,
}

impl Default for CompactSettings {
    fn default() -> Self {
        Self {
            bpm: BASELINE_BPM,
            rest_subdivision: REST_SUBDIVISION,
        }
    }
}

/// Everything the encoders need besides the notes themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub format: EncoderKind,
    /// Emit explicit `delay()` calls between notes (table encoder)
    pub use_delays: bool,
    pub volume: VolumeScale,
    pub compact: CompactSettings,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            format: EncoderKind::default(),
            use_delays: true,
            volume: VolumeScale::default(),
            compact: CompactSettings::default(),
        }
    }
}
