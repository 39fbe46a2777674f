//! Melody encoders
//!
//! Both encoders consume the same finished note sequence and its
//! [`TrackAnalysis`], and produce a program that renders to a complete
//! Arduino sketch:
//!
//! - [`TableEncoder`]: parallel arrays indexed by note, pruned when the
//!   analysis makes delays or volumes redundant
//! - [`CompactEncoder`]: one run-length melody string with inferred tempo,
//!   baseline octave and volume

mod compact;
mod table;

pub use compact::{CompactEncoder, CompactProgram, baseline_octave};
pub use table::{TableEncoder, TableProgram};

use crate::{EncodeConfig, EncoderKind, MelodyError, Note, Tick, TrackAnalysis};

/// Encode a note sequence into a device program
pub trait MelodyEncoder {
    /// The encoded program
    type Program: Sketch;

    /// Encode `notes` (in sequence-index order) using the shared analysis
    fn encode(
        &self,
        notes: &[Note],
        analysis: &TrackAnalysis,
    ) -> Result<Self::Program, MelodyError>;
}

/// A program that can be written out as Arduino source
pub trait Sketch {
    fn render(&self) -> Result<String, MelodyError>;
}

impl EncodeConfig {
    /// Encode with the configured encoder and render the sketch
    pub fn render_sketch(
        &self,
        notes: &[Note],
        analysis: &TrackAnalysis,
    ) -> Result<String, MelodyError> {
        match self.format {
            EncoderKind::Table => TableEncoder::new(self).encode(notes, analysis)?.render(),
            EncoderKind::Compact => CompactEncoder::new(self).encode(notes, analysis)?.render(),
        }
    }
}

/// Ceiling division for a positive divisor
fn ceil_div(numerator: Tick, denominator: Tick) -> Tick {
    debug_assert!(denominator > 0);
    let quotient = numerator.div_euclid(denominator);
    if numerator.rem_euclid(denominator) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(120, 10), 12);
        assert_eq!(ceil_div(120, 7), 18);
        assert_eq!(ceil_div(120, 120), 1);
        assert_eq!(ceil_div(120, 480), 1);
        assert_eq!(ceil_div(120, Tick::MAX), 1);
        assert_eq!(ceil_div(0, 7), 0);
    }

    #[test]
    fn test_render_sketch_dispatch() {
        let notes = [Note {
            sequence_index: 1,
            pitch: Some(60),
            duration: 60,
            delay: 60,
            volume: 127,
        }];
        let mut config = EncodeConfig::default();
        let analysis = TrackAnalysis::of(&notes, &config.volume);

        let compact = config.render_sketch(&notes, &analysis).unwrap();
        assert!(compact.contains("PROGMEM"));

        config.format = EncoderKind::Table;
        let table = config.render_sketch(&notes, &analysis).unwrap();
        assert!(table.contains("#define MELODY_LENGTH 1"));
    }
}
