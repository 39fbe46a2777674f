//! Compact melody encoder: one `playFromProgramSpace` melody string
//!
//! Token layout, left to right:
//!
//! ```text
//! [V<volume> ] O<octave> [T<tempo> ] { [V<volume> ] [>|<]* <letter>[<divisor>] R* }
//! ```
//!
//! The baseline octave is the most frequent octave among sounding notes
//! (first seen wins a tie); each note shifts relative to it.

use std::fmt::Write as FmtWrite;

use super::{MelodyEncoder, Sketch, ceil_div};
use crate::{
    CompactSettings, EncodeConfig, MAX_REST_TOKENS, MelodyError, Note, SEMITONES, Tick,
    TrackAnalysis, VolumeScale,
};

/// Lowercase chromatic letters, C = 0
const NOTE_LETTERS: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// Most frequent octave among sounding notes; ties go to the octave seen first
pub fn baseline_octave(notes: &[Note]) -> Option<u8> {
    // (octave, count) in first-seen order
    let mut tally: Vec<(u8, usize)> = Vec::new();
    for octave in notes.iter().filter_map(Note::octave) {
        match tally.iter_mut().find(|(o, _)| *o == octave) {
            Some((_, count)) => *count += 1,
            None => tally.push((octave, 1)),
        }
    }

    let mut best: Option<(u8, usize)> = None;
    for (octave, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((octave, count));
        }
    }
    best.map(|(octave, _)| octave)
}

/// Renders the melody string for `ZumoBuzzer::playFromProgramSpace`
#[derive(Debug, Clone, Copy)]
pub struct CompactEncoder {
    volume: VolumeScale,
    settings: CompactSettings,
}

impl CompactEncoder {
    pub fn new(config: &EncodeConfig) -> Self {
        Self {
            volume: config.volume,
            settings: config.compact,
        }
    }

    /// `ceil(bpm * 60 * sounding / total_duration)`, `None` without any duration
    pub fn tempo(&self, notes: &[Note]) -> Option<Tick> {
        let sounding = notes.iter().filter(|n| !n.is_silent()).count() as Tick;
        let total = notes
            .iter()
            .map(|n| n.duration)
            .fold(0, Tick::saturating_add);
        if sounding == 0 || total <= 0 {
            return None;
        }
        let beats = Tick::from(self.settings.bpm)
            .saturating_mul(60)
            .saturating_mul(sounding);
        Some(ceil_div(beats, total))
    }

    /// Note length divisor; `1` is the implicit default and never written
    fn divisor(&self, duration: Tick) -> Tick {
        ceil_div(Tick::from(self.settings.bpm), duration.max(1))
    }

    /// Whole rest tokens covering a gap; fractions are truncated
    fn rest_count(&self, gap: Tick) -> Result<usize, MelodyError> {
        let unit = i128::from(self.settings.rest_subdivision) * i128::from(self.settings.bpm);
        if gap <= 0 || unit <= 0 {
            return Ok(0);
        }

        let rests = 60 * i128::from(gap) / unit;
        match usize::try_from(rests) {
            Ok(count) if count <= MAX_REST_TOKENS => Ok(count),
            _ => Err(MelodyError::RestTooLong {
                gap,
                rests,
                max: MAX_REST_TOKENS,
            }),
        }
    }
}

impl MelodyEncoder for CompactEncoder {
    type Program = CompactProgram;

    fn encode(
        &self,
        notes: &[Note],
        analysis: &TrackAnalysis,
    ) -> Result<CompactProgram, MelodyError> {
        let mut melody = String::new();

        if let Some(volume) = analysis.uniform_volume {
            melody.push_str(&format!("V{} ", volume));
        }

        let baseline = baseline_octave(notes);
        if let Some(octave) = baseline {
            melody.push_str(&format!("O{} ", i32::from(octave) - 1));
        }

        if let Some(tempo) = self.tempo(notes) {
            melody.push_str(&format!("T{} ", tempo));
        }

        for note in notes {
            let sounded = match (note.pitch, baseline) {
                (Some(pitch), Some(baseline)) => {
                    if analysis.uniform_volume.is_none() {
                        melody.push_str(&format!("V{} ", self.volume.map(note.volume)));
                    }

                    let shift = i32::from(baseline) - i32::from(pitch / SEMITONES);
                    let marker = if shift > 0 { ">" } else { "<" };
                    melody.push_str(&marker.repeat(shift.unsigned_abs() as usize));

                    melody.push_str(NOTE_LETTERS[usize::from(pitch % SEMITONES)]);

                    let divisor = self.divisor(note.duration);
                    if divisor > 1 {
                        melody.push_str(&divisor.to_string());
                    }
                    note.duration
                }
                // Silence only feeds the trailing rest
                _ => 0,
            };

            let rests = self.rest_count(note.delay.saturating_sub(sounded))?;
            melody.push_str(&"R".repeat(rests));
        }

        Ok(CompactProgram { melody })
    }
}

/// The encoded melody string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactProgram {
    pub melody: String,
}

impl CompactProgram {
    /// The melody as a C string literal body
    pub fn escaped(&self) -> String {
        let mut escaped = String::with_capacity(self.melody.len());
        for c in self.melody.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

impl Sketch for CompactProgram {
    fn render(&self) -> Result<String, MelodyError> {
        let mut output = String::new();

        writeln!(output, "#include <ZumoBuzzer.h>")?;
        writeln!(output, "#include <Pushbutton.h>")?;
        writeln!(output, "#include <avr/pgmspace.h>")?;
        writeln!(output)?;
        writeln!(
            output,
            "const char melody[] PROGMEM = \"{}\";",
            self.escaped()
        )?;
        writeln!(output)?;
        writeln!(output, "ZumoBuzzer buzzer;")?;
        writeln!(output, "Pushbutton button(ZUMO_BUTTON);")?;
        writeln!(output)?;
        writeln!(output, "void setup()")?;
        writeln!(output, "{{")?;
        writeln!(output, "  // Wait for button to play the melody.")?;
        writeln!(output, "  button.waitForButton();")?;
        writeln!(output, "}}")?;
        writeln!(output)?;
        writeln!(output, "void loop()")?;
        writeln!(output, "{{")?;
        writeln!(output, "  buzzer.playFromProgramSpace(melody);")?;
        writeln!(output, "  button.waitForPress();")?;
        writeln!(output, "  if (buzzer.isPlaying())")?;
        writeln!(output, "  {{")?;
        writeln!(output, "    buzzer.stopPlaying();")?;
        writeln!(output, "    button.waitForRelease();")?;
        writeln!(output, "    button.waitForButton();")?;
        writeln!(output, "  }}")?;
        writeln!(output, "  else {{")?;
        writeln!(output, "    button.waitForRelease();")?;
        writeln!(output, "  }}")?;
        writeln!(output, "}}")?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests;
