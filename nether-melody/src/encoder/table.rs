//! Table encoder: parallel note/duration/delay/volume arrays

use std::fmt::{Display, Write as FmtWrite};

use super::{MelodyEncoder, Sketch};
use crate::{EncodeConfig, MelodyError, Note, Tick, TrackAnalysis, VolumeScale};

/// Chromatic names used by the ZumoBuzzer `NOTE_*` macros, C = 0
const NOTE_MACROS: [&str; 12] = [
    "C", "C_SHARP", "D", "D_SHARP", "E", "F", "F_SHARP", "G", "G_SHARP", "A", "A_SHARP", "B",
];

/// Macro the player treats as a rest
const SILENT_NOTE: &str = "SILENT_NOTE";

/// Array bodies are wrapped to this many columns
const WRAP_WIDTH: usize = 70;

/// `NOTE_<name>(<octave>)` for a pitch, `SILENT_NOTE` for silence
pub fn note_macro(pitch: Option<u8>) -> String {
    match pitch {
        Some(pitch) => format!(
            "NOTE_{}({})",
            NOTE_MACROS[usize::from(pitch % 12)],
            pitch / 12
        ),
        None => SILENT_NOTE.to_string(),
    }
}

/// Renders four parallel arrays for an index-driven player
#[derive(Debug, Clone, Copy)]
pub struct TableEncoder {
    volume: VolumeScale,
    use_delays: bool,
}

impl TableEncoder {
    pub fn new(config: &EncodeConfig) -> Self {
        Self {
            volume: config.volume,
            use_delays: config.use_delays,
        }
    }
}

impl MelodyEncoder for TableEncoder {
    type Program = TableProgram;

    fn encode(
        &self,
        notes: &[Note],
        analysis: &TrackAnalysis,
    ) -> Result<TableProgram, MelodyError> {
        Ok(TableProgram {
            notes: notes.iter().map(|n| note_macro(n.pitch)).collect(),
            durations: notes.iter().map(|n| n.duration).collect(),
            delays: notes.iter().map(|n| n.delay).collect(),
            volumes: notes.iter().map(|n| self.volume.map(n.volume)).collect(),
            uniform_volume: analysis.uniform_volume,
            duration_equals_delay: analysis.duration_equals_delay,
            use_delays: self.use_delays,
        })
    }
}

/// Four equal-length arrays plus the analysis flags that prune them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProgram {
    pub notes: Vec<String>,
    pub durations: Vec<Tick>,
    pub delays: Vec<Tick>,
    /// Mapped volumes
    pub volumes: Vec<i32>,
    pub uniform_volume: Option<i32>,
    pub duration_equals_delay: bool,
    pub use_delays: bool,
}

impl TableProgram {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The `delays` array is only needed when it differs from `durations`
    pub fn emits_delays(&self) -> bool {
        self.use_delays && !self.duration_equals_delay
    }

    /// A uniform volume is inlined as a constant instead
    pub fn emits_volumes(&self) -> bool {
        self.uniform_volume.is_none()
    }

    /// Wait for the buzzer to go idle instead of sleeping between notes
    fn waits_for_buzzer(&self) -> bool {
        self.duration_equals_delay || !self.use_delays
    }
}

impl Sketch for TableProgram {
    fn render(&self) -> Result<String, MelodyError> {
        let mut output = String::new();

        writeln!(output, "#include <ZumoBuzzer.h>")?;
        writeln!(output, "#include <Pushbutton.h>")?;
        writeln!(output)?;
        writeln!(output, "#define LED_PIN 13")?;
        writeln!(output)?;
        writeln!(output, "#define MELODY_LENGTH {}", self.len())?;

        write_array(&mut output, "char", "notes", &self.notes)?;
        write_array(&mut output, "int", "durations", &self.durations)?;
        if self.emits_delays() {
            write_array(&mut output, "int", "delays", &self.delays)?;
        }
        if self.emits_volumes() {
            write_array(&mut output, "int", "volumes", &self.volumes)?;
        }

        writeln!(output)?;
        writeln!(output, "ZumoBuzzer buzzer;")?;
        writeln!(output, "Pushbutton button(ZUMO_BUTTON);")?;
        writeln!(output, "unsigned int currentIdx;")?;
        writeln!(output)?;
        writeln!(output, "void setup()")?;
        writeln!(output, "{{")?;
        writeln!(output, "  currentIdx = 0;")?;
        writeln!(output)?;
        writeln!(output, "  pinMode(LED_PIN, OUTPUT);")?;
        writeln!(output)?;
        writeln!(output, "  // Wait for button to play the melody.")?;
        writeln!(output, "  button.waitForButton();")?;
        writeln!(output, "}}")?;
        writeln!(output)?;
        writeln!(output, "void loop()")?;
        writeln!(output, "{{")?;

        let guard = if self.waits_for_buzzer() {
            " && !buzzer.isPlaying()"
        } else {
            ""
        };
        writeln!(output, "  if (currentIdx < MELODY_LENGTH{})", guard)?;
        writeln!(output, "  {{")?;
        writeln!(output, "    if (notes[currentIdx] == SILENT_NOTE)")?;
        writeln!(output, "    {{")?;
        writeln!(output, "      digitalWrite(LED_PIN, LOW);")?;
        writeln!(output, "    }}")?;
        writeln!(output, "    else")?;
        writeln!(output, "    {{")?;
        writeln!(output, "      digitalWrite(LED_PIN, HIGH);")?;
        writeln!(output, "    }}")?;

        let volume = match self.uniform_volume {
            Some(v) => v.to_string(),
            None => "volumes[currentIdx]".to_string(),
        };
        writeln!(
            output,
            "    buzzer.playNote(notes[currentIdx], durations[currentIdx], {});",
            volume
        )?;
        if self.use_delays {
            let source = if self.duration_equals_delay {
                "durations"
            } else {
                "delays"
            };
            writeln!(output, "    delay({}[currentIdx]);", source)?;
        }

        writeln!(output)?;
        writeln!(output, "    currentIdx++;")?;
        writeln!(output, "  }}")?;
        writeln!(output, "  else if (currentIdx >= MELODY_LENGTH) {{")?;
        writeln!(output, "    digitalWrite(LED_PIN, LOW);")?;
        writeln!(output, "  }}")?;
        writeln!(output)?;
        writeln!(
            output,
            "  // let the user pushbutton function as a stop/reset melody button"
        )?;
        writeln!(output, "  if (button.isPressed())")?;
        writeln!(output, "  {{")?;
        writeln!(output, "    buzzer.stopPlaying();")?;
        writeln!(output, "    digitalWrite(LED_PIN, LOW);")?;
        writeln!(output, "    if (currentIdx < MELODY_LENGTH)")?;
        writeln!(output, "    {{")?;
        writeln!(output, "      // terminate the melody")?;
        writeln!(output, "      currentIdx = MELODY_LENGTH;")?;
        writeln!(output, "    }}")?;
        writeln!(output, "    else")?;
        writeln!(output, "    {{")?;
        writeln!(output, "      // restart the melody")?;
        writeln!(output, "      currentIdx = 0;")?;
        writeln!(output, "    }}")?;
        writeln!(output, "    // wait here for the button to be released")?;
        writeln!(output, "    button.waitForRelease();")?;
        writeln!(output, "  }}")?;
        writeln!(output, "}}")?;

        Ok(output)
    }
}

/// `const unsigned <ty> <name>[MELODY_LENGTH] = { ... };` with a wrapped body
fn write_array<T: Display>(
    output: &mut String,
    ty: &str,
    name: &str,
    values: &[T],
) -> std::fmt::Result {
    writeln!(output)?;
    writeln!(output, "const unsigned {} {}[MELODY_LENGTH] =", ty, name)?;
    writeln!(output, "{{")?;
    writeln!(output, "  {}", wrap_values(values, WRAP_WIDTH).join("\n  "))?;
    writeln!(output, "}};")
}

/// Greedy comma-separated word wrap; no line exceeds `width` unless a single value does
fn wrap_values<T: Display>(values: &[T], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for (i, value) in values.iter().enumerate() {
        let word = if i + 1 < values.len() {
            format!("{},", value)
        } else {
            value.to_string()
        };

        if line.is_empty() {
            line = word;
        } else if line.len() + 1 + word.len() <= width {
            line.push(' ');
            line.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut line, word));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
