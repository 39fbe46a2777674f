//! Per-track console report and sketch file naming

use anyhow::Result;
use nether_melody::{TrackAnalysis, TrackReport};
use regex::Regex;

/// Builds `<stem>-<track>-<name>.ino` file names
pub struct SketchNamer {
    stem: String,
    non_word: Regex,
}

impl SketchNamer {
    pub fn new(stem: &str) -> Result<Self> {
        Ok(Self {
            stem: stem.to_string(),
            non_word: Regex::new(r"[^\w]+")?,
        })
    }

    /// Track name with every run of non-word characters removed
    pub fn sanitize(&self, name: &str) -> String {
        self.non_word.replace_all(name, "").into_owned()
    }

    pub fn file_name(&self, report: &TrackReport) -> String {
        format!(
            "{}-{}-{}.ino",
            self.stem,
            report.number,
            self.sanitize(&report.name)
        )
    }
}

/// Lines printed for a converted track
pub fn report_lines(report: &TrackReport, use_delays: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "Track #{}, Name: \"{}\"",
        report.number, report.name
    )];
    lines.extend(report.warnings.iter().map(|w| w.to_string()));

    if report.is_empty() {
        lines.push("Empty track, no file written.".to_string());
    } else {
        lines.extend(analysis_lines(&report.analysis, use_delays));
    }
    lines
}

fn analysis_lines(analysis: &TrackAnalysis, use_delays: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(volume) = analysis.uniform_volume {
        lines.push(format!("Volume: {}", volume));
    }

    let not = if analysis.duration_equals_delay {
        ""
    } else {
        "not "
    };
    lines.push(format!(
        "Durations are {0}equal to delays; {0}all notes are nonoverlapping.",
        not
    ));
    lines.push(format!(
        "Use of delays {} according to setting.",
        if use_delays { "enabled" } else { "disabled" }
    ));
    lines
}

/// Report lines plus the note table, for `inspect`
pub fn inspect_lines(report: &TrackReport, use_delays: bool) -> Vec<String> {
    let mut lines = report_lines(report, use_delays);
    if report.notes.is_empty() {
        return lines;
    }

    lines.push(format!(
        "{:>5}  {:>5}  {:>8}  {:>8}  {:>6}",
        "index", "pitch", "duration", "delay", "volume"
    ));
    for note in &report.notes {
        let pitch = note.pitch.map_or_else(|| "-".to_string(), |p| p.to_string());
        lines.push(format!(
            "{:>5}  {:>5}  {:>8}  {:>8}  {:>6}",
            note.sequence_index, pitch, note.duration, note.delay, note.volume
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_melody::{EncodeConfig, Event, WarningCode, inspect_track};

    fn report(name: &str, events: &[Event]) -> TrackReport {
        let mut events = events.to_vec();
        events.insert(
            0,
            Event::TrackMeta {
                name: name.to_string(),
            },
        );
        inspect_track(4, &events, &EncodeConfig::default())
    }

    #[test]
    fn test_sanitize() {
        let namer = SketchNamer::new("song").unwrap();
        assert_eq!(namer.sanitize("Lead Line (v2)!"), "LeadLinev2");
        assert_eq!(namer.sanitize("bass_1"), "bass_1");
        assert_eq!(namer.sanitize(""), "");
    }

    #[test]
    fn test_file_name() {
        let namer = SketchNamer::new("song").unwrap();
        assert_eq!(namer.file_name(&report("Piano #1", &[])), "song-4-Piano1.ino");
        assert_eq!(namer.file_name(&report("", &[])), "song-4-.ino");
    }

    #[test]
    fn test_report_lines_empty_track() {
        let lines = report_lines(&report("Intro", &[]), true);
        assert_eq!(
            lines,
            vec![
                "Track #4, Name: \"Intro\"".to_string(),
                "Empty track, no file written.".to_string()
            ]
        );
    }

    #[test]
    fn test_report_lines_with_warnings() {
        let events = [
            Event::NoteOn {
                time: 0,
                pitch: 60,
                volume: 127,
            },
            Event::NoteOn {
                time: 2,
                pitch: 64,
                volume: 127,
            },
            Event::NoteOff { time: 4, pitch: 64 },
            Event::NoteOff { time: 8, pitch: 60 },
        ];
        let lines = report_lines(&report("Lead", &events), false);

        assert_eq!(lines[0], "Track #4, Name: \"Lead\"");
        assert_eq!(lines[1], WarningCode::OverlappingNotes.message());
        assert_eq!(lines[2], "Volume: 13");
        assert_eq!(
            lines[3],
            "Durations are equal to delays; all notes are nonoverlapping."
        );
        assert_eq!(lines[4], "Use of delays disabled according to setting.");
    }

    #[test]
    fn test_report_lines_nested_notes() {
        let events = [
            Event::NoteOn {
                time: 0,
                pitch: 60,
                volume: 127,
            },
            Event::NoteOn {
                time: 1,
                pitch: 62,
                volume: 127,
            },
            Event::NoteOn {
                time: 2,
                pitch: 64,
                volume: 127,
            },
            Event::NoteOff { time: 3, pitch: 64 },
            Event::NoteOff { time: 4, pitch: 62 },
            Event::NoteOff { time: 5, pitch: 60 },
        ];
        let lines = report_lines(&report("Chord", &events), true);

        assert!(lines.contains(
            &"Durations are not equal to delays; not all notes are nonoverlapping.".to_string()
        ));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Use of delays enabled according to setting.")
        );
    }

    #[test]
    fn test_inspect_lines_note_table() {
        let events = [
            Event::NoteOn {
                time: 5,
                pitch: 60,
                volume: 100,
            },
            Event::NoteOff { time: 10, pitch: 60 },
        ];
        let lines = inspect_lines(&report("Lead", &events), true);

        assert!(lines.iter().any(|l| l.contains("index")));
        // Leading silence, then the note
        assert!(lines.iter().any(|l| l.trim_start().starts_with("1      -")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("2     60")));
    }
}
