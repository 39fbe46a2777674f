//! Tests for the compact melody encoder

use super::*;
use crate::{Event, Track};

fn on(time: Tick, pitch: u8, volume: u8) -> Event {
    Event::NoteOn {
        time,
        pitch,
        volume,
    }
}

fn off(time: Tick, pitch: u8) -> Event {
    Event::NoteOff { time, pitch }
}

fn note(index: usize, pitch: Option<u8>, duration: Tick, delay: Tick, volume: u8) -> Note {
    Note {
        sequence_index: index,
        pitch,
        duration,
        delay,
        volume,
    }
}

fn melody_of_notes(notes: &[Note]) -> String {
    let config = EncodeConfig::default();
    let analysis = TrackAnalysis::of(notes, &config.volume);
    CompactEncoder::new(&config)
        .encode(notes, &analysis)
        .unwrap()
        .melody
}

fn melody(events: &[Event]) -> String {
    melody_of_notes(&Track::from_events(events).notes)
}

#[test]
fn test_single_note() {
    assert_eq!(melody(&[on(0, 60, 100), off(10, 60)]), "V9 O4 T720 c12");
}

#[test]
fn test_uniform_volume_single_leading_token() {
    let melody = melody(&[on(0, 60, 127), off(60, 60), on(60, 64, 127), off(120, 64)]);
    assert!(melody.starts_with("V13 "));
    assert_eq!(melody.matches('V').count(), 1);
    assert_eq!(melody, "V13 O4 T120 c2e2");
}

#[test]
fn test_per_note_volume() {
    let melody = melody(&[on(0, 60, 127), off(60, 60), on(60, 62, 110), off(120, 62)]);
    assert_eq!(melody, "O4 T120 V13 c2V10 d2");
}

#[test]
fn test_octave_shifts_relative_to_baseline() {
    let melody = melody(&[
        on(0, 60, 100),
        off(120, 60),
        on(120, 62, 100),
        off(240, 62),
        on(240, 48, 100),
        off(360, 48),
        on(360, 72, 100),
        off(480, 72),
    ]);
    // Baseline octave 5 (O4); octave 4 shifts with '>', octave 6 with '<'
    assert_eq!(melody, "V9 O4 T60 cd>c<c");
}

#[test]
fn test_silence_becomes_rests() {
    let melody = melody(&[on(0, 60, 100), off(10, 60), on(100, 62, 100), off(110, 62)]);
    // 90 ticks of silence: floor(60 * 90 / (16 * 120)) = 2 rests
    assert_eq!(melody, "V9 O4 T131 c12RRd12");
}

#[test]
fn test_rest_after_long_delay() {
    let notes = [note(1, Some(60), 30, 1000, 127)];
    let expected = format!("V13 O4 T240 c4{}", "R".repeat(30));
    assert_eq!(melody_of_notes(&notes), expected);
}

#[test]
fn test_huge_gap_is_rejected() {
    let config = EncodeConfig::default();
    let track = Track::from_events(&[
        on(0, 60, 100),
        off(10, 60),
        on(200_000_000_000_000_000, 62, 100),
        off(200_000_000_000_000_010, 62),
    ]);
    let analysis = TrackAnalysis::of(&track.notes, &config.volume);

    let result = CompactEncoder::new(&config).encode(&track.notes, &analysis);
    assert!(matches!(
        result,
        Err(MelodyError::RestTooLong {
            max: MAX_REST_TOKENS,
            ..
        })
    ));
}

#[test]
fn test_rest_run_at_limit() {
    // 60 * 131072 / (16 * 120) = 4096 rests
    let notes = [note(1, Some(60), 10, 10 + 131_072, 127)];
    let melody = melody_of_notes(&notes);
    assert_eq!(melody.matches('R').count(), MAX_REST_TOKENS);

    let notes = [note(1, Some(60), 10, 10 + 131_072 + 32, 127)];
    let config = EncodeConfig::default();
    let analysis = TrackAnalysis::of(&notes, &config.volume);
    assert!(CompactEncoder::new(&config).encode(&notes, &analysis).is_err());
}

#[test]
fn test_extreme_durations_keep_tempo_finite() {
    let config = EncodeConfig::default();
    let encoder = CompactEncoder::new(&config);
    let notes = [
        note(1, Some(60), Tick::MAX, Tick::MAX, 100),
        note(2, Some(62), Tick::MAX, Tick::MAX, 100),
    ];
    // Saturated total: the tempo rounds up to a single beat
    assert_eq!(encoder.tempo(&notes), Some(1));
}

#[test]
fn test_negative_delay_adds_no_rest() {
    let notes = [
        note(1, Some(60), 10, -6, 127),
        note(2, Some(64), 2, 2, 127),
    ];
    assert!(!melody_of_notes(&notes).contains('R'));
}

#[test]
fn test_zero_duration_note() {
    let notes = [note(1, Some(60), 0, 0, 127)];
    // No duration at all: tempo is omitted, divisor uses one tick
    assert_eq!(melody_of_notes(&notes), "V13 O4 c120");
}

#[test]
fn test_baseline_octave_tie_break() {
    let notes = [
        note(1, Some(48), 1, 1, 100),
        note(2, None, 1, 1, 100),
        note(3, Some(60), 1, 1, 100),
        note(4, Some(61), 1, 1, 100),
        note(5, Some(50), 1, 1, 100),
        note(6, Some(72), 1, 1, 100),
    ];
    // Octaves 4 and 5 both appear twice; 4 was seen first
    assert_eq!(baseline_octave(&notes), Some(4));

    let notes = [note(1, Some(60), 1, 1, 100), note(2, Some(48), 1, 1, 100)];
    assert_eq!(baseline_octave(&notes), Some(5));

    assert_eq!(baseline_octave(&[note(1, None, 5, 5, 100)]), None);
    assert_eq!(baseline_octave(&[]), None);
}

#[test]
fn test_tempo_counts_only_sounding_notes() {
    let config = EncodeConfig::default();
    let encoder = CompactEncoder::new(&config);
    let notes = [
        note(1, None, 20, 20, 100),
        note(2, Some(60), 40, 40, 100),
        note(3, Some(62), 60, 60, 100),
    ];
    // ceil(120 * 60 * 2 / 120)
    assert_eq!(encoder.tempo(&notes), Some(120));
}

#[test]
fn test_escaped() {
    let program = CompactProgram {
        melody: "a\"b\\".to_string(),
    };
    assert_eq!(program.escaped(), "a\\\"b\\\\");
}

#[test]
fn test_render_sketch() {
    let program = CompactProgram {
        melody: "V9 O4 T720 c12".to_string(),
    };
    let sketch = program.render().unwrap();

    assert!(sketch.contains("#include <avr/pgmspace.h>"));
    assert!(sketch.contains("const char melody[] PROGMEM = \"V9 O4 T720 c12\";"));
    assert!(sketch.contains("buzzer.playFromProgramSpace(melody);"));
    assert!(!sketch.contains("MELODY_LENGTH"));
}
