//! Tokenizer for textual MIDI dumps (`mf2t` / `midicomp` output)
//!
//! Only the handful of line shapes the converter needs are understood:
//!
//! ```text
//! MFile 1 2 96
//! MTrk
//! 0 Meta TrkName "Lead"
//! 0 On ch=1 n=60 v=100
//! 48 Off ch=1 n=60 v=0
//! 48 TrkEnd
//! TrkEnd
//! ```
//!
//! Every other line is ignored. A malformed note line poisons only its own
//! track: the rest of that track is skipped up to `TrkEnd`.

use crate::{DumpError, Event, MIDI_PITCH_MAX, MIDI_VOLUME_MAX, Tick};

/// `MFile <format> <ntracks> <division>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpHeader {
    pub format: u16,
    pub ntracks: usize,
    pub division: i32,
}

/// One tokenized dump line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpLine {
    Header(DumpHeader),
    /// `MTrk`
    TrackStart,
    Event(Event),
    Ignored,
}

/// Events of one track, or the error that cut it short
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDump {
    /// 1-based, in order of appearance
    pub number: usize,
    pub events: Result<Vec<Event>, DumpError>,
}

impl TrackDump {
    fn new(number: usize) -> Self {
        Self {
            number,
            events: Ok(Vec::new()),
        }
    }
}

/// A whole dump split into tracks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpFile {
    pub header: Option<DumpHeader>,
    pub tracks: Vec<TrackDump>,
}

impl DumpFile {
    /// Whether the track count matches the `MFile` header (true without a header)
    pub fn track_count_matches(&self) -> bool {
        self.header
            .is_none_or(|header| header.ntracks == self.tracks.len())
    }
}

/// Split a dump into per-track event lists.
///
/// Only an invalid `MFile` header before the first track fails the whole dump.
pub fn parse_dump(text: &str) -> Result<DumpFile, DumpError> {
    let mut file = DumpFile::default();
    let mut current: Option<TrackDump> = None;

    for (i, raw) in text.lines().enumerate() {
        let number = i + 1;

        let line = match parse_line(raw, number) {
            Ok(line) => line,
            Err(err) => {
                match current.as_mut() {
                    Some(track) if track.events.is_ok() => {
                        tracing::warn!(track = track.number, "{}, skipping rest of track", err);
                        track.events = Err(err);
                    }
                    Some(_) => {}
                    None if matches!(err, DumpError::InvalidHeader { .. }) => return Err(err),
                    None => tracing::debug!(line = number, "ignoring line outside of a track"),
                }
                continue;
            }
        };

        match line {
            DumpLine::Header(header) => file.header = Some(header),
            DumpLine::TrackStart => {
                if let Some(track) = current.take() {
                    tracing::debug!(track = track.number, "track closed without TrkEnd");
                    file.tracks.push(track);
                }
                current = Some(TrackDump::new(file.tracks.len() + 1));
            }
            DumpLine::Event(event) => {
                let Some(track) = current.as_mut() else {
                    continue;
                };
                let end = event == Event::TrackEnd;
                if let Ok(events) = &mut track.events {
                    events.push(event);
                }
                if end {
                    file.tracks.extend(current.take());
                }
            }
            DumpLine::Ignored => {}
        }
    }

    if let Some(track) = current.take() {
        tracing::debug!(track = track.number, "track closed at end of input");
        file.tracks.push(track);
    }

    Ok(file)
}

/// Tokenize a single line; `number` is the 1-based line number used in errors
pub fn parse_line(line: &str, number: usize) -> Result<DumpLine, DumpError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        [] => Ok(DumpLine::Ignored),
        ["MFile", rest @ ..] => parse_header(rest, number).map(DumpLine::Header),
        ["MTrk", ..] => Ok(DumpLine::TrackStart),
        ["TrkEnd", ..] => Ok(DumpLine::Event(Event::TrackEnd)),
        [_, "Meta", "SeqName" | "TrkName", text @ ..] => {
            let name = text.join(" ");
            Ok(DumpLine::Event(Event::TrackMeta {
                name: name.trim_matches(|c| c == '"' || c == ' ').to_string(),
            }))
        }
        [time, "On", fields @ ..] => {
            let time = parse_time(time, number)?;
            let pitch = parse_field(fields.get(1), "pitch", MIDI_PITCH_MAX, number)?;
            let volume = parse_field(fields.get(2), "volume", MIDI_VOLUME_MAX, number)?;
            Ok(DumpLine::Event(if volume == 0 {
                Event::NoteOff { time, pitch }
            } else {
                Event::NoteOn {
                    time,
                    pitch,
                    volume,
                }
            }))
        }
        [time, "Off", fields @ ..] => {
            let time = parse_time(time, number)?;
            let pitch = parse_field(fields.get(1), "pitch", MIDI_PITCH_MAX, number)?;
            Ok(DumpLine::Event(Event::NoteOff { time, pitch }))
        }
        _ => Ok(DumpLine::Ignored),
    }
}

fn parse_header(fields: &[&str], line: usize) -> Result<DumpHeader, DumpError> {
    let invalid = || DumpError::InvalidHeader { line };
    match fields {
        [format, ntracks, division, ..] => Ok(DumpHeader {
            format: format.parse().map_err(|_| invalid())?,
            ntracks: ntracks.parse().map_err(|_| invalid())?,
            division: division.parse().map_err(|_| invalid())?,
        }),
        _ => Err(invalid()),
    }
}

fn parse_time(value: &str, line: usize) -> Result<Tick, DumpError> {
    let time: Tick = value.parse().map_err(|_| DumpError::InvalidField {
        line,
        field: "time",
        value: value.to_string(),
    })?;
    if time < 0 {
        return Err(DumpError::NegativeTime { line, value: time });
    }
    Ok(time)
}

/// `key=<value>` with a 0..=max range check
fn parse_field(
    field: Option<&&str>,
    name: &'static str,
    max: u8,
    line: usize,
) -> Result<u8, DumpError> {
    let field = field.ok_or(DumpError::MissingField { line, field: name })?;
    let value = field.split_once('=').map_or(*field, |(_, value)| value);

    let parsed: i64 = value.parse().map_err(|_| DumpError::InvalidField {
        line,
        field: name,
        value: value.to_string(),
    })?;

    u8::try_from(parsed)
        .ok()
        .filter(|v| *v <= max)
        .ok_or(DumpError::OutOfRange {
            line,
            field: name,
            value: parsed,
            max,
        })
}
