//! melody-export - MIDI dump to Zumo buzzer sketch converter
//!
//! Reads a textual MIDI dump (mf2t / midicomp output) and writes one Arduino
//! sketch per non-empty track.

mod input;
mod manifest;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nether_melody::{DumpFile, EncoderKind, convert_track, inspect_track, parse_dump};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use input::DumpInput;
use manifest::MelodyManifest;
use report::SketchNamer;

#[derive(Parser)]
#[command(name = "melody-export")]
#[command(about = "Convert MIDI dumps to Zumo buzzer melodies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every track to an Arduino sketch
    Convert {
        /// Dump file (default: piped stdin, then ./midi or ./midi.mid)
        input: Option<PathBuf>,

        /// Output directory (overrides melody.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoder: table or compact (overrides melody.toml)
        #[arg(short, long)]
        format: Option<EncoderKind>,

        /// Do not emit delays between notes
        #[arg(long)]
        no_delays: bool,

        /// Path to melody.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print notes, analysis and warnings without writing sketches
    Inspect {
        /// Dump file (default: piped stdin, then ./midi or ./midi.mid)
        input: Option<PathBuf>,

        /// Path to melody.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.command {
        Commands::Convert { verbose: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };

    // Initialize logging; stdout is reserved for the track report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            no_delays,
            config,
            verbose: _,
        } => {
            let manifest = MelodyManifest::discover(config.as_deref())?;
            let mut encode = manifest.encode;
            if let Some(format) = format {
                encode.format = format;
            }
            if no_delays {
                encode.use_delays = false;
            }
            let out_dir = output
                .or(manifest.output.dir)
                .unwrap_or_else(|| PathBuf::from("."));

            let input = DumpInput::resolve(input.as_deref())?;
            let dump = load_dump(&input)?;
            tracing::debug!("Converting {} tracks as {}", dump.tracks.len(), encode.format);

            // Tracks are independent; collect keeps track order for reporting
            let results: Vec<_> = dump
                .tracks
                .par_iter()
                .map(|track| {
                    let report = match &track.events {
                        Ok(events) => convert_track(track.number, events, &encode)
                            .map_err(anyhow::Error::from),
                        Err(err) => Err(anyhow::Error::from(err.clone())),
                    };
                    (track.number, report)
                })
                .collect();

            std::fs::create_dir_all(&out_dir).with_context(|| {
                format!("Failed to create output directory: {}", out_dir.display())
            })?;
            let namer = SketchNamer::new(&input.stem)?;

            let mut written = 0;
            for (number, result) in results {
                let report = match result {
                    Ok(report) => report,
                    Err(err) => {
                        print_failure(number, &err);
                        continue;
                    }
                };

                for line in report::report_lines(&report, encode.use_delays) {
                    println!("{}", line);
                }
                if let Some(sketch) = &report.sketch {
                    let path = out_dir.join(namer.file_name(&report));
                    write_sketch(&path, sketch)?;
                    written += 1;
                }
            }

            tracing::info!(
                "Wrote {} sketch(es) from {} track(s) of {}",
                written,
                dump.tracks.len(),
                input.source
            );
        }

        Commands::Inspect { input, config } => {
            let manifest = MelodyManifest::discover(config.as_deref())?;
            let input = DumpInput::resolve(input.as_deref())?;
            let dump = load_dump(&input)?;

            for track in &dump.tracks {
                match &track.events {
                    Ok(events) => {
                        let report = inspect_track(track.number, events, &manifest.encode);
                        for line in report::inspect_lines(&report, manifest.encode.use_delays) {
                            println!("{}", line);
                        }
                    }
                    Err(err) => print_failure(track.number, &anyhow::Error::from(err.clone())),
                }
            }
        }
    }

    Ok(())
}

fn load_dump(input: &DumpInput) -> Result<DumpFile> {
    let dump =
        parse_dump(&input.text).with_context(|| format!("Failed to parse {}", input.source))?;

    if !dump.track_count_matches() {
        tracing::warn!(
            "Header announces {} track(s), found {}",
            dump.header.map_or(0, |header| header.ntracks),
            dump.tracks.len()
        );
    }
    Ok(dump)
}

fn print_failure(number: usize, err: &anyhow::Error) {
    println!("Track #{}, skipped: {:#}", number, err);
}

fn write_sketch(path: &Path, sketch: &str) -> Result<()> {
    std::fs::write(path, sketch)
        .with_context(|| format!("Failed to write sketch: {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
