//! Dump input resolution

use anyhow::{Context, Result, bail};
use std::io::{IsTerminal, Read};
use std::path::Path;

/// Stem used for stdin input and the fallback file names
pub const DEFAULT_STEM: &str = "midi";

/// Fallback dump files, tried in order in the working directory
const FALLBACK_FILES: [&str; 2] = ["midi", "midi.mid"];

/// A dump read into memory
#[derive(Debug)]
pub struct DumpInput {
    /// Prefix for generated sketch names
    pub stem: String,
    /// Human-readable origin for diagnostics
    pub source: String,
    pub text: String,
}

impl DumpInput {
    /// Explicit path, else piped stdin, else `midi` / `midi.mid`
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            let mut text = String::new();
            stdin
                .lock()
                .read_to_string(&mut text)
                .context("Failed to read dump from stdin")?;
            return Ok(Self {
                stem: DEFAULT_STEM.to_string(),
                source: "<stdin>".to_string(),
                text,
            });
        }

        for name in FALLBACK_FILES {
            let path = Path::new(name);
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        bail!("No suitable midi dump file provided")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dump: {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_STEM)
            .to_string();

        Ok(Self {
            stem,
            source: path.display().to_string(),
            text,
        })
    }
}
