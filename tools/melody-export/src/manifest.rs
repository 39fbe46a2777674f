//! melody.toml parsing

use anyhow::{Context, Result};
use nether_melody::EncodeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given
pub const MANIFEST_FILE: &str = "melody.toml";

/// melody.toml structure. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct MelodyManifest {
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub output: OutputSection,
}

/// Output section
#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    /// Directory sketches are written to (default: working directory)
    pub dir: Option<PathBuf>,
}

impl MelodyManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse melody.toml")
    }

    /// Explicit path, else `melody.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default = Path::new(MANIFEST_FILE);
        if default.is_file() {
            tracing::debug!("Using {}", MANIFEST_FILE);
            Self::load(default)
        } else {
            Ok(Self::default())
        }
    }
}
