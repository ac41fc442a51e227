use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

// ============================================================================
// File Formats
// ============================================================================

/// Supported on-disk formats for manifests, snapshots and settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "Unsupported file format for {} (expected .toml or .json)",
                path.display()
            ),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Read and parse a TOML or JSON file, chosen by extension
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    match format {
        ConfigFormat::Toml => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display())),
        ConfigFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON format in {}", path.display())),
    }
}

/// Load `<name>.toml` or `<name>.json` from a directory, preferring TOML
pub fn load_config<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<(T, PathBuf)> {
    for format in [ConfigFormat::Toml, ConfigFormat::Json] {
        let path = dir.join(format!("{}.{}", name, format.extension()));
        if path.exists() {
            let value = load_file(&path)?;
            return Ok((value, path));
        }
    }
    bail!("No {}.toml or {}.json in {}", name, name, dir.display())
}

// ============================================================================
// Settings
// ============================================================================

/// Output style for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User settings from `config.toml` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Worker threads for a pass
    pub jobs: usize,
    /// Default observed-state snapshot
    pub observed: Option<String>,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: 4,
            observed: None,
            format: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let dir = paths::config_dir()?;
        if !dir.join("config.toml").exists() && !dir.join("config.json").exists() {
            log::debug!("No settings in {}, using defaults", dir.display());
            return Ok(Self::default());
        }
        let (settings, path) = load_config::<Self>(&dir, "config")?;
        log::debug!("Loaded settings from {}", path.display());
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            bail!("jobs must be at least 1");
        }
        Ok(())
    }

    /// Expanded path of the default observed-state snapshot
    pub fn observed_path(&self) -> Option<PathBuf> {
        self.observed.as_deref().map(paths::expand)
    }
}

// ============================================================================
// Tests
// ============================================================================
