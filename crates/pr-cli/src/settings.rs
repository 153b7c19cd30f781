//! File settings for the CLI.
//!
//! Searched in order: `--config`, `./roulette.toml`, then
//! `<config dir>/persona-roulette/config.toml`. No file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use pr_roulette::RouletteConfig;
use serde::Deserialize;

const LOCAL_FILE: &str = "roulette.toml";
const APP_DIR: &str = "persona-roulette";

/// Settings read from a TOML file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where filters and records are stored.
    pub state_dir: Option<PathBuf>,
    /// Custom roster file.
    pub roster: Option<PathBuf>,
    /// Log level when neither `RUST_LOG` nor `-v` is given.
    pub log_level: String,
    /// Engine settings.
    pub roulette: RouletteConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: None,
            roster: None,
            log_level: "warn".to_string(),
            roulette: RouletteConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings, returning the file they came from.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), String> {
        let Some(path) = find_file(explicit)? else {
            return Ok((Self::default(), None));
        };
        let text = fs::read_to_string(&path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let settings = Self::from_toml(&text)
            .map_err(|e| format!("invalid settings in {}: {e}", path.display()))?;
        Ok((settings, Some(path)))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(text)?;
        let spin = settings.roulette.spin.clone();
        settings.roulette = settings.roulette.with_spin(spin);
        Ok(settings)
    }

    /// Default state directory for this platform.
    pub fn default_state_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".persona-roulette"))
    }
}

fn find_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, String> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(Some(path.to_path_buf()))
        } else {
            Err(format!("settings file not found: {}", path.display()))
        };
    }

    let candidates = [
        Some(PathBuf::from(LOCAL_FILE)),
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml")),
    ];
    Ok(candidates.into_iter().flatten().find(|p| p.exists()))
}
