#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "seqstamp_config.json";
const DEFAULT_HOTKEY: &str = "ctrl+q";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub hotkey: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
        }
    }
}

/// Reads the config from the storage dir, writing the defaults on first run
/// so the file is there to edit. A malformed file is an error, not a silent
/// fallback to defaults.
pub fn load_or_init(storage_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = storage_dir.join(CONFIG_FILE);
    if !path.exists() {
        let config = AppConfig::default();
        save(&path, &config)?;
        return Ok(config);
    }

    let raw = std::fs::read_to_string(&path)?;
    let config = serde_json::from_str(&raw)?;
    Ok(config)
}

fn save(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config io: {err}"),
            Self::Parse(err) => write!(f, "config parse: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
