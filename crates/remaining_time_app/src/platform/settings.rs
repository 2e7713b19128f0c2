use std::fs;
use std::path::Path;

use remaining_time_engine::PrinterConfig;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogSettings;

pub const DEFAULT_SETTINGS_PATH: &str = "./printer.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

/// Contents of the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub printer: PrinterConfig,
    #[serde(default)]
    pub logging: LogSettings,
}

pub(crate) fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.display().to_string(),
        source,
    })
}
