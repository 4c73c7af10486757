use std::path::PathBuf;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("required settings file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid settings in '{path}': {source}")]
    Settings {
        path: PathBuf,
        source: SettingsError,
    },
}
