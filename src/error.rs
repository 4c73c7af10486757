use crate::loader::LoadError;
use crate::settings::SettingsError;
use thiserror::Error;

/// Top-level error type for the buildsettings library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("failed to parse TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}
