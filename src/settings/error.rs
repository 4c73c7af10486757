use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid settings document at '{path}': expected {expected}, found {found}")]
    InvalidShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown settings group '{name}'")]
    UnknownGroup { name: String },

    #[error("settings group cycle detected: {chain}")]
    GroupCycle { chain: String },
}
