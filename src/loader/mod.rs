//! Loading settings documents from files.

mod builder;
mod error;
mod file;

pub use builder::SettingsLoader;
pub use error::LoadError;
pub use file::Format;
