//! Layered build settings.
//!
//! Settings are declared once in a base table, overridden per named
//! configuration such as `Debug` or `Release`, and composed from named
//! groups. Documents come either as a flat table of settings or in the
//! structured `{base, configs, groups}` form.
//!
//! ```
//! use buildsettings::{merge, Settings};
//!
//! let settings = Settings::from_toml_str(
//!     r#"
//!     [base]
//!     FLAGS = ["-a"]
//!
//!     [configs.Release.base]
//!     "FLAGS:REPLACE" = ["-O"]
//!     "#,
//! )?;
//!
//! let release = &settings.config_settings["Release"];
//! let merged = merge(&release.build_settings, &settings.build_settings);
//! assert_eq!(merged.get("FLAGS").map(ToString::to_string).as_deref(), Some("[-O]"));
//! # Ok::<(), buildsettings::Error>(())
//! ```

pub mod loader;
pub mod settings;
mod error;

pub use error::Error;
pub use loader::{LoadError, SettingsLoader};
pub use settings::{
    merge, BuildSettings, DocumentShape, GroupSource, Number, SettingKey, SettingValue, Settings,
    SettingsError,
};
