//! File-based settings documents.

use std::path::Path;

use super::LoadError;
use crate::settings::{BuildSettings, Settings};
use crate::Error;

/// Text format of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Picks the format from the file extension: `.json` is JSON, anything
    /// else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

impl Settings {
    /// Parses a settings document from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let table: toml::Table = toml::from_str(s)?;
        Ok(Settings::from_document(&BuildSettings::from(table))?)
    }

    /// Parses a settings document from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Loads and parses a settings file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
pub(super) fn load_settings_file(path: &Path, required: bool) -> Result<Option<Settings>, LoadError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                return Err(LoadError::FileNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "optional settings file not found, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(LoadError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let document = parse_document(path, &contents)?;
    let settings = Settings::from_document(&document).map_err(|e| LoadError::Settings {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        configs = settings.config_settings.len(),
        groups = settings.groups.len(),
        "loaded settings file"
    );
    Ok(Some(settings))
}

fn parse_document(path: &Path, contents: &str) -> Result<BuildSettings, LoadError> {
    match Format::from_path(path) {
        Format::Toml => {
            let table: toml::Table = toml::from_str(contents).map_err(|e| LoadError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(BuildSettings::from(table))
        }
        Format::Json => serde_json::from_str(contents).map_err(|e| LoadError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{SettingValue, SettingsError};
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/settings.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a/settings.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a/settings.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("a/settings")), Format::Toml);
    }

    #[test]
    fn test_loads_toml_file() {
        let file = temp_file(
            ".toml",
            r#"
            groups = ["Common"]

            [base]
            PRODUCT_NAME = "App"

            [configs.Debug]
            OPT = "0"
            "#,
        );

        let settings = load_settings_file(file.path(), true).unwrap().unwrap();
        assert_eq!(
            settings.build_settings.get("PRODUCT_NAME"),
            Some(&SettingValue::from("App"))
        );
        assert_eq!(
            settings.config_settings["Debug"].build_settings.get("OPT"),
            Some(&SettingValue::from("0"))
        );
        assert_eq!(settings.groups, vec!["Common"]);
    }

    #[test]
    fn test_loads_json_file() {
        let file = temp_file(".json", r#"{"FLAGS": ["-a"], "LEVEL": 2}"#);

        let settings = load_settings_file(file.path(), true).unwrap().unwrap();
        assert_eq!(
            settings.build_settings.get("FLAGS"),
            Some(&SettingValue::from(vec!["-a"]))
        );
        assert_eq!(settings.build_settings.get("LEVEL"), Some(&SettingValue::from(2)));
    }

    #[test]
    fn test_required_missing() {
        let result = load_settings_file(Path::new("/nonexistent/path/settings.toml"), true);
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_optional_missing() {
        let result = load_settings_file(Path::new("/nonexistent/path/settings.toml"), false);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_invalid_toml() {
        let file = temp_file(".toml", "this is = = not toml");
        let result = load_settings_file(file.path(), true);
        assert!(matches!(result, Err(LoadError::TomlParse { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let file = temp_file(".json", "{not json");
        let result = load_settings_file(file.path(), true);
        assert!(matches!(result, Err(LoadError::JsonParse { .. })));
    }

    #[test]
    fn test_shape_error_carries_file_path() {
        let file = temp_file(".toml", "groups = [1]");
        let result = load_settings_file(file.path(), true);

        match result {
            Err(LoadError::Settings { path, source }) => {
                assert_eq!(path, file.path());
                assert!(matches!(source, SettingsError::InvalidShape { .. }));
            }
            other => panic!("expected settings error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_toml_str() {
        let settings = Settings::from_toml_str("A = 1\nB = true").unwrap();
        assert_eq!(settings.build_settings.get("A"), Some(&SettingValue::from(1)));
        assert_eq!(settings.build_settings.get("B"), Some(&SettingValue::from(true)));
    }

    #[test]
    fn test_from_json_str() {
        let settings = Settings::from_json_str(r#"{"presets": ["G"], "base": {}}"#).unwrap();
        assert_eq!(settings.groups, vec!["G"]);
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!(Settings::from_toml_str("= nope"), Err(Error::Toml(_))));
        assert!(matches!(Settings::from_json_str("[1]"), Err(Error::Json(_))));
        assert!(matches!(
            Settings::from_toml_str("base = 1"),
            Err(Error::Settings(SettingsError::InvalidShape { .. }))
        ));
    }
}
