use std::path::{Path, PathBuf};

use super::file::load_settings_file;
use super::LoadError;
use crate::settings::Settings;

/// A settings source in the loading pipeline.
#[derive(Debug)]
enum SettingsSource {
    File { path: PathBuf, required: bool },
    Document(Settings),
}

/// Builder for loading one settings document spread over several sources.
///
/// Sources are layered in registration order with [`Settings::layer`]: base
/// tables deep-merge (arrays concatenate), matching configurations layer
/// recursively and group references accumulate. `KEY:REPLACE` directives are
/// kept as written for [`Settings::resolve`] to apply against groups.
///
/// ## Example
///
/// ```no_run
/// use buildsettings::SettingsLoader;
///
/// let settings = SettingsLoader::builder()
///     .with_file("settings/base.toml", true)
///     .with_file("settings/local.json", false)
///     .build()?;
///
/// println!("{settings}");
/// # Ok::<(), buildsettings::LoadError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SettingsLoader {
    sources: Vec<SettingsSource>,
}

impl SettingsLoader {
    /// Creates a new loader.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML or JSON file to be loaded, chosen by extension.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(SettingsSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Adds an already parsed settings document.
    pub fn with_document(mut self, settings: Settings) -> Self {
        self.sources.push(SettingsSource::Document(settings));
        self
    }

    /// Loads every source and layers them into one document.
    ///
    /// With no sources, or only missing optional files, the result is empty.
    pub fn build(self) -> Result<Settings, LoadError> {
        let mut layered = Settings::empty();

        for source in self.sources {
            let settings = match source {
                SettingsSource::File { path, required } => {
                    match load_settings_file(&path, required)? {
                        Some(settings) => settings,
                        None => continue,
                    }
                }
                SettingsSource::Document(settings) => settings,
            };

            layered.layer(settings);
        }

        Ok(layered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BuildSettings;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn table(value: serde_json::Value) -> BuildSettings {
        serde_json::from_value(value).unwrap()
    }

    fn settings(value: serde_json::Value) -> Settings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_sources_is_empty() {
        let settings = SettingsLoader::builder().build().unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_later_files_layer_on_earlier() {
        let base = temp_file(
            ".toml",
            r#"
            groups = ["Common"]

            [base]
            NAME = "App"
            FLAGS = ["-a"]
            "#,
        );
        let local = temp_file(
            ".json",
            r#"{"base": {"NAME": "Local", "FLAGS": ["-b"]}, "groups": ["Extra"]}"#,
        );

        let loaded = SettingsLoader::builder()
            .with_file(base.path(), true)
            .with_file(local.path(), true)
            .build()
            .unwrap();

        assert_eq!(
            loaded.build_settings,
            table(json!({"NAME": "Local", "FLAGS": ["-a", "-b"]}))
        );
        assert_eq!(loaded.groups, vec!["Common", "Extra"]);
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let base = temp_file(".toml", "A = \"1\"");

        let loaded = SettingsLoader::builder()
            .with_file("/nonexistent/local.toml", false)
            .with_file(base.path(), true)
            .build()
            .unwrap();

        assert_eq!(loaded, settings(json!({"A": "1"})));
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = SettingsLoader::builder()
            .with_file("/nonexistent/settings.toml", true)
            .build();
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_first_source_keeps_replace_directives() {
        let loaded = SettingsLoader::builder()
            .with_document(settings(json!({"FLAGS:REPLACE": ["-z"]})))
            .build()
            .unwrap();

        assert_eq!(loaded.build_settings, table(json!({"FLAGS:REPLACE": ["-z"]})));
    }

    #[test]
    fn test_later_source_replace_directive_is_kept() {
        let loaded = SettingsLoader::builder()
            .with_document(settings(json!({"FLAGS": ["-a"]})))
            .with_document(settings(json!({"FLAGS:REPLACE": ["-z"]})))
            .build()
            .unwrap();

        assert_eq!(loaded.build_settings, table(json!({"FLAGS:REPLACE": ["-z"]})));
    }

    #[test]
    fn test_split_files_resolve_like_single_document() {
        let base = temp_file(
            ".toml",
            r#"
            groups = ["Common"]

            [base]
            FLAGS = ["-a"]

            [configs.Release]
            OPT = "s"
            "#,
        );
        let overrides = temp_file(
            ".json",
            r#"{"base": {"FLAGS:REPLACE": ["-z"]}, "configs": {"Release": {"FLAGS:REPLACE": ["-O"]}}}"#,
        );
        let single = settings(json!({
            "base": {"FLAGS:REPLACE": ["-z"]},
            "configs": {"Release": {"OPT": "s", "FLAGS:REPLACE": ["-O"]}},
            "groups": ["Common"]
        }));

        let loaded = SettingsLoader::builder()
            .with_file(base.path(), true)
            .with_file(overrides.path(), true)
            .build()
            .unwrap();

        let groups: BTreeMap<String, Settings> =
            [("Common".to_string(), settings(json!({"FLAGS": ["-common"]})))]
                .into_iter()
                .collect();
        for config in [None, Some("Release")] {
            assert_eq!(
                loaded.resolve(config, &groups).unwrap(),
                single.resolve(config, &groups).unwrap(),
                "config {config:?}"
            );
        }
        assert_eq!(loaded, single);
    }
}
