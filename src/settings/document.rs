//! Parsing raw documents into [`Settings`].
//!
//! A document is either a flat table of build settings or a structured
//! document using the reserved keys `base`, `configs` and `groups` (with
//! `presets` accepted as a deprecated alias for `groups`).
//!
//! A flat document whose settings happen to include a key named `base`,
//! `configs` or `groups` is read as structured. There is no escape for this.

use std::collections::BTreeMap;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::value::{BuildSettings, SettingValue};
use super::{Settings, SettingsError};

pub const BASE_KEY: &str = "base";
pub const CONFIGS_KEY: &str = "configs";
pub const GROUPS_KEY: &str = "groups";
pub const PRESETS_KEY: &str = "presets";

/// Which of the two document forms a raw table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// The whole document is one table of build settings.
    Flat,
    /// The document uses `base`, `configs` and/or `groups`.
    Structured,
}

impl DocumentShape {
    pub fn classify(document: &BuildSettings) -> Self {
        if [BASE_KEY, CONFIGS_KEY, GROUPS_KEY]
            .iter()
            .any(|key| document.contains_key(key))
        {
            DocumentShape::Structured
        } else {
            DocumentShape::Flat
        }
    }
}

impl Settings {
    /// Parses a raw document in either the flat or the structured form.
    ///
    /// Shape selection never fails. Errors are reported when a reserved key
    /// holds a value of the wrong type, with the key path of the offending
    /// entry.
    pub fn from_document(document: &BuildSettings) -> Result<Self, SettingsError> {
        parse_document(document, "")
    }
}

fn parse_document(document: &BuildSettings, path: &str) -> Result<Settings, SettingsError> {
    match DocumentShape::classify(document) {
        DocumentShape::Flat => Ok(Settings::from(document.clone())),
        DocumentShape::Structured => parse_structured(document, path),
    }
}

fn parse_structured(document: &BuildSettings, path: &str) -> Result<Settings, SettingsError> {
    let groups = if let Some(value) = document.get(GROUPS_KEY) {
        parse_groups(value, &child_path(path, GROUPS_KEY))?
    } else if let Some(value) = document.get(PRESETS_KEY) {
        tracing::warn!(
            path = %child_path(path, PRESETS_KEY),
            "'presets' is deprecated, use 'groups' instead"
        );
        parse_groups(value, &child_path(path, PRESETS_KEY))?
    } else {
        Vec::new()
    };

    let build_settings = match document.get(BASE_KEY) {
        Some(SettingValue::Table(table)) => table.clone(),
        Some(other) => return Err(invalid_shape(child_path(path, BASE_KEY), "table", other)),
        None => BuildSettings::new(),
    };

    let config_settings = match document.get(CONFIGS_KEY) {
        Some(SettingValue::Table(configs)) => parse_configs(configs, &child_path(path, CONFIGS_KEY))?,
        Some(other) => return Err(invalid_shape(child_path(path, CONFIGS_KEY), "table", other)),
        None => BTreeMap::new(),
    };

    Ok(Settings::new(build_settings, config_settings, groups))
}

fn parse_groups(value: &SettingValue, path: &str) -> Result<Vec<String>, SettingsError> {
    let SettingValue::Array(items) = value else {
        return Err(invalid_shape(path.to_string(), "array of strings", value));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            SettingValue::String(name) => Ok(name.clone()),
            other => Err(invalid_shape(format!("{path}[{i}]"), "string", other)),
        })
        .collect()
}

fn parse_configs(
    configs: &BuildSettings,
    path: &str,
) -> Result<BTreeMap<String, Settings>, SettingsError> {
    configs
        .iter()
        .map(|(name, value)| {
            let config_path = child_path(path, name);
            match value {
                SettingValue::Table(document) => {
                    Ok((name.clone(), parse_document(document, &config_path)?))
                }
                other => Err(invalid_shape(config_path, "table", other)),
            }
        })
        .collect()
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn invalid_shape(path: String, expected: &'static str, found: &SettingValue) -> SettingsError {
    SettingsError::InvalidShape {
        path,
        expected,
        found: found.type_name(),
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = BuildSettings::deserialize(deserializer)?;
        Settings::from_document(&document).map_err(de::Error::custom)
    }
}

/// Writes the flat form when only build settings are present and they
/// don't collide with a reserved key, otherwise the structured form.
impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flat = self.config_settings.is_empty()
            && self.groups.is_empty()
            && DocumentShape::classify(&self.build_settings) == DocumentShape::Flat;
        if flat {
            return self.build_settings.serialize(serializer);
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(BASE_KEY, &self.build_settings)?;
        if !self.config_settings.is_empty() {
            map.serialize_entry(CONFIGS_KEY, &self.config_settings)?;
        }
        if !self.groups.is_empty() {
            map.serialize_entry(GROUPS_KEY, &self.groups)?;
        }
        map.end()
    }
}
