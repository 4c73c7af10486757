//! Layered build settings.
//!
//! A [`Settings`] value carries three independent sources of build settings:
//! the unconditional base table, per-configuration overrides, and references
//! to named groups resolved elsewhere.

mod describe;
mod document;
mod error;
mod groups;
mod key;
mod merge;
mod value;

use std::collections::BTreeMap;

pub use document::DocumentShape;
pub use error::SettingsError;
pub use groups::GroupSource;
pub use key::{SettingKey, REPLACE_SUFFIX};
pub use merge::merge;
pub use value::{BuildSettings, Number, SettingValue};

use merge::layer_into;

/// Build settings declared at a base level, overridden per configuration and
/// composed from named groups.
///
/// Equality compares the base tables structurally, the configurations key by
/// key, and the groups in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Settings effective unconditionally.
    pub build_settings: BuildSettings,
    /// Full nested settings per configuration name, e.g. `Debug`.
    pub config_settings: BTreeMap<String, Settings>,
    /// Names of groups to fold in, in precedence order (later wins).
    pub groups: Vec<String>,
}

impl Settings {
    pub fn new(
        build_settings: BuildSettings,
        config_settings: BTreeMap<String, Settings>,
        groups: Vec<String>,
    ) -> Self {
        Self {
            build_settings,
            config_settings,
            groups,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.build_settings.is_empty() && self.config_settings.is_empty() && self.groups.is_empty()
    }

    /// Layers a whole settings document on top of this one.
    ///
    /// Build settings are deep-merged like [`merge`], except that
    /// `KEY:REPLACE` directives are kept raw so they still apply when the
    /// result is resolved against groups and the base. Configurations present
    /// on both sides are layered recursively and new ones are taken as they
    /// are, and groups not already referenced are appended.
    pub fn layer(&mut self, overlay: Settings) {
        layer_into(&mut self.build_settings, &overlay.build_settings);

        for (name, settings) in overlay.config_settings {
            match self.config_settings.get_mut(&name) {
                Some(existing) => existing.layer(settings),
                None => {
                    self.config_settings.insert(name, settings);
                }
            }
        }

        for group in overlay.groups {
            if !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
    }
}

impl From<BuildSettings> for Settings {
    fn from(build_settings: BuildSettings) -> Self {
        Self {
            build_settings,
            ..Self::default()
        }
    }
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Settings::from(iter.into_iter().collect::<BuildSettings>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: serde_json::Value) -> BuildSettings {
        serde_json::from_value(value).unwrap()
    }

    fn settings(value: serde_json::Value) -> Settings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flat_construction() {
        let flat = table(json!({"A": "1", "B": ["x"]}));
        let settings = Settings::from(flat.clone());

        assert_eq!(settings.build_settings, flat);
        assert!(settings.config_settings.is_empty());
        assert!(settings.groups.is_empty());
    }

    #[test]
    fn test_from_iterator_matches_flat_construction() {
        let settings: Settings = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(settings, Settings::from(table(json!({"A": "1", "B": "2"}))));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: Settings = [("A", "1"), ("B", "2")].into_iter().collect();
        let b: Settings = [("B", "2"), ("A", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_is_type_aware() {
        let number: Settings = [("A", 1)].into_iter().collect();
        let string: Settings = [("A", "1")].into_iter().collect();
        assert_ne!(number, string);
    }

    #[test]
    fn test_equality_respects_group_order() {
        let a = settings(json!({"groups": ["G1", "G2"]}));
        let b = settings(json!({"groups": ["G2", "G1"]}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_compares_configs() {
        let a = settings(json!({"configs": {"Debug": {"A": "1"}}}));
        let b = settings(json!({"configs": {"Debug": {"A": "2"}}}));
        let c = settings(json!({"configs": {"Debug": {"A": "1"}}}));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_empty() {
        assert!(Settings::empty().is_empty());
        assert_eq!(Settings::empty(), Settings::default());
        assert!(!settings(json!({"groups": ["G"]})).is_empty());
    }

    #[test]
    fn test_layer_merges_all_parts() {
        let mut base = settings(json!({
            "base": {"FLAGS": ["-a"], "NAME": "App"},
            "configs": {"Debug": {"OPT": "0"}},
            "groups": ["Common"]
        }));
        base.layer(settings(json!({
            "base": {"FLAGS": ["-b"]},
            "configs": {
                "Debug": {"DEBUG_INFO": "YES"},
                "Release": {"OPT:REPLACE": "s"}
            },
            "groups": ["Common", "Extra"]
        })));

        assert_eq!(
            base,
            settings(json!({
                "base": {"FLAGS": ["-a", "-b"], "NAME": "App"},
                "configs": {
                    "Debug": {"OPT": "0", "DEBUG_INFO": "YES"},
                    "Release": {"OPT:REPLACE": "s"}
                },
                "groups": ["Common", "Extra"]
            }))
        );
    }

    #[test]
    fn test_layer_keeps_replace_directives() {
        let mut base = settings(json!({
            "base": {"FLAGS": ["-a"]},
            "configs": {"Release": {"OPT": "s"}}
        }));
        base.layer(settings(json!({
            "base": {"FLAGS:REPLACE": ["-z"]},
            "configs": {"Release": {"FLAGS:REPLACE": ["-O"]}}
        })));

        assert_eq!(
            base,
            settings(json!({
                "base": {"FLAGS:REPLACE": ["-z"]},
                "configs": {"Release": {"OPT": "s", "FLAGS:REPLACE": ["-O"]}}
            }))
        );
    }
}
