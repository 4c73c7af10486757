//! Resolution of named setting groups into one effective table.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::merge::merge_into;
use super::value::BuildSettings;
use super::{Settings, SettingsError};

/// A project-wide table of named setting groups.
pub trait GroupSource {
    fn group(&self, name: &str) -> Option<&Settings>;
}

impl GroupSource for BTreeMap<String, Settings> {
    fn group(&self, name: &str) -> Option<&Settings> {
        self.get(name)
    }
}

impl<S: BuildHasher> GroupSource for HashMap<String, Settings, S> {
    fn group(&self, name: &str) -> Option<&Settings> {
        self.get(name)
    }
}

impl Settings {
    /// Computes the effective build settings for `config`.
    ///
    /// Layers, each deep-merged onto the result so far:
    /// 1. every referenced group, in listed order, itself layered for `config`
    /// 2. the base build settings
    /// 3. the matching entry in `config_settings`, layered the same way
    ///
    /// Each raw table is merged straight onto the accumulated result, so a
    /// `KEY:REPLACE` in a config replaces what the base and groups produced.
    /// Passing `None` skips the config layer.
    pub fn resolve<G>(&self, config: Option<&str>, groups: &G) -> Result<BuildSettings, SettingsError>
    where
        G: GroupSource + ?Sized,
    {
        let mut resolved = BuildSettings::new();
        let mut chain = Vec::new();
        apply_layers(self, config, groups, &mut chain, &mut resolved)?;

        tracing::debug!(
            groups = ?self.groups,
            config = ?config,
            keys = resolved.len(),
            "resolved settings"
        );

        Ok(resolved)
    }
}

fn apply_layers<G>(
    settings: &Settings,
    config: Option<&str>,
    groups: &G,
    chain: &mut Vec<String>,
    resolved: &mut BuildSettings,
) -> Result<(), SettingsError>
where
    G: GroupSource + ?Sized,
{
    for name in &settings.groups {
        if chain.contains(name) {
            let mut cycle = chain.clone();
            cycle.push(name.clone());
            return Err(SettingsError::GroupCycle {
                chain: cycle.join(" -> "),
            });
        }

        let group = groups
            .group(name)
            .ok_or_else(|| SettingsError::UnknownGroup { name: name.clone() })?;

        chain.push(name.clone());
        apply_layers(group, config, groups, chain, resolved)?;
        chain.pop();
    }

    merge_into(resolved, &settings.build_settings);

    if let Some(config_settings) = config.and_then(|name| settings.config_settings.get(name)) {
        apply_layers(config_settings, config, groups, chain, resolved)?;
    }

    Ok(())
}
