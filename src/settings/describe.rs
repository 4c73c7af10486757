//! Human-readable rendering of [`Settings`] for diagnostics.
//!
//! The output is a tree of `key = value` lines under optional `base:`,
//! `configs:` and `groups:` headers. It is not meant to be parsed back.

use std::fmt;

use super::value::BuildSettings;
use super::Settings;

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = Vec::new();

        if !self.build_settings.is_empty() {
            let lines = describe_build_settings(&self.build_settings);
            if self.config_settings.is_empty() && self.groups.is_empty() {
                sections.push(lines);
            } else {
                sections.push(format!("base:\n{}", indent(&lines, 2)));
            }
        }

        let configs: Vec<String> = self
            .config_settings
            .iter()
            .filter_map(|(name, settings)| {
                let nested = settings.to_string();
                (!nested.is_empty()).then(|| format!("  {name}:\n{}", indent(&nested, 4)))
            })
            .collect();
        if !configs.is_empty() {
            sections.push(format!("configs:\n{}", configs.join("\n")));
        }

        if !self.groups.is_empty() {
            sections.push(format!("groups:\n{}", indent(&self.groups.join("\n"), 2)));
        }

        f.write_str(&sections.join("\n"))
    }
}

fn describe_build_settings(settings: &BuildSettings) -> String {
    settings
        .iter()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
