//! Deep merge and shallow combine of build settings tables.
//!
//! Two distinct operations live here:
//! - [`merge`] layers one table onto another structurally: nested tables
//!   merge key by key, arrays concatenate, and `KEY:REPLACE` overwrites.
//! - [`BuildSettings::combine`] is a last-write-wins overwrite of top-level
//!   keys with no recursion.

use std::ops::AddAssign;

use super::key::{SettingKey, REPLACE_SUFFIX};
use super::value::{BuildSettings, SettingValue};

/// Deep-merges `overlay` onto `base`, returning a new table.
///
/// For each overlay key:
/// - `KEY:REPLACE` sets `KEY` to the overlay value unconditionally
/// - a table onto a table merges recursively
/// - an array onto an array appends the overlay items after the base items
/// - anything else overwrites
///
/// Keys only present in `base` are carried through. Neither input is modified.
///
/// # Examples
/// ```
/// use buildsettings::{merge, BuildSettings, SettingValue};
///
/// let base: BuildSettings = [("FLAGS", vec!["-a"])].into_iter().collect();
/// let overlay: BuildSettings = [("FLAGS", vec!["-b"])].into_iter().collect();
///
/// let merged = merge(&overlay, &base);
/// assert_eq!(merged.get("FLAGS"), Some(&SettingValue::from(vec!["-a", "-b"])));
/// ```
pub fn merge(overlay: &BuildSettings, base: &BuildSettings) -> BuildSettings {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// In-place form of [`merge`], writing into `base`.
pub(crate) fn merge_into(base: &mut BuildSettings, overlay: &BuildSettings) {
    // Directives go last so `KEY:REPLACE` beats a plain `KEY` in the same overlay.
    let mut directives = Vec::new();

    for (raw, value) in overlay {
        let key = SettingKey::parse(raw);
        if key.replace {
            directives.push((key.name, value));
            continue;
        }

        match (base.get_mut(key.name), value) {
            (Some(SettingValue::Table(base_table)), SettingValue::Table(overlay_table)) => {
                merge_into(base_table, overlay_table);
            }
            (Some(SettingValue::Array(base_items)), SettingValue::Array(overlay_items)) => {
                base_items.extend(overlay_items.iter().cloned());
            }
            (_, value) => {
                base.insert(key.name, value.clone());
            }
        }
    }

    for (name, value) in directives {
        base.insert(name, value.clone());
    }
}

/// Layers one raw table onto another without applying directives.
///
/// Used to combine documents that are resolved later. A `KEY:REPLACE` in
/// `overlay` drops `KEY` and any older `KEY:REPLACE` from `base` and is kept
/// raw. A plain `KEY` merges into an existing `KEY:REPLACE` if `base` has one,
/// otherwise into `KEY`, following the same table and array rules as [`merge`].
pub(crate) fn layer_into(base: &mut BuildSettings, overlay: &BuildSettings) {
    let mut directives = Vec::new();

    for (raw, value) in overlay {
        let key = SettingKey::parse(raw);
        if key.replace {
            directives.push((key.name, raw, value));
            continue;
        }

        let directive = format!("{}{REPLACE_SUFFIX}", key.name);
        let target = if base.contains_key(&directive) {
            directive
        } else {
            key.name.to_string()
        };

        match (base.get_mut(&target), value) {
            (Some(SettingValue::Table(base_table)), SettingValue::Table(overlay_table)) => {
                layer_into(base_table, overlay_table);
            }
            (Some(SettingValue::Array(base_items)), SettingValue::Array(overlay_items)) => {
                base_items.extend(overlay_items.iter().cloned());
            }
            (_, value) => {
                base.insert(target, value.clone());
            }
        }
    }

    for (name, raw, value) in directives {
        base.remove(name);
        base.insert(raw.as_str(), value.clone());
    }
}

impl BuildSettings {
    /// Overwrites this table's keys with every key of `other`.
    ///
    /// This is a shallow, last-write-wins combine: a nested table in `other`
    /// replaces the existing value wholesale. `None` leaves `self` unchanged.
    /// Use [`merge`] for structural merging.
    pub fn combine(&mut self, other: Option<&BuildSettings>) {
        let Some(other) = other else {
            return;
        };
        for (key, value) in other {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Non-mutating form of [`combine`](Self::combine).
    pub fn combined(&self, other: &BuildSettings) -> BuildSettings {
        let mut combined = self.clone();
        combined.combine(Some(other));
        combined
    }

    /// Deep-merges this table onto `base`. See [`merge`].
    pub fn merged_onto(&self, base: &BuildSettings) -> BuildSettings {
        merge(self, base)
    }
}

impl AddAssign<&BuildSettings> for BuildSettings {
    fn add_assign(&mut self, rhs: &BuildSettings) {
        self.combine(Some(rhs));
    }
}

impl AddAssign<Option<&BuildSettings>> for BuildSettings {
    fn add_assign(&mut self, rhs: Option<&BuildSettings>) {
        self.combine(rhs);
    }
}
