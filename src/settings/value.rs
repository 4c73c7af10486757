//! Setting values and flat settings tables.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// A numeric setting value.
///
/// Integers and floats compare by exact value, so `1` equals `1.0` but a
/// float equals an integer only when it is integral and within `i64` range.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Integer(i), Number::Float(f)) | (Number::Float(f), Number::Integer(i)) => {
                // 2^63 itself is out of range, so `f as i64` never saturates here.
                f.fract() == 0.0 && f >= i64::MIN as f64 && f < -(i64::MIN as f64) && f as i64 == i
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A single build setting value: a scalar, a sequence, or a nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Number(Number),
    Bool(bool),
    Array(Vec<SettingValue>),
    Table(BuildSettings),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SettingValue]> {
        match self {
            SettingValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BuildSettings> {
        match self {
            SettingValue::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::String(_) => "string",
            SettingValue::Number(_) => "number",
            SettingValue::Bool(_) => "bool",
            SettingValue::Array(_) => "array",
            SettingValue::Table(_) => "table",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            SettingValue::Table(table) => {
                f.write_str("{")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::String(s)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Number(Number::Integer(i))
    }
}

impl From<i32> for SettingValue {
    fn from(i: i32) -> Self {
        SettingValue::Number(Number::Integer(i64::from(i)))
    }
}

impl From<f64> for SettingValue {
    fn from(f: f64) -> Self {
        SettingValue::Number(Number::Float(f))
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl<T: Into<SettingValue>> From<Vec<T>> for SettingValue {
    fn from(items: Vec<T>) -> Self {
        SettingValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BuildSettings> for SettingValue {
    fn from(table: BuildSettings) -> Self {
        SettingValue::Table(table)
    }
}

impl From<toml::Value> for SettingValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => SettingValue::String(s),
            toml::Value::Integer(i) => SettingValue::Number(Number::Integer(i)),
            toml::Value::Float(f) => SettingValue::Number(Number::Float(f)),
            toml::Value::Boolean(b) => SettingValue::Bool(b),
            toml::Value::Datetime(dt) => SettingValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                SettingValue::Array(items.into_iter().map(SettingValue::from).collect())
            }
            toml::Value::Table(table) => SettingValue::Table(BuildSettings::from(table)),
        }
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SettingValue::String(s) => serializer.serialize_str(s),
            SettingValue::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            SettingValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            SettingValue::Bool(b) => serializer.serialize_bool(*b),
            SettingValue::Array(items) => serializer.collect_seq(items),
            SettingValue::Table(table) => table.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SettingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SettingValueVisitor)
    }
}

struct SettingValueVisitor;

impl<'de> Visitor<'de> for SettingValueVisitor {
    type Value = SettingValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, bool, array or table")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
        Ok(SettingValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Self::Value, E> {
        Ok(SettingValue::Number(Number::Integer(i)))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Self::Value, E> {
        Ok(match i64::try_from(u) {
            Ok(i) => SettingValue::Number(Number::Integer(i)),
            Err(_) => SettingValue::Number(Number::Float(u as f64)),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
        Ok(SettingValue::Number(Number::Float(f)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(SettingValue::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(SettingValue::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(SettingValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut table = BuildSettings::new();
        while let Some((key, value)) = map.next_entry::<String, SettingValue>()? {
            table.insert(key, value);
        }
        Ok(SettingValue::Table(table))
    }
}

/// One flat table of build settings, keyed by setting name.
///
/// Entries are kept sorted by key so iteration and rendering are
/// deterministic; equality never depends on insertion order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BuildSettings(BTreeMap<String, SettingValue>);

impl BuildSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SettingValue> {
        self.0.get_mut(key)
    }

    /// Inserts a setting, returning the previous value for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Option<SettingValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SettingValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, SettingValue> {
        self.0.keys()
    }
}

impl Index<&str> for BuildSettings {
    type Output = SettingValue;

    /// Panics if the key is not present, like `BTreeMap`.
    fn index(&self, key: &str) -> &SettingValue {
        &self.0[key]
    }
}

impl From<toml::Table> for BuildSettings {
    fn from(table: toml::Table) -> Self {
        table
            .into_iter()
            .map(|(key, value)| (key, SettingValue::from(value)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for BuildSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = BuildSettings::new();
        table.extend(iter);
        table
    }
}

impl<K: Into<String>, V: Into<SettingValue>> Extend<(K, V)> for BuildSettings {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for BuildSettings {
    type Item = (String, SettingValue);
    type IntoIter = btree_map::IntoIter<String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BuildSettings {
    type Item = (&'a String, &'a SettingValue);
    type IntoIter = btree_map::Iter<'a, String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
