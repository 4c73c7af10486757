//! Parsing of raw setting keys into override directives.
//!
//! Only one trailing `:REPLACE` is stripped: `A:REPLACE:REPLACE` names the
//! setting `A:REPLACE`.

/// Suffix that turns a key into a replace directive during merging.
pub const REPLACE_SUFFIX: &str = ":REPLACE";

/// A raw settings key split into its real name and override directive.
///
/// `FLAGS:REPLACE` parses to `{ name: "FLAGS", replace: true }`; any other key
/// parses to itself with `replace` unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingKey<'a> {
    pub name: &'a str,
    pub replace: bool,
}

impl<'a> SettingKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_suffix(REPLACE_SUFFIX) {
            Some(name) => Self {
                name,
                replace: true,
            },
            None => Self {
                name: raw,
                replace: false,
            },
        }
    }
}
