//! `mangle` option group.
//!
//! # Example
//!
//! ```toml
//! [mangle]
//! toplevel = true
//! reserved = ["$super"]
//! properties = { keep_quoted = true }
//! ```

use serde::{Deserialize, Serialize};

use super::Shorthand;
use crate::config::FieldPath;
use crate::config::toggle::Toggle;

/// `mangle` table as written by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawMangleOptions {
    pub toplevel: Option<bool>,
    pub reserved: Option<Vec<String>>,
    pub keep_fnames: Option<bool>,
    pub keep_classnames: Option<bool>,
    pub properties: Option<Toggle<RawPropertyOptions>>,
}

/// `mangle.properties` table as written by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawPropertyOptions {
    pub keep_quoted: Option<bool>,
    pub regex: Option<String>,
    pub debug: Option<bool>,
}

/// Names kept out of mangling when `reserved` is not given.
///
/// PrototypeJS looks up `$super` by parameter name.
const DEFAULT_RESERVED: &[&str] = &["$super"];

/// Resolved mangler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MangleConfig {
    /// Mangle names declared in the top level scope.
    pub toplevel: bool,
    /// Names never to mangle (sorted, deduplicated).
    pub reserved: Vec<String>,
    pub keep_fnames: bool,
    pub keep_classnames: bool,
    /// Property mangling; `None` when disabled.
    pub properties: Option<PropertyConfig>,
}

/// Resolved property mangling settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyConfig {
    pub keep_quoted: bool,
    pub regex: Option<String>,
    pub debug: bool,
}

impl Default for MangleConfig {
    fn default() -> Self {
        Self {
            toplevel: false,
            reserved: default_reserved(),
            keep_fnames: false,
            keep_classnames: false,
            properties: None,
        }
    }
}

fn default_reserved() -> Vec<String> {
    DEFAULT_RESERVED.iter().map(|name| (*name).to_owned()).collect()
}

pub struct MangleFields {
    pub toplevel: FieldPath,
    pub reserved: FieldPath,
    pub keep_fnames: FieldPath,
    pub keep_classnames: FieldPath,
    pub properties: FieldPath,
}

impl MangleConfig {
    pub const FIELDS: MangleFields = MangleFields {
        toplevel: FieldPath::new("mangle.toplevel"),
        reserved: FieldPath::new("mangle.reserved"),
        keep_fnames: FieldPath::new("mangle.keep_fnames"),
        keep_classnames: FieldPath::new("mangle.keep_classnames"),
        properties: FieldPath::new("mangle.properties"),
    };

    /// Resolve explicit settings, falling back to the shorthands.
    pub fn resolve(raw: Option<&RawMangleOptions>, shorthand: Shorthand) -> Self {
        let raw = raw.cloned().unwrap_or_default();

        let mut reserved = raw.reserved.unwrap_or_else(default_reserved);
        reserved.sort();
        reserved.dedup();

        let properties = match raw.properties {
            Some(Toggle::Enabled(true)) => Some(PropertyConfig::default()),
            Some(Toggle::Custom(props)) => Some(PropertyConfig {
                keep_quoted: props.keep_quoted.unwrap_or(false),
                regex: props.regex,
                debug: props.debug.unwrap_or(false),
            }),
            Some(Toggle::Enabled(false)) | None => None,
        };

        Self {
            toplevel: raw.toplevel.unwrap_or(false),
            reserved,
            keep_fnames: raw.keep_fnames.or(shorthand.keep_fnames).unwrap_or(false),
            keep_classnames: raw
                .keep_classnames
                .or(shorthand.keep_classnames)
                .unwrap_or(false),
            properties,
        }
    }
}
