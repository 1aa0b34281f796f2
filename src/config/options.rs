//! The declarative options object handed in by callers.
//!
//! Options can be built in code or parsed from TOML / JSON. Parsing goes
//! through `serde_ignored`, and any key outside the schema is a hard error.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::section::{
    CommentPolicy, DefineValue, RawCompressOptions, RawMangleOptions, RawOutputOptions,
};
use super::toggle::Toggle;
use super::ConfigError;

/// Caller-supplied options, before defaults and shorthands are applied.
///
/// Every field is optional; see [`NormalizedOptions`](super::NormalizedOptions)
/// for the resolved form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub compress: Option<Toggle<RawCompressOptions>>,
    pub mangle: Option<Toggle<RawMangleOptions>>,
    pub output: Option<RawOutputOptions>,
    pub define: BTreeMap<String, DefineValue>,
    /// Shorthand for `output.comments`.
    pub comments: Option<CommentPolicy>,
    /// Shorthand for `compress.keep_fnames` and `mangle.keep_fnames`.
    pub keep_fnames: Option<bool>,
    /// Shorthand for `compress.keep_classnames` and `mangle.keep_classnames`.
    pub keep_classnames: Option<bool>,
    /// Parse input as an ES module instead of a classic script.
    pub module: Option<bool>,
}

impl RawOptions {
    /// Parse TOML options, rejecting unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let options = serde_ignored::deserialize(deserializer, |path| {
            ignored.push(key_path(&path));
        })?;
        reject_unknown(options, ignored)
    }

    /// Parse JSON options text, rejecting unknown keys.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_json_value(&value)
    }

    /// Read options from a JSON value without consuming or modifying it.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let mut ignored = Vec::new();
        let options = serde_ignored::deserialize(value, |path| {
            ignored.push(key_path(&path));
        })?;
        reject_unknown(options, ignored)
    }

    /// Load options from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Render an ignored path as a dotted key (`mangle.properties.nope`).
///
/// `Path`'s own `Display` prints `?` for `Option` and newtype layers,
/// which are invisible to the caller.
fn key_path(path: &serde_ignored::Path<'_>) -> String {
    use serde_ignored::Path;

    fn join(parent: &Path<'_>, segment: &str) -> String {
        let parent = key_path(parent);
        if parent.is_empty() {
            segment.to_string()
        } else {
            format!("{parent}.{segment}")
        }
    }

    match path {
        Path::Root => String::new(),
        Path::Seq { parent, index } => join(parent, &index.to_string()),
        Path::Map { parent, key } => join(parent, key),
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            key_path(parent)
        }
    }
}

fn reject_unknown(options: RawOptions, mut ignored: Vec<String>) -> Result<RawOptions, ConfigError> {
    if ignored.is_empty() {
        Ok(options)
    } else {
        ignored.sort();
        Err(ConfigError::UnknownOptions(ignored))
    }
}
