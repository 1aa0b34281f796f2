//! `compress` option group.
//!
//! # Example
//!
//! ```toml
//! [compress]
//! drop_console = true
//! keep_fnames = true
//! ```

use serde::{Deserialize, Serialize};

use super::Shorthand;
use crate::config::FieldPath;

/// `compress` table as written by the caller.
///
/// Every field is optional so explicit settings can be told apart from
/// values inherited through the top-level shorthands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawCompressOptions {
    pub drop_console: Option<bool>,
    pub drop_debugger: Option<bool>,
    pub keep_fnames: Option<bool>,
    pub keep_classnames: Option<bool>,
}

/// Resolved compressor settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompressConfig {
    /// Remove `console.*` calls.
    pub drop_console: bool,
    /// Remove `debugger` statements.
    pub drop_debugger: bool,
    /// Keep `Function.prototype.name` intact.
    pub keep_fnames: bool,
    /// Keep class names intact.
    pub keep_classnames: bool,
}

pub struct CompressFields {
    pub drop_console: FieldPath,
    pub drop_debugger: FieldPath,
    pub keep_fnames: FieldPath,
    pub keep_classnames: FieldPath,
}

impl CompressConfig {
    pub const FIELDS: CompressFields = CompressFields {
        drop_console: FieldPath::new("compress.drop_console"),
        drop_debugger: FieldPath::new("compress.drop_debugger"),
        keep_fnames: FieldPath::new("compress.keep_fnames"),
        keep_classnames: FieldPath::new("compress.keep_classnames"),
    };

    /// Resolve explicit settings, falling back to the shorthands.
    pub fn resolve(raw: Option<&RawCompressOptions>, shorthand: Shorthand) -> Self {
        let raw = raw.cloned().unwrap_or_default();
        Self {
            drop_console: raw.drop_console.unwrap_or(false),
            drop_debugger: raw.drop_debugger.unwrap_or(false),
            keep_fnames: raw.keep_fnames.or(shorthand.keep_fnames).unwrap_or(false),
            keep_classnames: raw
                .keep_classnames
                .or(shorthand.keep_classnames)
                .unwrap_or(false),
        }
    }
}
