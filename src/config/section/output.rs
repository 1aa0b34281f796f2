//! `output` option group (code generation).
//!
//! # Example
//!
//! ```toml
//! [output]
//! comments = "copyright"
//! quote_style = "single"
//! beautify = false
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Which source comments survive into the output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommentPolicy {
    /// Drop every comment (default).
    #[default]
    None,
    /// Keep every comment.
    All,
    /// Keep bang comments (`/*!`, `//!`) and comments mentioning "Copyright".
    Copyright,
    /// Keep `@preserve`, `@license` and `@cc_on` blocks.
    Jsdoc,
}

/// String quoting in generated code.
///
/// Accepts names or the numeric forms `0` (auto), `1` (single),
/// `2` (double) and `3` (original).
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Pick whichever quote needs fewer escapes (default).
    #[default]
    Auto,
    Single,
    Double,
    /// Keep the quotes used in the source.
    Original,
}

impl QuoteStyle {
    fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Self::Auto),
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Original),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(Self::Auto),
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "original" => Some(Self::Original),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for QuoteStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct QuoteStyleVisitor;

        impl Visitor<'_> for QuoteStyleVisitor {
            type Value = QuoteStyle;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of \"auto\", \"single\", \"double\", \"original\" or 0..=3")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                QuoteStyle::from_name(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                QuoteStyle::from_index(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(QuoteStyle::from_index)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(QuoteStyleVisitor)
    }
}

/// `output` table as written by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawOutputOptions {
    pub comments: Option<CommentPolicy>,
    pub quote_style: Option<QuoteStyle>,
    pub ascii_only: Option<bool>,
    pub max_line_len: Option<u32>,
    pub beautify: Option<bool>,
}

/// Resolved code generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputConfig {
    pub comments: CommentPolicy,
    pub quote_style: QuoteStyle,
    /// Escape non-ASCII characters.
    pub ascii_only: bool,
    /// Soft limit for output line length.
    pub max_line_len: Option<u32>,
    /// Pretty-print instead of minifying whitespace.
    pub beautify: bool,
}

pub struct OutputFields {
    pub comments: FieldPath,
    pub quote_style: FieldPath,
    pub ascii_only: FieldPath,
    pub max_line_len: FieldPath,
    pub beautify: FieldPath,
}

impl OutputConfig {
    pub const FIELDS: OutputFields = OutputFields {
        comments: FieldPath::new("output.comments"),
        quote_style: FieldPath::new("output.quote_style"),
        ascii_only: FieldPath::new("output.ascii_only"),
        max_line_len: FieldPath::new("output.max_line_len"),
        beautify: FieldPath::new("output.beautify"),
    };

    /// Resolve explicit settings; `comments` falls back to the top-level
    /// shorthand, then to [`CommentPolicy::None`].
    pub fn resolve(raw: Option<&RawOutputOptions>, comments: Option<CommentPolicy>) -> Self {
        let raw = raw.cloned().unwrap_or_default();
        Self {
            comments: raw.comments.or(comments).unwrap_or_default(),
            quote_style: raw.quote_style.unwrap_or_default(),
            ascii_only: raw.ascii_only.unwrap_or(false),
            max_line_len: raw.max_line_len,
            beautify: raw.beautify.unwrap_or(false),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_line_len == Some(0) {
            diag.error_with_hint(
                Self::FIELDS.max_line_len,
                "must be greater than 0",
                format!("remove {} to disable line wrapping", Self::FIELDS.max_line_len),
            );
        }
    }
}
