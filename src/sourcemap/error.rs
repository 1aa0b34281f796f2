//! Source map decoding and combination errors.

use thiserror::Error;

use super::vlq::VlqError;

/// A source map that cannot be read at all.
///
/// Missing or partial mappings are not errors; they are passed through
/// when maps are combined.
#[derive(Debug, Error)]
pub enum MapCombineError {
    #[error("source map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported source map version {0} (expected 3)")]
    UnsupportedVersion(u32),

    #[error("invalid VLQ on mappings line {line}: {error}")]
    Vlq {
        line: usize,
        #[source]
        error: VlqError,
    },

    #[error("malformed segment on mappings line {line}: {reason}")]
    Segment { line: usize, reason: &'static str },

    #[error("mapping references source #{index} but the map lists {len}")]
    SourceOutOfRange { index: u32, len: usize },

    #[error("mapping references name #{index} but the map lists {len}")]
    NameOutOfRange { index: u32, len: usize },

    #[error("index map section references `{0}`; only embedded maps are supported")]
    IndexMapUrl(String),

    #[error("index map section has no `map`")]
    MissingMap,
}
