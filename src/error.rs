//! Crate-level error type.
//!
//! Three kinds cross the public API, each raised at a different point:
//!
//! | Kind         | Raised                                   |
//! |--------------|------------------------------------------|
//! | `Config`     | construction, before any engine call     |
//! | `Compile`    | the engine rejected the asset            |
//! | `MapCombine` | the upstream map could not be decoded    |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sourcemap::MapCombineError;

/// The engine rejected an asset.
///
/// `message` is the engine's diagnostic, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub filename: String,
}

/// Discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Compile,
    MapCombine,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "config",
            Self::Compile => "compile",
            Self::MapCombine => "map_combine",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    MapCombine(#[from] MapCombineError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Compile(_) => ErrorKind::Compile,
            Self::MapCombine(_) => ErrorKind::MapCombine,
        }
    }

    /// Human-readable message. For compile errors, the engine's text.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
