//! The seam between this crate and a JavaScript minification engine.
//!
//! An [`Engine`] is a black box with two entry points: a plain compile and
//! a compile that also produces a v3 source map. [`EngineAdapter`] picks
//! one of them once, from the host pipeline's [`EngineCapability`].
//!
//! ```text
//! AssetInput ─► EngineAdapter ─┬─ LegacyNoMap ─► Engine::compile ─────────► {data}
//!                              └─ MapCapable ──► Engine::compile_with_map ─► combine ─► {data, map}
//! ```

mod adapter;
mod capability;
mod minify;

pub use adapter::{ADAPTER_VERSION, EngineAdapter};
pub use capability::EngineCapability;
pub use minify::OxcEngine;

use thiserror::Error;

use crate::config::{FieldPath, NormalizedOptions};

/// Request for a source map from [`Engine::compile_with_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapRequest<'a> {
    /// Name the engine records as the map's single source.
    pub filename: &'a str,
}

/// Everything an engine needs for one call.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions<'a> {
    pub options: &'a NormalizedOptions,
    pub source_map: Option<SourceMapRequest<'a>>,
}

impl<'a> EngineOptions<'a> {
    pub fn new(options: &'a NormalizedOptions) -> Self {
        Self {
            options,
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, filename: &'a str) -> Self {
        self.source_map = Some(SourceMapRequest { filename });
        self
    }
}

/// An engine rejected its input. `message` is the engine's own diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A JavaScript minification engine.
///
/// Implementations must be safe to call from several threads at once;
/// each call builds its own working state.
pub trait Engine: Send + Sync {
    /// Short identifier, used as the first cache key segment.
    fn name(&self) -> &str;

    /// Version whose output is reproducible for equal input and options.
    fn version(&self) -> &str;

    /// Options this engine cannot honour. Empty when all are supported.
    fn unsupported(&self, options: &NormalizedOptions) -> Vec<FieldPath> {
        let _ = options;
        Vec::new()
    }

    /// Compile `source`, returning only the code.
    fn compile(&self, source: &str, options: &EngineOptions<'_>) -> Result<String, EngineError>;

    /// Compile `source`, returning the code and a serialized v3 map.
    fn compile_with_map(
        &self,
        source: &str,
        options: &EngineOptions<'_>,
    ) -> Result<(String, String), EngineError>;
}
