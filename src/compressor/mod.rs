//! Configured compressor instances.
//!
//! A [`Compressor`] is built once from declarative options and then serves
//! any number of compile calls, from any number of threads:
//!
//! ```text
//! RawOptions ─► normalize ─► engine support check ─► EngineAdapter ─► CacheKey
//!                                                         │
//!                    AssetInput ─► Compressor::call ──────┘─► CompileResult
//! ```
//!
//! Construction never calls the engine, and a compressor holds no mutable
//! state after it is built.

mod facade;
mod registry;

#[cfg(test)]
mod tests;

pub use facade::{cache_key, call, compile, instance};
pub use registry::{AssetCompressor, CompressorRegistry};

use std::sync::Arc;

use crate::asset::{AssetInput, CompileResult};
use crate::cache::CacheKey;
use crate::config::{ConfigError, NormalizedOptions, RawOptions};
use crate::debug;
use crate::engine::{Engine, EngineAdapter, EngineCapability, OxcEngine};
use crate::error::Result;

/// Name the compressor registers under in a pipeline.
pub const COMPRESSOR_NAME: &str = "jsqueeze";

/// Immutable configuration shared by every call through one compressor.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressorConfig {
    options: NormalizedOptions,
    cache_key: CacheKey,
    capability: EngineCapability,
}

impl CompressorConfig {
    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }

    pub fn capability(&self) -> EngineCapability {
        self.capability
    }
}

/// A JavaScript compressor bound to one set of options and one engine.
#[derive(Debug, Clone)]
pub struct Compressor {
    config: CompressorConfig,
    adapter: EngineAdapter,
}

impl Compressor {
    /// Build with the default engine and a map-capable pipeline.
    pub fn new(options: RawOptions) -> Result<Self, ConfigError> {
        Self::builder().options(options).build()
    }

    /// Build from an options object given as JSON.
    pub fn from_json(options: &serde_json::Value) -> Result<Self, ConfigError> {
        Self::new(RawOptions::from_json_value(options)?)
    }

    pub fn builder() -> CompressorBuilder {
        CompressorBuilder::default()
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn options(&self) -> &NormalizedOptions {
        &self.config.options
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.config.cache_key
    }

    pub fn capability(&self) -> EngineCapability {
        self.config.capability
    }

    /// Compile one asset.
    ///
    /// On a map-capable pipeline the result carries the engine's map
    /// combined with `input.metadata.map`.
    pub fn call(&self, input: &AssetInput) -> Result<CompileResult> {
        debug!("compress"; "{} ({} bytes, {})",
            input.filename, input.data.len(), self.config.capability);
        self.adapter.compile(&self.config.options, input)
    }
}

/// Builder for [`Compressor`].
///
/// # Example
///
/// ```ignore
/// let compressor = Compressor::builder()
///     .options(RawOptions::from_toml_str("mangle = false")?)
///     .pipeline_version("3.7.2")
///     .build()?;
/// ```
#[derive(Default)]
pub struct CompressorBuilder {
    options: RawOptions,
    capability: Option<EngineCapability>,
    pipeline_version: Option<String>,
    engine: Option<Arc<dyn Engine>>,
}

impl CompressorBuilder {
    pub fn options(mut self, options: RawOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the protocol directly. Takes precedence over `pipeline_version`.
    pub fn capability(mut self, capability: EngineCapability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Derive the protocol from the host pipeline's version at build time.
    pub fn pipeline_version(mut self, version: impl Into<String>) -> Self {
        self.pipeline_version = Some(version.into());
        self
    }

    /// Replace the default [`OxcEngine`].
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<Compressor, ConfigError> {
        let capability = match (self.capability, self.pipeline_version.as_deref()) {
            (Some(capability), _) => capability,
            (None, Some(version)) => EngineCapability::for_pipeline_version(version)?,
            (None, None) => EngineCapability::default(),
        };

        let options = NormalizedOptions::from_raw(&self.options)?;

        let engine = self
            .engine
            .unwrap_or_else(|| Arc::new(OxcEngine::new()) as Arc<dyn Engine>);
        let unsupported = engine.unsupported(&options);
        if !unsupported.is_empty() {
            return Err(ConfigError::UnsupportedByEngine {
                engine: engine.name().to_string(),
                fields: unsupported,
            });
        }

        let adapter = EngineAdapter::new(engine, capability);
        let cache_key = CacheKey::derive(
            adapter.engine().name(),
            adapter.engine().version(),
            &adapter.version(),
            &options,
        )?;
        debug!("compress"; "ready with cache key {}", cache_key);

        Ok(Compressor {
            config: CompressorConfig {
                options,
                cache_key,
                capability,
            },
            adapter,
        })
    }
}
