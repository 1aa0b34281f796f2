//! jsqueeze - a JavaScript compressor for asset pipelines.
//!
//! Wraps a minification engine (oxc by default) as a cacheable pipeline
//! compressor:
//!
//! - declarative options are normalized into a versioned schema, and
//!   unknown keys are rejected before the engine runs
//! - the cache key is a digest of engine version, adapter version and
//!   normalized options
//! - on map-capable pipelines the engine's source map is composed with the
//!   map already attached to the asset
//!
//! # Example
//!
//! ```ignore
//! use jsqueeze::{AssetInput, Compressor, RawOptions};
//!
//! let compressor = Compressor::new(RawOptions::from_toml_str("mangle = false")?)?;
//! let result = compressor.call(&AssetInput::new(source, "js/app.js"))?;
//! println!("{} ({})", result.data, compressor.cache_key());
//! ```

pub mod logger;

pub mod asset;
pub mod cache;
pub mod compressor;
pub mod config;
pub mod engine;
pub mod error;
pub mod sourcemap;
pub mod utils;

pub use asset::{AssetInput, AssetMetadata, CompileResult};
pub use cache::CacheKey;
pub use compressor::{
    AssetCompressor, COMPRESSOR_NAME, Compressor, CompressorBuilder, CompressorConfig,
    CompressorRegistry, cache_key, call, compile, instance,
};
pub use config::{ConfigError, NormalizedOptions, RawOptions, normalize};
pub use engine::{Engine, EngineAdapter, EngineCapability, EngineError, EngineOptions, OxcEngine};
pub use error::{CompileError, Error, ErrorKind, Result};
pub use sourcemap::{MapCombineError, SourceMap, combine, format_source_map};
