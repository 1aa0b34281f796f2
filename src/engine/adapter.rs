//! Protocol selection and the single call into the engine.

use std::path::Path;
use std::sync::Arc;

use super::{Engine, EngineCapability, EngineOptions};
use crate::asset::{AssetInput, CompileResult};
use crate::config::NormalizedOptions;
use crate::error::{CompileError, Result};
use crate::sourcemap::{self, SourceMap};

/// Version of this adapter's translation from options to engine calls.
///
/// Bump whenever the same options start producing different output.
pub const ADAPTER_VERSION: &str = "1";

/// Owns the engine and the protocol chosen for it.
#[derive(Clone)]
pub struct EngineAdapter {
    engine: Arc<dyn Engine>,
    capability: EngineCapability,
}

impl EngineAdapter {
    pub fn new(engine: Arc<dyn Engine>, capability: EngineCapability) -> Self {
        Self { engine, capability }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn capability(&self) -> EngineCapability {
        self.capability
    }

    /// Adapter version with the protocol folded in, e.g. `1+map`.
    pub fn version(&self) -> String {
        format!("{ADAPTER_VERSION}+{}", self.capability.protocol())
    }

    /// Run the engine once on `input`.
    ///
    /// Engine failures become [`CompileError`]s carrying the engine text.
    /// Nothing is retried.
    pub fn compile(&self, options: &NormalizedOptions, input: &AssetInput) -> Result<CompileResult> {
        let engine_options = EngineOptions::new(options);

        match self.capability {
            EngineCapability::LegacyNoMap => {
                let data = self
                    .engine
                    .compile(&input.data, &engine_options)
                    .map_err(|e| compile_error(e.message, input))?;
                Ok(CompileResult { data, map: None })
            }
            EngineCapability::MapCapable => {
                let source_name = map_source_name(&input.filename);
                let (data, raw_map) = self
                    .engine
                    .compile_with_map(&input.data, &engine_options.with_source_map(&source_name))
                    .map_err(|e| compile_error(e.message, input))?;

                let fresh = SourceMap::from_json_str(&raw_map)?;
                let map = sourcemap::combine(input.metadata.map.as_ref(), fresh, input)?;
                Ok(CompileResult {
                    data,
                    map: Some(map),
                })
            }
        }
    }
}

impl std::fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("engine", &self.engine.name())
            .field("engine_version", &self.engine.version())
            .field("capability", &self.capability)
            .finish()
    }
}

fn compile_error(message: String, input: &AssetInput) -> CompileError {
    CompileError {
        message,
        filename: input.filename.clone(),
    }
}

/// The engine names its source after the asset's file name; map
/// formatting resolves it against the asset's directory.
fn map_source_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
