//! Registration of compressors with a host pipeline.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{COMPRESSOR_NAME, Compressor, facade};
use crate::asset::{AssetInput, CompileResult};
use crate::error::Result;
use crate::log;
use crate::utils::mime;

/// What a pipeline needs from a compressor.
pub trait AssetCompressor: Send + Sync {
    fn call(&self, input: &AssetInput) -> Result<CompileResult>;

    /// Configuration part of the pipeline's cache entry key.
    fn cache_key(&self) -> &str;
}

impl AssetCompressor for Compressor {
    fn call(&self, input: &AssetInput) -> Result<CompileResult> {
        Compressor::call(self, input)
    }

    fn cache_key(&self) -> &str {
        Compressor::cache_key(self).as_str()
    }
}

/// Compressors by `(mime type, name)`.
///
/// MIME types are normalized, so `text/javascript` and
/// `application/javascript` share entries.
#[derive(Clone, Default)]
pub struct CompressorRegistry {
    entries: FxHashMap<(String, String), Arc<dyn AssetCompressor>>,
}

impl CompressorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `compressor`, returning the one it replaced.
    pub fn register(
        &mut self,
        mime: &str,
        name: &str,
        compressor: Arc<dyn AssetCompressor>,
    ) -> Option<Arc<dyn AssetCompressor>> {
        let key = (mime::normalize(mime), name.to_string());
        let replaced = self.entries.insert(key, compressor);
        if replaced.is_some() {
            log!("compress"; "replaced `{}` for {}", name, mime);
        }
        replaced
    }

    /// Register the default compressor for JavaScript.
    pub fn register_defaults(&mut self) -> &mut Self {
        self.register(mime::types::JAVASCRIPT, COMPRESSOR_NAME, facade::instance());
        self
    }

    pub fn get(&self, mime: &str, name: &str) -> Option<Arc<dyn AssetCompressor>> {
        self.entries
            .get(&(mime::normalize(mime), name.to_string()))
            .cloned()
    }

    /// Names registered for `mime`, sorted.
    pub fn names_for(&self, mime: &str) -> Vec<&str> {
        let mime = mime::normalize(mime);
        let mut names: Vec<&str> = self
            .entries
            .keys()
            .filter(|(m, _)| *m == mime)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CompressorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("CompressorRegistry").field("entries", &keys).finish()
    }
}
