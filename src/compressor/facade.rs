//! Process-wide default compressor.
//!
//! Built on first use and kept for the life of the process. Concurrent
//! first uses construct it exactly once. Compressors built elsewhere never
//! touch it.

use std::sync::{Arc, LazyLock};

use super::Compressor;
use crate::asset::{AssetInput, CompileResult};
use crate::cache::CacheKey;
use crate::error::Result;

static DEFAULT: LazyLock<Arc<Compressor>> = LazyLock::new(|| {
    Arc::new(
        Compressor::builder()
            .build()
            .expect("default options should be supported by the default engine"),
    )
});

/// The shared default compressor.
#[inline]
pub fn instance() -> Arc<Compressor> {
    Arc::clone(&DEFAULT)
}

/// Compile with the default compressor.
pub fn compile(input: &AssetInput) -> Result<CompileResult> {
    DEFAULT.call(input)
}

/// Pipeline-facing alias of [`compile`].
#[inline]
pub fn call(input: &AssetInput) -> Result<CompileResult> {
    compile(input)
}

/// Cache key of the default compressor.
pub fn cache_key() -> &'static CacheKey {
    DEFAULT.cache_key()
}
