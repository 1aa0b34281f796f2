//! Cache key derivation.
//!
//! The host pipeline owns the artifact cache; this crate only supplies the
//! part of the key that describes the compressor configuration.

mod key;

pub use key::{CacheKey, OptionsDigest, canonical_json};
