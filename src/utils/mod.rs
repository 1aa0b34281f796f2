//! Utility modules shared across the compressor.

pub mod mime;
pub mod path;
