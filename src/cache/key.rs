//! Content-addressed cache keys (blake3 over canonical JSON).

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{ConfigError, NormalizedOptions, SCHEMA_VERSION};

/// A 256-bit digest of a compressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionsDigest([u8; 32]);

impl OptionsDigest {
    /// Hash the canonical JSON form of `value`.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let canonical = canonical_json(value)?;
        Ok(Self(*blake3::hash(canonical.as_bytes()).as_bytes()))
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

/// Serialize `value` as JSON with object keys sorted at every depth.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let value = sort_keys(serde_json::to_value(value)?);
    serde_json::to_string(&value)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<_, _>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// What the digest covers. Field order does not matter; keys are sorted.
#[derive(Serialize)]
struct KeyMaterial<'a> {
    schema: u32,
    engine: &'a str,
    engine_version: &'a str,
    adapter_version: &'a str,
    options: &'a NormalizedOptions,
}

/// Cache key identifying a compressor configuration.
///
/// Format: `{engine}:{engine_version}:{adapter_version}:{blake3 hex}`.
/// Equal inputs always give equal keys, in any process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(
        engine: &str,
        engine_version: &str,
        adapter_version: &str,
        options: &NormalizedOptions,
    ) -> Result<Self, ConfigError> {
        let digest = OptionsDigest::of(&KeyMaterial {
            schema: SCHEMA_VERSION,
            engine,
            engine_version,
            adapter_version,
            options,
        })?;
        Ok(Self(format!(
            "{engine}:{engine_version}:{adapter_version}:{}",
            digest.to_hex()
        )))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing hex digest.
    pub fn digest(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or_default()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
