//! Host pipeline capability negotiation.

use serde::Serialize;
use std::fmt;

use crate::config::ConfigError;

/// Which engine protocol the host pipeline can consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCapability {
    /// The pipeline predates map metadata; results carry code only.
    LegacyNoMap,
    /// The pipeline carries `metadata.map`; results carry a combined map.
    #[default]
    MapCapable,
}

impl EngineCapability {
    /// First pipeline major version that carries source maps.
    pub const MAP_SUPPORT_MAJOR: u64 = 4;

    /// Capability of a pipeline, from its version string (`"4.1.0"`, `"v3"`).
    pub fn for_pipeline_version(version: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::PipelineVersion(version.to_string());

        let trimmed = version.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let major = trimmed.split('.').next().ok_or_else(invalid)?;
        let major: u64 = major.parse().map_err(|_| invalid())?;

        Ok(if major >= Self::MAP_SUPPORT_MAJOR {
            Self::MapCapable
        } else {
            Self::LegacyNoMap
        })
    }

    #[inline]
    pub const fn produces_map(self) -> bool {
        matches!(self, Self::MapCapable)
    }

    /// Suffix folded into the adapter version.
    pub const fn protocol(self) -> &'static str {
        match self {
            Self::LegacyNoMap => "legacy",
            Self::MapCapable => "map",
        }
    }
}

impl fmt::Display for EngineCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol())
    }
}
