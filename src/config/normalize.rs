//! Option normalization: defaults, shorthand propagation and validation.
//!
//! The result is the option tree every engine call and the cache key are
//! built from, so two equal [`NormalizedOptions`] values must describe the
//! same compilation.

use serde::Serialize;
use std::collections::BTreeMap;

use super::section::{
    CompressConfig, DefineValue, MangleConfig, OutputConfig, Shorthand, validate_defines,
};
use super::toggle::Toggle;
use super::{ConfigDiagnostics, ConfigError, RawOptions};

/// Schema version of [`NormalizedOptions`], part of the adapter version.
pub const SCHEMA_VERSION: u32 = 1;

/// Fully resolved options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedOptions {
    /// Compressor settings; `None` when compression is disabled.
    pub compress: Option<CompressConfig>,
    /// Mangler settings; `None` when mangling is disabled.
    pub mangle: Option<MangleConfig>,
    pub output: OutputConfig,
    pub define: BTreeMap<String, DefineValue>,
    pub module: bool,
}

impl Default for NormalizedOptions {
    fn default() -> Self {
        Self {
            compress: Some(CompressConfig::default()),
            mangle: Some(MangleConfig::default()),
            output: OutputConfig::default(),
            define: BTreeMap::new(),
            module: false,
        }
    }
}

impl NormalizedOptions {
    /// Resolve typed raw options.
    pub fn from_raw(raw: &RawOptions) -> Result<Self, ConfigError> {
        let shorthand = Shorthand {
            keep_fnames: raw.keep_fnames,
            keep_classnames: raw.keep_classnames,
        };

        let compress = resolve_group(raw.compress.as_ref(), |custom| {
            CompressConfig::resolve(custom, shorthand)
        });
        let mangle = resolve_group(raw.mangle.as_ref(), |custom| {
            MangleConfig::resolve(custom, shorthand)
        });
        let output = OutputConfig::resolve(raw.output.as_ref(), raw.comments);

        let options = Self {
            compress,
            mangle,
            output,
            define: raw.define.clone(),
            module: raw.module.unwrap_or(false),
        };
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.output.validate(&mut diag);
        validate_defines(&self.define, &mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

/// Normalize an options object given as JSON.
///
/// Unknown keys fail with [`ConfigError::UnknownOptions`]; `raw` is only
/// read, never modified.
pub fn normalize(raw: &serde_json::Value) -> Result<NormalizedOptions, ConfigError> {
    NormalizedOptions::from_raw(&RawOptions::from_json_value(raw)?)
}

/// Absent and `true` enable a group with defaults, `false` disables it.
fn resolve_group<R, T>(toggle: Option<&Toggle<R>>, resolve: impl FnOnce(Option<&R>) -> T) -> Option<T> {
    match toggle {
        None | Some(Toggle::Enabled(true)) => Some(resolve(None)),
        Some(Toggle::Custom(custom)) => Some(resolve(Some(custom))),
        Some(Toggle::Enabled(false)) => None,
    }
}
