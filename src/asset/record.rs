//! Asset records exchanged with the host pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sourcemap::SourceMap;

/// Metadata the pipeline attaches to an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Map produced by earlier pipeline stages, kept in its JSON form
    /// until combination decodes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<serde_json::Value>,
}

/// An asset handed to a compressor. Read-only to this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub data: String,
    /// Logical path of the asset, relative to `load_path` or absolute.
    pub filename: String,
    /// Root the pipeline resolved `filename` from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_path: Option<PathBuf>,
    #[serde(default)]
    pub metadata: AssetMetadata,
}

impl AssetInput {
    pub fn new(data: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn with_load_path(mut self, load_path: impl Into<PathBuf>) -> Self {
        self.load_path = Some(load_path.into());
        self
    }

    pub fn with_map(mut self, map: serde_json::Value) -> Self {
        self.metadata.map = Some(map);
        self
    }

    /// Directory that pipeline-relative paths are expressed from.
    ///
    /// The load path when known, otherwise the directory of an absolute
    /// filename, otherwise nothing (filenames are already relative).
    pub fn base_dir(&self) -> Option<&Path> {
        if let Some(load_path) = &self.load_path {
            return Some(load_path);
        }
        let filename = Path::new(&self.filename);
        if filename.is_absolute() {
            filename.parent()
        } else {
            None
        }
    }
}

/// Output of one compile call. Owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub data: String,
    /// Present only on the map-capable protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<SourceMap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_dir() {
        let input = AssetInput::new("", "js/app.js").with_load_path("/app/assets");
        assert_eq!(input.base_dir(), Some(Path::new("/app/assets")));

        let input = AssetInput::new("", "/srv/js/app.js");
        assert_eq!(input.base_dir(), Some(Path::new("/srv/js")));

        let input = AssetInput::new("", "js/app.js");
        assert_eq!(input.base_dir(), None);
    }

    #[test]
    fn test_deserialize_pipeline_record() {
        let input: AssetInput = serde_json::from_value(json!({
            "data": "var a = 1;",
            "filename": "app.js",
            "metadata": { "map": { "version": 3, "sources": [], "mappings": "" } },
        }))
        .unwrap();
        assert_eq!(input.filename, "app.js");
        assert!(input.metadata.map.is_some());
        assert!(input.load_path.is_none());
    }
}
