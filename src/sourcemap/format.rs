//! Pipeline-relative map paths.
//!
//! Engines and earlier stages name sources however they like: absolute
//! paths, `file://` URIs, or paths relative to the asset. Before a map
//! leaves this crate, `file` becomes the asset's logical path and every
//! source becomes relative to that file's directory.

use std::path::{Path, PathBuf};

use super::SourceMap;
use crate::asset::AssetInput;
use crate::utils::path::{clean, relative_to, to_slash};

/// Rewrite `file` and `sources` of `map` relative to `input`'s load path.
///
/// Sources with a non-file URL scheme (`webpack://`, `https://`) are kept
/// verbatim. Mappings, names and contents are untouched.
pub fn format_source_map(mut map: SourceMap, input: &AssetInput) -> SourceMap {
    let paths = AssetPaths::new(input);

    map.sources = map
        .sources
        .iter()
        .map(|source| paths.format_source(source))
        .collect();
    map.file = Some(to_slash(&paths.logical));
    map
}

struct AssetPaths {
    base: Option<PathBuf>,
    /// Directory of the asset on disk (or as close as the input allows).
    dir: PathBuf,
    /// The asset's path relative to `base`.
    logical: PathBuf,
}

impl AssetPaths {
    fn new(input: &AssetInput) -> Self {
        let base = input.base_dir().map(clean);
        let filename = Path::new(&input.filename);

        let on_disk = match input.load_path.as_deref() {
            Some(load_path) if filename.is_relative() => clean(&load_path.join(filename)),
            _ => clean(filename),
        };
        let logical = strip_base(base.as_deref(), &on_disk).unwrap_or_else(|| on_disk.clone());
        let dir = on_disk.parent().map(Path::to_path_buf).unwrap_or_default();

        Self { base, dir, logical }
    }

    fn format_source(&self, source: &str) -> String {
        let stripped = source.strip_prefix("file://").unwrap_or(source);
        if stripped.contains("://") {
            return source.to_string();
        }

        let path = Path::new(stripped);
        let resolved = if path.is_absolute() {
            clean(path)
        } else {
            clean(&self.dir.join(path))
        };
        let logical = strip_base(self.base.as_deref(), &resolved).unwrap_or(resolved);

        let file_dir = self.logical.parent().unwrap_or(Path::new(""));
        let relative = relative_to(&logical, file_dir).unwrap_or(logical);
        to_slash(&relative)
    }
}

/// `path` below `base`, or `None` when it lies elsewhere.
fn strip_base(base: Option<&Path>, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(base?).ok().map(Path::to_path_buf)
}
