//! Transitive composition of source maps.
//!
//! The engine's map describes `minified -> asset`, the upstream map
//! describes `asset -> original`. Composition walks every fresh mapping,
//! finds the upstream segment covering its original position and emits
//! `minified -> original`.

use rustc_hash::FxHashMap;

use super::{Mapping, MapCombineError, OriginalLocation, SourceMap, SourceMapBuilder, format_source_map};
use crate::asset::AssetInput;
use crate::debug;

/// A composed map plus how many positions could not be traced upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub map: SourceMap,
    /// Fresh positions kept pointing at the intermediate source.
    pub unresolved: usize,
}

/// Format `fresh` for the pipeline and compose it with `upstream`.
///
/// Without an upstream map (or with one that has no mappings) the
/// formatted fresh map is returned as is. Only an upstream map that cannot
/// be decoded at all is an error.
pub fn combine(
    upstream: Option<&serde_json::Value>,
    fresh: SourceMap,
    input: &AssetInput,
) -> Result<SourceMap, MapCombineError> {
    let fresh = format_source_map(fresh, input);

    let Some(upstream) = upstream else {
        return Ok(fresh);
    };
    let upstream = SourceMap::from_value(upstream)?;
    if upstream.mappings.is_empty() {
        return Ok(fresh);
    }

    let Composed { map, unresolved } = compose(&upstream, &fresh);
    if unresolved > 0 {
        debug!("sourcemap"; "{}: {} of {} positions not covered upstream",
            input.filename, unresolved, map.mappings.len());
    }
    Ok(map)
}

/// Compose `fresh` (output -> intermediate) with `upstream`
/// (intermediate -> original).
///
/// Neither map needs to be sorted; the result is the same for any entry
/// order. Every fresh mapping yields exactly one output mapping.
pub fn compose(upstream: &SourceMap, fresh: &SourceMap) -> Composed {
    let index = UpstreamIndex::new(upstream);

    let mut ordered = fresh.mappings.clone();
    ordered.sort();

    let mut builder = SourceMapBuilder::new();
    let mut unresolved = 0;

    for mapping in ordered {
        let Some(intermediate) = mapping.original else {
            builder.push(mapping);
            continue;
        };

        let original = match index.lookup(intermediate.line, intermediate.column) {
            Some(traced) => {
                let mut located = builder.import(upstream, traced);
                if located.name.is_none()
                    && let Some(name) = intermediate.name.and_then(|n| fresh.name(n))
                {
                    located.name = Some(builder.add_name(name));
                }
                located
            }
            None => {
                unresolved += 1;
                builder.import(fresh, intermediate)
            }
        };

        builder.push(Mapping {
            generated: mapping.generated,
            original: Some(original),
        });
    }

    Composed {
        map: builder.build(fresh.file.clone()),
        unresolved,
    }
}

/// Upstream mappings grouped by generated line, sorted by column.
struct UpstreamIndex<'a> {
    lines: FxHashMap<u32, Vec<&'a Mapping>>,
}

impl<'a> UpstreamIndex<'a> {
    fn new(map: &'a SourceMap) -> Self {
        let mut lines: FxHashMap<u32, Vec<&'a Mapping>> = FxHashMap::default();
        for mapping in &map.mappings {
            lines.entry(mapping.generated.line).or_default().push(mapping);
        }
        for segments in lines.values_mut() {
            segments.sort();
        }
        Self { lines }
    }

    /// Greatest segment on `line` starting at or before `column`.
    ///
    /// A generated-only segment there means the position is unmapped.
    fn lookup(&self, line: u32, column: u32) -> Option<OriginalLocation> {
        let segments = self.lines.get(&line)?;
        let end = segments.partition_point(|m| m.generated.column <= column);
        segments.get(end.checked_sub(1)?)?.original
    }
}
