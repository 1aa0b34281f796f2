//! Source map model, codec and combination.
//!
//! Maps cross this crate as standard v3 JSON. They are decoded into a flat
//! list of [`Mapping`]s (index maps are flattened, `sourceRoot` is folded
//! into `sources`) so that every stage works on one representation.
//!
//! | Module    | Purpose                                         |
//! |-----------|-------------------------------------------------|
//! | `vlq`     | Base64 VLQ codec                                |
//! | `format`  | Rewrite `file` / `sources` to pipeline paths    |
//! | `combine` | Compose a fresh map with an upstream map        |

mod combine;
mod error;
mod format;
pub mod vlq;

pub use combine::{Composed, combine, compose};
pub use error::MapCombineError;
pub use format::format_source_map;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The only source map revision this crate reads or writes.
pub const SOURCE_MAP_VERSION: u32 = 3;

// ============================================================================
// Decoded representation
// ============================================================================

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Where a generated position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OriginalLocation {
    /// Index into [`SourceMap::sources`].
    pub source: u32,
    pub line: u32,
    pub column: u32,
    /// Index into [`SourceMap::names`].
    pub name: Option<u32>,
}

/// One segment of the `mappings` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mapping {
    pub generated: Position,
    /// `None` for generated-only segments.
    pub original: Option<OriginalLocation>,
}

/// A decoded v3 source map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    pub file: Option<String>,
    pub sources: Vec<String>,
    /// Parallel to `sources`; may be shorter or empty.
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    /// Not necessarily sorted.
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Decode standard v3 JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, MapCombineError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Decode a v3 map held as a JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, MapCombineError> {
        let raw = RawSourceMap::deserialize(value)?;
        Self::from_raw(raw)
    }

    /// Encode as standard v3 JSON text.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_raw())
    }

    /// Encode as a v3 JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.to_raw())
    }

    /// Source file name by index.
    pub fn source(&self, index: u32) -> Option<&str> {
        self.sources.get(index as usize).map(String::as_str)
    }

    /// Embedded source content by index.
    pub fn source_content(&self, index: u32) -> Option<&str> {
        self.sources_content
            .get(index as usize)
            .and_then(|c| c.as_deref())
    }

    /// Symbol name by index.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Find the mapping covering a generated position.
    ///
    /// Picks the segment on `line` with the greatest column not after
    /// `column`. Does not assume `mappings` is sorted.
    pub fn lookup(&self, line: u32, column: u32) -> Option<&Mapping> {
        self.mappings
            .iter()
            .filter(|m| m.generated.line == line && m.generated.column <= column)
            .max()
    }

    fn from_raw(raw: RawSourceMap) -> Result<Self, MapCombineError> {
        if raw.version != SOURCE_MAP_VERSION {
            return Err(MapCombineError::UnsupportedVersion(raw.version));
        }

        if let Some(sections) = raw.sections {
            return Self::flatten_sections(raw.file, sections);
        }

        let sources: Vec<String> = raw
            .sources
            .into_iter()
            .map(|s| with_source_root(raw.source_root.as_deref(), s.unwrap_or_default()))
            .collect();

        let mappings = decode_mappings(&raw.mappings)?;
        for mapping in &mappings {
            let Some(original) = mapping.original else {
                continue;
            };
            if original.source as usize >= sources.len() {
                return Err(MapCombineError::SourceOutOfRange {
                    index: original.source,
                    len: sources.len(),
                });
            }
            if let Some(name) = original.name
                && name as usize >= raw.names.len()
            {
                return Err(MapCombineError::NameOutOfRange {
                    index: name,
                    len: raw.names.len(),
                });
            }
        }

        Ok(Self {
            file: raw.file,
            sources,
            sources_content: raw.sources_content,
            names: raw.names,
            mappings,
        })
    }

    /// Merge the sections of an index map into one flat map.
    fn flatten_sections(
        file: Option<String>,
        sections: Vec<RawSection>,
    ) -> Result<Self, MapCombineError> {
        let mut builder = SourceMapBuilder::new();

        for section in sections {
            if let Some(url) = section.url {
                return Err(MapCombineError::IndexMapUrl(url));
            }
            let sub = section.map.ok_or(MapCombineError::MissingMap)?;
            let sub = Self::from_raw(*sub)?;
            let offset = section.offset;

            for mapping in &sub.mappings {
                let overflow = || MapCombineError::Segment {
                    line: mapping.generated.line as usize,
                    reason: "section offset overflows the generated position",
                };
                let generated = if mapping.generated.line == 0 {
                    let column = offset
                        .column
                        .checked_add(mapping.generated.column)
                        .ok_or_else(overflow)?;
                    Position::new(offset.line, column)
                } else {
                    let line = offset
                        .line
                        .checked_add(mapping.generated.line)
                        .ok_or_else(overflow)?;
                    Position::new(line, mapping.generated.column)
                };
                let original = mapping
                    .original
                    .map(|orig| builder.import(&sub, orig));
                builder.push(Mapping {
                    generated,
                    original,
                });
            }
        }

        Ok(builder.build(file))
    }

    fn to_raw(&self) -> RawSourceMap {
        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            self.sources_content.clone()
        } else {
            Vec::new()
        };

        RawSourceMap {
            version: SOURCE_MAP_VERSION,
            file: self.file.clone(),
            source_root: None,
            sources: self.sources.iter().cloned().map(Some).collect(),
            sources_content,
            names: self.names.clone(),
            mappings: encode_mappings(&self.mappings),
            sections: None,
        }
    }
}

impl Serialize for SourceMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SourceMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSourceMap::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

fn with_source_root(root: Option<&str>, source: String) -> String {
    match root {
        Some(root) if !root.is_empty() => {
            format!("{}/{}", root.trim_end_matches('/'), source)
        }
        _ => source,
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates mappings while interning sources and names.
#[derive(Debug, Default)]
pub(crate) struct SourceMapBuilder {
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    source_ids: FxHashMap<String, u32>,
    names: Vec<String>,
    name_ids: FxHashMap<String, u32>,
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source; the first non-empty content wins.
    pub fn add_source(&mut self, source: &str, content: Option<&str>) -> u32 {
        if let Some(&id) = self.source_ids.get(source) {
            let slot = &mut self.sources_content[id as usize];
            if slot.is_none() {
                *slot = content.map(str::to_string);
            }
            return id;
        }
        let id = self.sources.len() as u32;
        self.sources.push(source.to_string());
        self.sources_content.push(content.map(str::to_string));
        self.source_ids.insert(source.to_string(), id);
        id
    }

    pub fn add_name(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.name_ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_ids.insert(name.to_string(), id);
        id
    }

    /// Re-home a location from `map` into this builder's tables.
    pub fn import(&mut self, map: &SourceMap, original: OriginalLocation) -> OriginalLocation {
        let source = self.add_source(
            map.source(original.source).unwrap_or_default(),
            map.source_content(original.source),
        );
        let name = original
            .name
            .and_then(|n| map.name(n))
            .map(|n| self.add_name(n));
        OriginalLocation {
            source,
            line: original.line,
            column: original.column,
            name,
        }
    }

    pub fn push(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    pub fn build(self, file: Option<String>) -> SourceMap {
        SourceMap {
            file,
            sources: self.sources,
            sources_content: self.sources_content,
            names: self.names,
            mappings: self.mappings,
        }
    }
}

// ============================================================================
// Mappings codec
// ============================================================================

/// Decode the `mappings` field into absolute positions.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Mapping>, MapCombineError> {
    let mut out = Vec::new();
    let (mut source, mut orig_line, mut orig_column, mut name) = (0i64, 0i64, 0i64, 0i64);

    for (line, text) in mappings.split(';').enumerate() {
        let mut column = 0i64;

        for segment in text.split(',').filter(|s| !s.is_empty()) {
            let fields =
                vlq::decode_segment(segment).map_err(|error| MapCombineError::Vlq { line, error })?;

            let original = match fields.len() {
                1 => None,
                4 | 5 => {
                    source += fields[1];
                    orig_line += fields[2];
                    orig_column += fields[3];
                    let name = if fields.len() == 5 {
                        name += fields[4];
                        Some(to_index(name, line)?)
                    } else {
                        None
                    };
                    Some(OriginalLocation {
                        source: to_index(source, line)?,
                        line: to_index(orig_line, line)?,
                        column: to_index(orig_column, line)?,
                        name,
                    })
                }
                _ => {
                    return Err(MapCombineError::Segment {
                        line,
                        reason: "expected 1, 4 or 5 fields",
                    });
                }
            };

            column += fields[0];
            out.push(Mapping {
                generated: Position::new(to_index(line as i64, line)?, to_index(column, line)?),
                original,
            });
        }
    }

    Ok(out)
}

fn to_index(value: i64, line: usize) -> Result<u32, MapCombineError> {
    u32::try_from(value).map_err(|_| MapCombineError::Segment {
        line,
        reason: "field resolves to a negative or oversized value",
    })
}

/// Encode mappings in generated order, dropping exact duplicates.
pub fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut sorted = mappings.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut out = String::new();
    let mut line = 0u32;
    let mut first_in_line = true;
    let mut prev_column = 0i64;
    let (mut source, mut orig_line, mut orig_column, mut name) = (0i64, 0i64, 0i64, 0i64);

    for mapping in &sorted {
        while line < mapping.generated.line {
            out.push(';');
            line += 1;
            prev_column = 0;
            first_in_line = true;
        }
        if !first_in_line {
            out.push(',');
        }
        first_in_line = false;

        let column = i64::from(mapping.generated.column);
        vlq::encode_value(column - prev_column, &mut out);
        prev_column = column;

        if let Some(original) = mapping.original {
            let fields = [
                (&mut source, original.source),
                (&mut orig_line, original.line),
                (&mut orig_column, original.column),
            ];
            for (prev, value) in fields {
                vlq::encode_value(i64::from(value) - *prev, &mut out);
                *prev = i64::from(value);
            }
            if let Some(index) = original.name {
                vlq::encode_value(i64::from(index) - name, &mut out);
                name = i64::from(index);
            }
        }
    }

    out
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_root: Option<String>,
    #[serde(default)]
    sources: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sources_content: Vec<Option<String>>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    mappings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sections: Option<Vec<RawSection>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSection {
    offset: RawOffset,
    #[serde(default)]
    map: Option<Box<RawSourceMap>>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawOffset {
    line: u32,
    column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn original(source: u32, line: u32, column: u32) -> Option<OriginalLocation> {
        Some(OriginalLocation {
            source,
            line,
            column,
            name: None,
        })
    }

    #[test]
    fn test_decode_relative_fields() {
        let mappings = decode_mappings("AAAA,IAAI;AACA").unwrap();
        assert_eq!(
            mappings,
            vec![
                Mapping {
                    generated: Position::new(0, 0),
                    original: original(0, 0, 0),
                },
                Mapping {
                    generated: Position::new(0, 4),
                    original: original(0, 0, 4),
                },
                Mapping {
                    generated: Position::new(1, 0),
                    original: original(0, 1, 4),
                },
            ]
        );
    }

    #[test]
    fn test_decode_generated_only_and_names() {
        let mappings = decode_mappings("A,CAAAA;;E").unwrap();
        assert_eq!(mappings.len(), 3);
        assert_eq!(mappings[0].original, None);
        assert_eq!(mappings[1].original.unwrap().name, Some(0));
        assert_eq!(mappings[2].generated, Position::new(2, 2));
    }

    #[test]
    fn test_decode_rejects_bad_segments() {
        assert!(matches!(
            decode_mappings("AA"),
            Err(MapCombineError::Segment { line: 0, .. })
        ));
        assert!(matches!(
            decode_mappings("AAAA;AD"),
            Err(MapCombineError::Segment { line: 1, .. })
        ));
        assert!(matches!(
            decode_mappings("A!"),
            Err(MapCombineError::Vlq { line: 0, .. })
        ));
    }

    #[test]
    fn test_encode_is_order_independent() {
        let a = Mapping {
            generated: Position::new(0, 0),
            original: original(0, 0, 0),
        };
        let b = Mapping {
            generated: Position::new(0, 4),
            original: original(0, 0, 4),
        };
        let c = Mapping {
            generated: Position::new(1, 0),
            original: original(0, 1, 4),
        };
        assert_eq!(encode_mappings(&[a, b, c]), "AAAA,IAAI;AACA");
        assert_eq!(encode_mappings(&[c, a, b, a]), "AAAA,IAAI;AACA");
    }

    #[test]
    fn test_parse_and_serialize() {
        let map = SourceMap::from_value(&json!({
            "version": 3,
            "file": "app.js",
            "sourceRoot": "src/",
            "sources": ["a.js", null],
            "names": ["foo"],
            "mappings": "AAAAA,ECAA",
        }))
        .unwrap();
        assert_eq!(map.sources, vec!["src/a.js".to_string(), "src/".to_string()]);
        assert_eq!(map.mappings.len(), 2);
        assert_eq!(map.mappings[1].original, original(1, 0, 0));

        let value = map.to_value().unwrap();
        assert_eq!(value["version"], 3);
        assert_eq!(value["file"], "app.js");
        assert_eq!(value["mappings"], "AAAAA,ECAA");
        assert!(value.get("sourceRoot").is_none());
        assert!(value.get("sourcesContent").is_none());
    }

    #[test]
    fn test_rejects_other_versions() {
        let err = SourceMap::from_value(&json!({ "version": 2, "sources": [], "mappings": "" }))
            .unwrap_err();
        assert!(matches!(err, MapCombineError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_rejects_out_of_range_indices() {
        let err = SourceMap::from_value(&json!({
            "version": 3, "sources": ["a.js"], "names": [], "mappings": "ACAA",
        }))
        .unwrap_err();
        assert!(matches!(err, MapCombineError::SourceOutOfRange { index: 1, len: 1 }));

        let err = SourceMap::from_value(&json!({
            "version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAAA",
        }))
        .unwrap_err();
        assert!(matches!(err, MapCombineError::NameOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SourceMap::from_json_str("{ not json"),
            Err(MapCombineError::Json(_))
        ));
        assert!(matches!(
            SourceMap::from_json_str(r#"{"version": 3, "mappings": 12}"#),
            Err(MapCombineError::Json(_))
        ));
    }

    #[test]
    fn test_flatten_index_map() {
        let map = SourceMap::from_value(&json!({
            "version": 3,
            "file": "bundle.js",
            "sections": [
                { "offset": { "line": 0, "column": 0 },
                  "map": { "version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAA" } },
                { "offset": { "line": 2, "column": 10 },
                  "map": { "version": 3, "sources": ["b.js"], "names": [], "mappings": "AAAA;EACE" } },
            ],
        }))
        .unwrap();

        assert_eq!(map.file.as_deref(), Some("bundle.js"));
        assert_eq!(map.sources, vec!["a.js".to_string(), "b.js".to_string()]);
        let generated: Vec<_> = map.mappings.iter().map(|m| m.generated).collect();
        assert_eq!(
            generated,
            vec![Position::new(0, 0), Position::new(2, 10), Position::new(3, 2)]
        );
        assert_eq!(map.mappings[2].original, original(1, 1, 2));
    }

    #[test]
    fn test_section_offset_overflow() {
        let section = |line: u32, column: u32| {
            json!({
                "version": 3,
                "sections": [
                    { "offset": { "line": line, "column": column },
                      "map": { "version": 3, "sources": ["a.js"], "names": [], "mappings": "CAAA;AACA" } },
                ],
            })
        };

        let err = SourceMap::from_value(&section(0, u32::MAX)).unwrap_err();
        assert!(matches!(err, MapCombineError::Segment { line: 0, .. }), "{err}");

        let err = SourceMap::from_value(&section(u32::MAX, 0)).unwrap_err();
        assert!(matches!(err, MapCombineError::Segment { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_index_map_url_rejected() {
        let err = SourceMap::from_value(&json!({
            "version": 3,
            "sections": [{ "offset": { "line": 0, "column": 0 }, "url": "a.js.map" }],
        }))
        .unwrap_err();
        assert!(matches!(err, MapCombineError::IndexMapUrl(ref url) if url == "a.js.map"));
    }

    #[test]
    fn test_lookup_greatest_lower_bound() {
        let map = SourceMap {
            sources: vec!["a.js".into()],
            mappings: vec![
                Mapping {
                    generated: Position::new(0, 10),
                    original: original(0, 3, 0),
                },
                Mapping {
                    generated: Position::new(0, 0),
                    original: original(0, 1, 0),
                },
            ],
            ..SourceMap::default()
        };
        assert_eq!(map.lookup(0, 5).unwrap().original, original(0, 1, 0));
        assert_eq!(map.lookup(0, 10).unwrap().original, original(0, 3, 0));
        assert_eq!(map.lookup(0, 99).unwrap().original, original(0, 3, 0));
        assert!(map.lookup(1, 0).is_none());
    }
}
