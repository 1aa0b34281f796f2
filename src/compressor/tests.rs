//! Compressor scenarios: protocol selection, error propagation, the
//! default oxc engine end to end, the facade and the registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;

use super::*;
use crate::config::{FieldPath, RawOutputOptions};
use crate::engine::{EngineError, EngineOptions};
use crate::error::{Error, ErrorKind};

// ============================================================================
// Stub engine
// ============================================================================

/// Records calls and returns scripted results.
#[derive(Default)]
struct StubEngine {
    compile_calls: AtomicUsize,
    map_calls: AtomicUsize,
    fail_with: Option<String>,
    unsupported: Vec<FieldPath>,
    last_map_source: Mutex<Option<String>>,
}

impl StubEngine {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst) + self.map_calls.load(Ordering::SeqCst)
    }

    fn result(&self, source: &str) -> std::result::Result<String, EngineError> {
        match &self.fail_with {
            Some(message) => Err(EngineError::new(message.clone())),
            None => Ok(source.split_whitespace().collect()),
        }
    }
}

impl Engine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn unsupported(&self, _options: &NormalizedOptions) -> Vec<FieldPath> {
        self.unsupported.clone()
    }

    fn compile(
        &self,
        source: &str,
        _options: &EngineOptions<'_>,
    ) -> std::result::Result<String, EngineError> {
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        self.result(source)
    }

    fn compile_with_map(
        &self,
        source: &str,
        options: &EngineOptions<'_>,
    ) -> std::result::Result<(String, String), EngineError> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        let filename = options.source_map.map(|req| req.filename.to_string());
        *self.last_map_source.lock().unwrap() = filename.clone();

        let code = self.result(source)?;
        let map = json!({
            "version": 3,
            "sources": [filename.unwrap_or_default()],
            "names": [],
            "mappings": "AAAA,CAAC;AACA",
        });
        Ok((code, map.to_string()))
    }
}

fn stub_compressor(engine: &Arc<StubEngine>, capability: EngineCapability) -> Compressor {
    Compressor::builder()
        .engine(engine.clone())
        .capability(capability)
        .build()
        .unwrap()
}

fn coffee_upstream() -> serde_json::Value {
    json!({
        "version": 3,
        "file": "app.js",
        "sources": ["app.coffee"],
        "names": [],
        "mappings": "AAAA;AAEA",
    })
}

// ============================================================================
// Protocols
// ============================================================================

#[test]
fn test_legacy_protocol_returns_code_only() {
    let engine = Arc::new(StubEngine::default());
    let compressor = stub_compressor(&engine, EngineCapability::LegacyNoMap);

    let input = AssetInput::new("var a = 1;", "app.js").with_map(coffee_upstream());
    let result = compressor.call(&input).unwrap();

    assert_eq!(result.data, "vara=1;");
    assert!(result.map.is_none());
    assert_eq!(engine.compile_calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.map_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_map_protocol_formats_fresh_map() {
    let engine = Arc::new(StubEngine::default());
    let compressor = stub_compressor(&engine, EngineCapability::MapCapable);

    let input = AssetInput::new("var a = 1;", "js/app.js").with_load_path("/assets");
    let result = compressor.call(&input).unwrap();

    assert_eq!(engine.map_calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.compile_calls.load(Ordering::SeqCst), 0);
    assert_eq!(engine.last_map_source.lock().unwrap().as_deref(), Some("app.js"));

    let map = result.map.unwrap();
    assert_eq!(map.file.as_deref(), Some("js/app.js"));
    assert_eq!(map.sources, vec!["app.js"]);
    assert_eq!(map.mappings.len(), 3);
}

#[test]
fn test_map_protocol_composes_upstream() {
    let engine = Arc::new(StubEngine::default());
    let compressor = stub_compressor(&engine, EngineCapability::MapCapable);

    let input = AssetInput::new("var a = 1;", "app.js").with_map(coffee_upstream());
    let map = compressor.call(&input).unwrap().map.unwrap();

    // Fresh line 0 traces to coffee line 0, fresh line 1 to coffee line 2.
    assert_eq!(map.sources, vec!["app.coffee"]);
    assert_eq!(map.mappings.len(), 3);
    let traced = map.lookup(1, 0).unwrap().original.unwrap();
    assert_eq!((traced.line, traced.column), (2, 0));
}

#[test]
fn test_unreadable_upstream_map_is_map_error() {
    let engine = Arc::new(StubEngine::default());
    let compressor = stub_compressor(&engine, EngineCapability::MapCapable);

    let input = AssetInput::new("var a;", "app.js").with_map(json!({ "version": 2, "mappings": "" }));
    let err = compressor.call(&input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MapCombine);
}

#[test]
fn test_pipeline_version_selects_protocol() {
    let engine = Arc::new(StubEngine::default());
    let legacy = Compressor::builder()
        .engine(engine.clone())
        .pipeline_version("3.7.2")
        .build()
        .unwrap();
    assert_eq!(legacy.capability(), EngineCapability::LegacyNoMap);

    let modern = Compressor::builder()
        .engine(engine.clone())
        .pipeline_version("4.2.0")
        .build()
        .unwrap();
    assert_eq!(modern.capability(), EngineCapability::MapCapable);
    assert_ne!(legacy.cache_key(), modern.cache_key());
    assert!(legacy.cache_key().as_str().starts_with("stub:1.0.0:1+legacy:"));
    assert!(modern.cache_key().as_str().starts_with("stub:1.0.0:1+map:"));

    let err = Compressor::builder()
        .engine(engine.clone())
        .pipeline_version("latest")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::PipelineVersion(_)));
    assert_eq!(engine.calls(), 0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_engine_error_is_verbatim_and_not_retried() {
    let message = "Unexpected token `)`. Expected a statement (1:0)";
    for capability in [EngineCapability::LegacyNoMap, EngineCapability::MapCapable] {
        let engine = Arc::new(StubEngine::failing(message));
        let compressor = stub_compressor(&engine, capability);

        let err = compressor.call(&AssetInput::new(")(", "broken.js")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert_eq!(err.message(), message);
        match err {
            Error::Compile(compile) => assert_eq!(compile.filename, "broken.js"),
            other => panic!("expected compile error, got {other:?}"),
        }
        assert_eq!(engine.calls(), 1);
    }
}

#[test]
fn test_invalid_options_never_reach_engine() {
    let engine = Arc::new(StubEngine::default());
    let options = RawOptions {
        output: Some(RawOutputOptions {
            max_line_len: Some(0),
            ..RawOutputOptions::default()
        }),
        ..RawOptions::default()
    };
    let err = Compressor::builder()
        .engine(engine.clone())
        .options(options)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Diagnostics(_)));
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_unsupported_options_rejected_at_construction() {
    let engine = Arc::new(StubEngine {
        unsupported: vec![FieldPath::new("output.ascii_only")],
        ..StubEngine::default()
    });
    let err = Compressor::builder()
        .engine(engine.clone())
        .build()
        .unwrap_err();
    match err {
        ConfigError::UnsupportedByEngine { engine: name, fields } => {
            assert_eq!(name, "stub");
            assert_eq!(fields, vec![FieldPath::new("output.ascii_only")]);
        }
        other => panic!("expected unsupported options, got {other:?}"),
    }
    assert_eq!(engine.calls(), 0);
}

#[test]
fn test_unknown_option_rejected() {
    let err = Compressor::from_json(&json!({ "foo": true })).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownOptions(ref keys) if keys == &["foo"]));

    let err = Compressor::from_json(&json!({ "mangle": { "toplevel": true, "bogus": 1 } }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownOptions(ref keys) if keys == &["mangle.bogus"]));
}

#[test]
fn test_oxc_rejects_unsupported_options() {
    let err = Compressor::from_json(&json!({ "mangle": { "properties": true } })).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedByEngine { ref engine, .. } if engine == "oxc"));
}

// ============================================================================
// Default engine
// ============================================================================

const BAR: &str = "function bar(foo) {return foo + 'bar'};";

#[test]
fn test_mangles_arguments_by_default() {
    let compressor = Compressor::new(RawOptions::default()).unwrap();
    let result = compressor.call(&AssetInput::new(BAR, "bar.js")).unwrap();
    assert!(!result.data.contains("(foo)"), "{}", result.data);
    assert!(result.data.contains("bar"));
}

#[test]
fn test_mangle_false_keeps_arguments() {
    let compressor = Compressor::from_json(&json!({ "mangle": false })).unwrap();
    let result = compressor.call(&AssetInput::new(BAR, "bar.js")).unwrap();
    assert!(result.data.contains("(foo)"), "{}", result.data);
}

#[test]
fn test_global_declarations_survive() {
    let source = "function add(a, b) { return a + b; }\nvar config = { debug: true };\n";
    let result = compile(&AssetInput::new(source, "globals.js")).unwrap();
    assert!(result.data.contains("function add("), "{}", result.data);
    assert!(result.data.contains("var config"), "{}", result.data);
}

#[test]
fn test_super_survives_default_mangling() {
    let result = compile(&AssetInput::new("function foo($super) {return $super}", "proto.js"))
        .unwrap();
    assert!(result.data.contains("$super"), "{}", result.data);
}

#[test]
fn test_options_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jsqueeze.toml");
    std::fs::write(&path, "mangle = false\n\n[output]\ncomments = \"none\"\n").unwrap();

    let compressor = Compressor::new(RawOptions::from_path(&path).unwrap()).unwrap();
    let result = compressor.call(&AssetInput::new(BAR, "bar.js")).unwrap();
    assert!(result.data.contains("(foo)"));
}

#[test]
fn test_syntax_error_message() {
    let err = compile(&AssetInput::new(")(", "broken.js")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert!(err.message().contains("Unexpected token"), "{}", err.message());
}

#[test]
fn test_comments_none_strips_all_comments() {
    let source = "/**\n * Adds.\n * @param {number} a\n */\nfunction add(a, b) {\n  // sum\n  return a + b; /* inline */\n}\n/*! legal */\nwindow.add = add;\n";
    let result = compile(&AssetInput::new(source, "add.js")).unwrap();
    assert!(!result.data.contains("//"), "{}", result.data);
    assert!(!result.data.contains("/*"), "{}", result.data);
}

#[test]
fn test_recompile_does_not_grow() {
    let source = "var counter = 0;\nfunction increment(step) {\n  counter = counter + step;\n  return counter;\n}\nwindow.increment = increment;\n";
    let once = compile(&AssetInput::new(source, "counter.js")).unwrap().data;
    let twice = compile(&AssetInput::new(once.as_str(), "counter.js")).unwrap().data;
    assert!(twice.len() <= once.len(), "{once} -> {twice}");
}

#[test]
fn test_default_compile_returns_pipeline_map() {
    let input = AssetInput::new("var answer = 42;\nconsole.log(answer);\n", "js/app.js")
        .with_load_path("/assets");
    let result = compile(&input).unwrap();
    let map = result.map.unwrap();
    assert_eq!(map.file.as_deref(), Some("js/app.js"));
    assert_eq!(map.sources, vec!["app.js"]);
    assert!(!map.mappings.is_empty());
}

// ============================================================================
// Facade and registry
// ============================================================================

#[test]
fn test_facade_is_a_single_instance() {
    let handles: Vec<_> = (0..8).map(|_| thread::spawn(instance)).collect();
    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for other in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], other));
    }
    assert_eq!(cache_key(), instances[0].cache_key());
}

#[test]
fn test_custom_instance_leaves_facade_alone() {
    let before = cache_key().clone();
    let custom = Compressor::from_json(&json!({ "mangle": false })).unwrap();
    assert_ne!(custom.cache_key(), &before);
    assert_eq!(cache_key(), &before);

    let same = Compressor::new(RawOptions::default()).unwrap();
    assert_eq!(same.cache_key(), cache_key());
    assert_eq!(same.config(), instance().config());
}

#[test]
fn test_facade_call_matches_instance() {
    let input = AssetInput::new(BAR, "bar.js");
    assert_eq!(call(&input).unwrap(), instance().call(&input).unwrap());
}

#[test]
fn test_registry_defaults() {
    let mut registry = CompressorRegistry::new();
    registry.register_defaults();

    let compressor = registry.get("text/javascript", COMPRESSOR_NAME).unwrap();
    assert_eq!(compressor.cache_key(), cache_key().as_str());
    assert_eq!(registry.names_for("application/javascript"), vec![COMPRESSOR_NAME]);
    assert!(registry.get("text/css", COMPRESSOR_NAME).is_none());
}

#[test]
fn test_registry_replaces_by_name() {
    let engine = Arc::new(StubEngine::default());
    let mut registry = CompressorRegistry::new();
    registry.register_defaults();

    let stub = Arc::new(stub_compressor(&engine, EngineCapability::LegacyNoMap));
    let replaced = registry.register("application/javascript", COMPRESSOR_NAME, stub);
    assert!(replaced.is_some());
    assert_eq!(registry.len(), 1);

    let result = registry
        .get("application/javascript", COMPRESSOR_NAME)
        .unwrap()
        .call(&AssetInput::new("var  a;", "a.js"))
        .unwrap();
    assert_eq!(result.data, "vara;");
    assert_eq!(engine.calls(), 1);
}
