//! JavaScript minification with oxc.
//!
//! Parse, replace global defines, minify (compress + mangle), then print.
//! Every call owns its arena, so one [`OxcEngine`] can serve any number of
//! threads.

use std::path::PathBuf;

use oxc::allocator::Allocator;
use oxc::ast::ast::Program;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::{MangleOptions, MangleOptionsKeepNames};
use oxc::minifier::{CompressOptions, CompressOptionsKeepNames, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::{Scoping, SemanticBuilder};
use oxc::span::SourceType;
use oxc::transformer_plugins::{ReplaceGlobalDefines, ReplaceGlobalDefinesConfig};

use super::{Engine, EngineError, EngineOptions};
use crate::debug;
use crate::config::{
    CommentPolicy, CompressConfig, FieldPath, MangleConfig, NormalizedOptions, OutputConfig,
    QuoteStyle,
};

/// Version of the bundled oxc release.
const OXC_VERSION: &str = "0.113";

/// The default engine, backed by the `oxc` toolchain.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcEngine;

impl OxcEngine {
    pub const NAME: &'static str = "oxc";

    pub const fn new() -> Self {
        Self
    }

    fn run(
        &self,
        source: &str,
        options: &EngineOptions<'_>,
        map_source: Option<&str>,
    ) -> Result<(String, Option<String>), EngineError> {
        let opts = options.options;
        let allocator = Allocator::default();
        // Top-level declarations of a script are globals and must survive.
        let source_type = if opts.module {
            SourceType::mjs()
        } else {
            SourceType::script()
        };

        let ret = Parser::new(&allocator, source, source_type).parse();
        if !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(EngineError::new(message));
        }
        let mut program = ret.program;

        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let scoping = replace_defines(&allocator, &mut program, opts, scoping)?;

        let mangle = opts.mangle.as_ref().and_then(|config| {
            match reserved_binding(&scoping, config) {
                Some(name) => {
                    debug!("oxc"; "`{}` is reserved, leaving names unmangled", name);
                    None
                }
                None => Some(mangle_options(config)),
            }
        });

        let minified = Minifier::new(MinifierOptions {
            mangle,
            compress: opts.compress.as_ref().map(compress_options),
        })
        .minify(&allocator, &mut program);

        let policy = opts.output.comments;
        program
            .comments
            .retain(|comment| keeps_comment(policy, comment.content_span().source_text(source)));

        let printed = Codegen::new()
            .with_options(codegen_options(&opts.output, map_source))
            .with_scoping(minified.scoping)
            .build(&program);

        let map = printed.map.map(|map| map.to_json_string());
        Ok((printed.code, map))
    }
}

impl Engine for OxcEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        OXC_VERSION
    }

    fn unsupported(&self, options: &NormalizedOptions) -> Vec<FieldPath> {
        let mut fields = Vec::new();
        if let Some(mangle) = &options.mangle {
            if mangle.properties.is_some() {
                fields.push(MangleConfig::FIELDS.properties);
            }
        }
        let output = &options.output;
        if output.ascii_only {
            fields.push(OutputConfig::FIELDS.ascii_only);
        }
        if output.max_line_len.is_some() {
            fields.push(OutputConfig::FIELDS.max_line_len);
        }
        // Minified output always picks the shortest quote.
        let quotes_honoured = match output.quote_style {
            QuoteStyle::Auto => true,
            QuoteStyle::Single | QuoteStyle::Double => output.beautify,
            QuoteStyle::Original => false,
        };
        if !quotes_honoured {
            fields.push(OutputConfig::FIELDS.quote_style);
        }
        fields
    }

    fn compile(&self, source: &str, options: &EngineOptions<'_>) -> Result<String, EngineError> {
        self.run(source, options, None).map(|(code, _)| code)
    }

    fn compile_with_map(
        &self,
        source: &str,
        options: &EngineOptions<'_>,
    ) -> Result<(String, String), EngineError> {
        let filename = options.source_map.map_or("input.js", |req| req.filename);
        let (code, map) = self.run(source, options, Some(filename))?;
        let map = map.ok_or_else(|| EngineError::new("oxc codegen produced no source map"))?;
        Ok((code, map))
    }
}

// ============================================================================
// Option translation
// ============================================================================

fn mangle_options(config: &MangleConfig) -> MangleOptions {
    MangleOptions {
        top_level: config.toplevel.into(),
        keep_names: MangleOptionsKeepNames {
            function: config.keep_fnames,
            class: config.keep_classnames,
        },
        ..MangleOptions::default()
    }
}

fn compress_options(config: &CompressConfig) -> CompressOptions {
    CompressOptions {
        drop_console: config.drop_console,
        drop_debugger: config.drop_debugger,
        keep_names: CompressOptionsKeepNames {
            function: config.keep_fnames,
            class: config.keep_classnames,
        },
        ..CompressOptions::smallest()
    }
}

/// Printer settings for the comments left after [`keeps_comment`].
fn comment_options(policy: CommentPolicy) -> CommentOptions {
    match policy {
        CommentPolicy::None => CommentOptions::disabled(),
        CommentPolicy::All => CommentOptions::default(),
        CommentPolicy::Copyright | CommentPolicy::Jsdoc => CommentOptions {
            annotation: false,
            ..CommentOptions::default()
        },
    }
}

/// Whether a comment with body `text` survives `policy`.
///
/// `copyright` keeps bang comments and anything mentioning "copyright".
/// `jsdoc` keeps `@preserve`, `@license` and `@cc_on` blocks.
fn keeps_comment(policy: CommentPolicy, text: &str) -> bool {
    match policy {
        CommentPolicy::None => false,
        CommentPolicy::All => true,
        CommentPolicy::Copyright => {
            text.starts_with('!') || text.to_ascii_lowercase().contains("copyright")
        }
        CommentPolicy::Jsdoc => {
            let text = text.to_ascii_lowercase();
            ["@preserve", "@license", "@cc_on"]
                .iter()
                .any(|tag| text.contains(tag))
        }
    }
}

fn codegen_options(output: &OutputConfig, map_source: Option<&str>) -> CodegenOptions {
    CodegenOptions {
        minify: !output.beautify,
        single_quote: output.quote_style == QuoteStyle::Single,
        comments: comment_options(output.comments),
        source_map_path: map_source.map(PathBuf::from),
        ..CodegenOptions::default()
    }
}

/// Substitute `define` entries for their global identifiers.
fn replace_defines<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    options: &NormalizedOptions,
    scoping: Scoping,
) -> Result<Scoping, EngineError> {
    if options.define.is_empty() {
        return Ok(scoping);
    }

    let pairs: Vec<(String, String)> = options
        .define
        .iter()
        .map(|(key, value)| (key.clone(), value.to_js_literal()))
        .collect();

    let config = ReplaceGlobalDefinesConfig::new(&pairs).map_err(|errors| {
        EngineError::new(
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    })?;

    let ret = ReplaceGlobalDefines::new(allocator, config).build(scoping, program);
    Ok(ret.scoping)
}

/// First reserved name the mangler would rename.
///
/// The mangler has no exclusion list, so a reserved binding turns mangling
/// off for the whole program. Top-level bindings only count with `toplevel`.
fn reserved_binding<'s>(scoping: &'s Scoping, config: &MangleConfig) -> Option<&'s str> {
    if config.reserved.is_empty() {
        return None;
    }
    let root = scoping.root_scope_id();
    scoping
        .symbol_ids()
        .filter(|&id| config.toplevel || scoping.symbol_scope_id(id) != root)
        .map(|id| scoping.symbol_name(id))
        .find(|name| config.reserved.iter().any(|reserved| reserved == name))
}
