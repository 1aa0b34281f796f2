//! Compressor options: parsing, normalization and validation.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Option groups (compress, mangle, output, define)
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── options.rs     # RawOptions (caller-supplied, TOML / JSON)
//! ├── normalize.rs   # NormalizedOptions (resolved, validated)
//! └── toggle.rs      # bool-or-table option groups
//! ```
//!
//! # Example
//!
//! ```toml
//! keep_fnames = true
//! comments = "copyright"
//!
//! [mangle]
//! toplevel = true
//!
//! [define]
//! DEBUG = false
//! ```

mod normalize;
mod options;
pub mod section;
mod toggle;
pub mod types;

pub use normalize::{NormalizedOptions, SCHEMA_VERSION, normalize};
pub use options::RawOptions;
pub use section::{
    CommentPolicy, CompressConfig, DefineValue, MangleConfig, OutputConfig, PropertyConfig,
    QuoteStyle, RawCompressOptions, RawMangleOptions, RawOutputOptions, RawPropertyOptions,
};
pub use toggle::Toggle;
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
