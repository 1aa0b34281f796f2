//! Option group definitions.
//!
//! Each module corresponds to one group of the option schema:
//!
//! | Module     | Key          | Purpose                               |
//! |------------|--------------|---------------------------------------|
//! | `compress` | `compress`   | Compressor switches                   |
//! | `mangle`   | `mangle`     | Identifier and property mangling      |
//! | `output`   | `output`     | Comments, quoting, formatting         |
//! | `define`   | `define`     | Compile-time global constants         |

mod compress;
mod define;
mod mangle;
mod output;

pub use compress::{CompressConfig, RawCompressOptions};
pub use define::{DEFINE_FIELD, DefineValue, validate_defines};
pub use mangle::{MangleConfig, PropertyConfig, RawMangleOptions, RawPropertyOptions};
pub use output::{CommentPolicy, OutputConfig, QuoteStyle, RawOutputOptions};

/// Top-level shorthands that propagate into `compress` and `mangle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shorthand {
    pub keep_fnames: Option<bool>,
    pub keep_classnames: Option<bool>,
}
