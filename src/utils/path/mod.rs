//! Path utilities.
//!
//! Pure functions for path manipulation. No filesystem access.
//!
//! - [`fs`]: Lexical normalization (`clean`, `relative_to`, `to_slash`)

pub mod fs;

pub use fs::{clean, relative_to, to_slash};
