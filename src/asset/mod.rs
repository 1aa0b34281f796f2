//! Asset records passed between the host pipeline and compressors.

mod record;

pub use record::{AssetInput, AssetMetadata, CompileResult};
