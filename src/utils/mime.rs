//! MIME type helpers for compressor registration.

/// MIME type constants.
pub mod types {
    pub const JAVASCRIPT: &str = "application/javascript";
    /// Registered alias, folded into [`JAVASCRIPT`].
    pub const TEXT_JAVASCRIPT: &str = "text/javascript";
    /// Legacy alias, folded into [`JAVASCRIPT`].
    pub const X_JAVASCRIPT: &str = "application/x-javascript";
}

/// Canonical form of a MIME type: lowercase, parameters dropped, aliases folded.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize("Text/JavaScript; charset=utf-8"), "application/javascript");
/// ```
pub fn normalize(mime: &str) -> String {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        types::TEXT_JAVASCRIPT | types::X_JAVASCRIPT => types::JAVASCRIPT.to_string(),
        _ => essence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("application/javascript"), types::JAVASCRIPT);
        assert_eq!(normalize("Text/JavaScript; charset=utf-8"), types::JAVASCRIPT);
        assert_eq!(normalize(" application/json "), "application/json");
        assert_eq!(normalize("application/x-javascript"), types::JAVASCRIPT);
    }
}
