//! `define` option group: global constants substituted at compile time.
//!
//! # Example
//!
//! ```toml
//! [define]
//! DEBUG = false
//! "process.env.NODE_ENV" = "production"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{ConfigDiagnostics, FieldPath};

/// A literal that replaces every reference to a defined global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl DefineValue {
    /// Render as JavaScript source text.
    pub fn to_js_literal(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            // JSON string literals are valid JavaScript string literals
            Self::String(s) => serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into()),
            Self::Null => "null".into(),
        }
    }
}

pub const DEFINE_FIELD: FieldPath = FieldPath::new("define");

/// Check keys are dotted identifiers and numbers are finite.
pub fn validate_defines(defines: &BTreeMap<String, DefineValue>, diag: &mut ConfigDiagnostics) {
    for (key, value) in defines {
        if !is_dotted_identifier(key) {
            diag.error_with_hint(
                DEFINE_FIELD,
                format!("`{key}` is not an identifier or member path"),
                "use names like `DEBUG` or `process.env.NODE_ENV`",
            );
        }
        if let DefineValue::Float(f) = value
            && !f.is_finite()
        {
            diag.error(DEFINE_FIELD, format!("`{key}` must be a finite number"));
        }
    }
}

fn is_dotted_identifier(key: &str) -> bool {
    !key.is_empty() && key.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(DefineValue::Bool(true).to_js_literal(), "true");
        assert_eq!(DefineValue::Integer(1234).to_js_literal(), "1234");
        assert_eq!(DefineValue::Float(1.5).to_js_literal(), "1.5");
        assert_eq!(DefineValue::String("str".into()).to_js_literal(), "\"str\"");
        assert_eq!(
            DefineValue::String("say \"hi\"".into()).to_js_literal(),
            r#""say \"hi\"""#
        );
        assert_eq!(DefineValue::Null.to_js_literal(), "null");
    }

    #[test]
    fn test_deserialize_variants() {
        let defines: BTreeMap<String, DefineValue> = serde_json::from_str(
            r#"{"NUM": 1234, "BOOL": true, "NULL": null, "STR": "str", "F": 0.5}"#,
        )
        .unwrap();
        assert_eq!(defines["NUM"], DefineValue::Integer(1234));
        assert_eq!(defines["BOOL"], DefineValue::Bool(true));
        assert_eq!(defines["NULL"], DefineValue::Null);
        assert_eq!(defines["STR"], DefineValue::String("str".into()));
        assert_eq!(defines["F"], DefineValue::Float(0.5));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_dotted_identifier("DEBUG"));
        assert!(is_dotted_identifier("process.env.NODE_ENV"));
        assert!(is_dotted_identifier("$jq"));
        assert!(!is_dotted_identifier(""));
        assert!(!is_dotted_identifier("1abc"));
        assert!(!is_dotted_identifier("a..b"));
        assert!(!is_dotted_identifier("a-b"));
    }

    #[test]
    fn test_validate_collects_all() {
        let mut defines = BTreeMap::new();
        defines.insert("bad key".to_string(), DefineValue::Null);
        defines.insert("INF".to_string(), DefineValue::Float(f64::INFINITY));
        defines.insert("OK".to_string(), DefineValue::Bool(false));

        let mut diag = ConfigDiagnostics::new();
        validate_defines(&defines, &mut diag);
        assert_eq!(diag.len(), 2);
    }
}
