//! Builtin transformer and extractor units.
//!
//! A small library of string and collection units operating on JSON values,
//! registered by name so graph configs can reference them directly.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::registry::TransformerRegistry;
use crate::transformer::{FnUnit, TransformError};

fn as_str(stim: &Value) -> Result<&str, TransformError> {
    stim.as_str().ok_or_else(|| {
        TransformError::InvalidInput(format!("expected string, got {}", type_name(stim)))
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Register the builtin units into a registry.
///
/// Transform-kind: `lowercase`, `uppercase`, `trim`, `tokenize`.
/// Extract-kind: `length`, `word_count`, `first_token`.
pub fn register_builtins(registry: &mut TransformerRegistry) {
    registry.register(
        "lowercase",
        Arc::new(FnUnit::transform(|stim| {
            Ok(json!(as_str(stim)?.to_lowercase()))
        })),
    );

    registry.register(
        "uppercase",
        Arc::new(FnUnit::transform(|stim| {
            Ok(json!(as_str(stim)?.to_uppercase()))
        })),
    );

    registry.register(
        "trim",
        Arc::new(FnUnit::transform(|stim| Ok(json!(as_str(stim)?.trim())))),
    );

    registry.register(
        "tokenize",
        Arc::new(FnUnit::transform(|stim| {
            let tokens: Vec<&str> = as_str(stim)?.split_whitespace().collect();
            Ok(json!(tokens))
        })),
    );

    registry.register(
        "length",
        Arc::new(FnUnit::extract(|stim| match stim {
            Value::String(s) => Ok(json!(s.chars().count())),
            Value::Array(a) => Ok(json!(a.len())),
            Value::Object(o) => Ok(json!(o.len())),
            other => Err(TransformError::InvalidInput(format!(
                "expected string, array or object, got {}",
                type_name(other)
            ))),
        })),
    );

    registry.register(
        "word_count",
        Arc::new(FnUnit::extract(|stim| {
            Ok(json!(as_str(stim)?.split_whitespace().count()))
        })),
    );

    registry.register(
        "first_token",
        Arc::new(FnUnit::extract(|stim| {
            let first = as_str(stim)?.split_whitespace().next().unwrap_or("");
            Ok(json!(first))
        })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::TransformerKind;

    fn builtins() -> TransformerRegistry {
        TransformerRegistry::with_builtins()
    }

    #[test]
    fn test_lowercase() {
        let registry = builtins();
        let unit = registry.get("lowercase").unwrap();

        assert_eq!(unit.kind(), TransformerKind::Transform);
        assert_eq!(unit.transform(&json!("HeLLo")).unwrap(), json!("hello"));
    }

    #[test]
    fn test_tokenize() {
        let registry = builtins();
        let unit = registry.get("tokenize").unwrap();

        assert_eq!(
            unit.transform(&json!("  one two  three ")).unwrap(),
            json!(["one", "two", "three"])
        );
    }

    #[test]
    fn test_length_over_value_types() {
        let registry = builtins();
        let unit = registry.get("length").unwrap();

        assert_eq!(unit.kind(), TransformerKind::Extract);
        assert_eq!(unit.transform(&json!("abc")).unwrap(), json!(3));
        assert_eq!(unit.transform(&json!([1, 2])).unwrap(), json!(2));
        assert_eq!(unit.transform(&json!({"a": 1})).unwrap(), json!(1));
        assert!(unit.transform(&json!(42)).is_err());
    }

    #[test]
    fn test_word_count() {
        let registry = builtins();
        let unit = registry.get("word_count").unwrap();

        assert_eq!(unit.transform(&json!("the quick fox")).unwrap(), json!(3));
    }

    #[test]
    fn test_first_token_empty_string() {
        let registry = builtins();
        let unit = registry.get("first_token").unwrap();

        assert_eq!(unit.transform(&json!("")).unwrap(), json!(""));
        assert_eq!(unit.transform(&json!("a b")).unwrap(), json!("a"));
    }

    #[test]
    fn test_string_unit_rejects_non_string() {
        let registry = builtins();
        let unit = registry.get("uppercase").unwrap();

        let err = unit.transform(&json!([1])).unwrap_err();
        assert!(matches!(err, TransformError::InvalidInput(_)));
    }
}
