//! Transformer unit contract.
//!
//! A transformer maps one stimulus value to another. Units tagged as
//! extraction-kind are terminal: their output is collected as a result and
//! traversal does not continue past the node carrying them.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Error type for transformer operations
#[derive(Debug, Clone)]
pub enum TransformError {
    NotFound(String),
    InvalidInput(String),
    ExecutionError(String),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NotFound(name) => write!(f, "Transformer not found: {}", name),
            TransformError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TransformError::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
        }
    }
}

impl std::error::Error for TransformError {}

/// Whether a unit's output becomes the new running value or a collected result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
    /// Output replaces the running value and flows on to child nodes.
    Transform,
    /// Output is a terminal collected result; the node's branch ends and any
    /// children are never visited.
    Extract,
}

/// Trait for transformation and extraction units
///
/// Units can return any JSON Value (String, Number, Array, Null). The kind
/// tag decides how the graph treats the output: transform-kind output becomes
/// the running value handed to children, extract-kind output is collected and
/// terminates the branch.
pub trait Transformer: Send + Sync {
    /// Apply the unit to a stimulus value
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - the transformed (or extracted) value
    /// * `Err(TransformError)` - the unit could not process the input
    fn transform(&self, stim: &Value) -> Result<Value, TransformError>;

    /// Kind tag; defaults to transform-kind.
    fn kind(&self) -> TransformerKind {
        TransformerKind::Transform
    }
}

/// Simple function-based implementation of Transformer (transform-kind)
impl<F> Transformer for F
where
    F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync,
{
    fn transform(&self, stim: &Value) -> Result<Value, TransformError> {
        self(stim)
    }
}

/// Function-backed unit with an explicit kind tag.
///
/// Plain closures default to transform-kind through the blanket impl;
/// `FnUnit::extract` is the way to build extraction units from closures.
pub struct FnUnit {
    kind: TransformerKind,
    func: Box<dyn Fn(&Value) -> Result<Value, TransformError> + Send + Sync>,
}

impl FnUnit {
    /// Wrap a closure as a transform-kind unit.
    pub fn transform<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            kind: TransformerKind::Transform,
            func: Box::new(func),
        }
    }

    /// Wrap a closure as an extract-kind unit.
    pub fn extract<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            kind: TransformerKind::Extract,
            func: Box::new(func),
        }
    }
}

impl Transformer for FnUnit {
    fn transform(&self, stim: &Value) -> Result<Value, TransformError> {
        (self.func)(stim)
    }

    fn kind(&self) -> TransformerKind {
        self.kind
    }
}

/// Reference to a unit in a step description: either a registry key resolved
/// at construction time, or a direct handle supplied by the caller.
#[derive(Clone)]
pub enum TransformerRef {
    Named(String),
    Direct(Arc<dyn Transformer>),
}

impl fmt::Debug for TransformerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformerRef::Named(name) => write!(f, "Named({:?})", name),
            TransformerRef::Direct(unit) => write!(f, "Direct(<{:?}>)", unit.kind()),
        }
    }
}

impl From<&str> for TransformerRef {
    fn from(name: &str) -> Self {
        TransformerRef::Named(name.to_string())
    }
}

impl From<String> for TransformerRef {
    fn from(name: String) -> Self {
        TransformerRef::Named(name)
    }
}

impl From<Arc<dyn Transformer>> for TransformerRef {
    fn from(unit: Arc<dyn Transformer>) -> Self {
        TransformerRef::Direct(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_transform_kind() {
        let unit = |stim: &Value| -> Result<Value, TransformError> { Ok(stim.clone()) };

        assert_eq!(unit.kind(), TransformerKind::Transform);
        assert_eq!(unit.transform(&json!("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_fn_unit_extract_kind() {
        let unit = FnUnit::extract(|stim| {
            let s = stim
                .as_str()
                .ok_or_else(|| TransformError::InvalidInput("expected string".to_string()))?;
            Ok(json!(s.len()))
        });

        assert_eq!(unit.kind(), TransformerKind::Extract);
        assert_eq!(unit.transform(&json!("hello")).unwrap(), json!(5));
    }

    #[test]
    fn test_fn_unit_error_propagates() {
        let unit = FnUnit::transform(|_| {
            Err(TransformError::ExecutionError("boom".to_string()))
        });

        let err = unit.transform(&json!(1)).unwrap_err();
        assert!(matches!(err, TransformError::ExecutionError(_)));
    }
}
