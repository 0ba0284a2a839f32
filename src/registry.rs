//! Transformer registry for resolving string keys to concrete units.
//!
//! Step descriptions may name their transformer by string; the registry is
//! the lookup that resolves those names during graph construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::transformer::{TransformError, Transformer};
use crate::transforms::register_builtins;

/// Registry for storing and resolving transformer units by name
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Create a new empty transformer registry
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Create a registry pre-loaded with the builtin units
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register a transformer unit
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use serde_json::json;
    /// use stimgraph::{FnUnit, TransformerRegistry};
    ///
    /// let mut registry = TransformerRegistry::new();
    /// registry.register("reverse", Arc::new(FnUnit::transform(|stim| {
    ///     let s = stim.as_str().unwrap_or_default();
    ///     Ok(json!(s.chars().rev().collect::<String>()))
    /// })));
    /// assert!(registry.has_transformer("reverse"));
    /// ```
    pub fn register(&mut self, name: impl Into<String>, unit: Arc<dyn Transformer>) {
        let name = name.into();
        tracing::debug!("Registered transformer '{}'", name);
        self.transformers.insert(name, unit);
    }

    /// Resolve a registered transformer by name
    ///
    /// # Returns
    ///
    /// * `Ok(unit)` - shared handle to the unit
    /// * `Err(TransformError::NotFound)` - no unit registered under `name`
    pub fn get(&self, name: &str) -> Result<Arc<dyn Transformer>, TransformError> {
        self.transformers
            .get(name)
            .cloned()
            .ok_or_else(|| TransformError::NotFound(name.to_string()))
    }

    /// Check if a transformer is registered
    pub fn has_transformer(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    /// Get list of all registered transformer names
    pub fn list_transformers(&self) -> Vec<String> {
        self.transformers.keys().cloned().collect()
    }

    /// Get number of registered transformers.
    pub fn count(&self) -> usize {
        self.transformers.len()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{FnUnit, TransformerKind};
    use serde_json::{json, Value};

    #[test]
    fn test_register_and_get() {
        let mut registry = TransformerRegistry::new();

        registry.register(
            "shout",
            Arc::new(|stim: &Value| {
                let s = stim
                    .as_str()
                    .ok_or_else(|| TransformError::InvalidInput("expected string".to_string()))?;
                Ok(json!(s.to_uppercase()))
            }),
        );

        let unit = registry.get("shout").unwrap();
        assert_eq!(unit.transform(&json!("hi")).unwrap(), json!("HI"));
    }

    #[test]
    fn test_transformer_not_found() {
        let registry = TransformerRegistry::new();

        let result = registry.get("nonexistent");

        assert!(matches!(result, Err(TransformError::NotFound(_))));
    }

    #[test]
    fn test_has_transformer() {
        let mut registry = TransformerRegistry::new();

        registry.register("noop", Arc::new(FnUnit::transform(|stim| Ok(stim.clone()))));

        assert!(registry.has_transformer("noop"));
        assert!(!registry.has_transformer("other"));
    }

    #[test]
    fn test_with_builtins() {
        let registry = TransformerRegistry::with_builtins();

        assert!(registry.count() > 0);
        assert!(registry.has_transformer("lowercase"));
        assert_eq!(
            registry.get("length").unwrap().kind(),
            TransformerKind::Extract
        );
    }
}
