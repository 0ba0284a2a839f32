//! Graph configuration: step descriptions and the YAML loader.
//!
//! A step description takes one of three shapes:
//!
//! - a mapping: `{transformer: lowercase, name: lc, children: [...],
//!   parent: other}` (name, children and parent all optional)
//! - a sequence: `[lowercase, lc, [...]]` (transformer, optional name,
//!   optional children, in that order)
//! - a bare string: the transformer name alone
//!
//! Nested `children` use the same grammar recursively. Any other shape is
//! rejected with a clear error.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::graph::GraphError;
use crate::transformer::{Transformer, TransformerRef};

/// Parsed step description: one node-to-be, with optional name and nested
/// child descriptions.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub transformer: TransformerRef,
    pub name: Option<String>,
    pub children: Vec<NodeConfig>,
    /// Name of an existing node to attach under, overriding whatever parent
    /// the add operation would otherwise use.
    pub parent: Option<String>,
}

impl NodeConfig {
    /// Describe a step by transformer alone (registry name or direct handle).
    pub fn new(transformer: impl Into<TransformerRef>) -> Self {
        Self {
            transformer: transformer.into(),
            name: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Describe a step with an explicit node name.
    pub fn named(transformer: impl Into<TransformerRef>, name: impl Into<String>) -> Self {
        Self {
            transformer: transformer.into(),
            name: Some(name.into()),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Describe a step wrapping a direct unit handle.
    pub fn direct(unit: Arc<dyn Transformer>) -> Self {
        Self {
            transformer: TransformerRef::Direct(unit),
            name: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Attach nested child descriptions.
    pub fn with_children(mut self, children: Vec<NodeConfig>) -> Self {
        self.children = children;
        self
    }

    /// Attach under the named existing node instead of the default parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Parse one step description from a JSON value using the three-shape
    /// grammar (mapping, sequence, bare string).
    ///
    /// # Errors
    /// Returns `GraphError::InvalidConfig` for any other shape, for unknown
    /// mapping keys, and for positional sequences of length 0 or more than 3.
    pub fn from_value(value: &Value) -> Result<Self, GraphError> {
        match value {
            Value::Object(map) => {
                for key in map.keys() {
                    if key != "transformer"
                        && key != "name"
                        && key != "children"
                        && key != "parent"
                    {
                        return Err(GraphError::InvalidConfig(format!(
                            "Unknown step description field '{}'",
                            key
                        )));
                    }
                }

                let transformer = map
                    .get("transformer")
                    .ok_or_else(|| {
                        GraphError::InvalidConfig(
                            "Step description missing 'transformer' field".to_string(),
                        )
                    })
                    .and_then(parse_transformer_name)?;

                let name = match map.get("name") {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => {
                        return Err(GraphError::InvalidConfig(format!(
                            "Step 'name' must be a string, got {}",
                            other
                        )))
                    }
                    None => None,
                };

                let children = match map.get("children") {
                    Some(Value::Array(items)) => Self::from_values(items)?,
                    Some(other) => {
                        return Err(GraphError::InvalidConfig(format!(
                            "Step 'children' must be a sequence, got {}",
                            other
                        )))
                    }
                    None => Vec::new(),
                };

                let parent = match map.get("parent") {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => {
                        return Err(GraphError::InvalidConfig(format!(
                            "Step 'parent' must be a string, got {}",
                            other
                        )))
                    }
                    None => None,
                };

                Ok(Self {
                    transformer,
                    name,
                    children,
                    parent,
                })
            }
            Value::Array(items) => {
                if items.is_empty() || items.len() > 3 {
                    return Err(GraphError::InvalidConfig(format!(
                        "Positional step description must have 1 to 3 entries, got {}",
                        items.len()
                    )));
                }

                let transformer = parse_transformer_name(&items[0])?;

                let name = match items.get(1) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        return Err(GraphError::InvalidConfig(format!(
                            "Step name (position 1) must be a string, got {}",
                            other
                        )))
                    }
                };

                let children = match items.get(2) {
                    Some(Value::Array(nested)) => Self::from_values(nested)?,
                    Some(other) => {
                        return Err(GraphError::InvalidConfig(format!(
                            "Step children (position 2) must be a sequence, got {}",
                            other
                        )))
                    }
                    None => Vec::new(),
                };

                Ok(Self {
                    transformer,
                    name,
                    children,
                    parent: None,
                })
            }
            Value::String(s) => Ok(Self::new(s.as_str())),
            other => Err(GraphError::InvalidConfig(format!(
                "Step description must be a mapping, sequence or string, got {}",
                other
            ))),
        }
    }

    /// Parse an ordered list of step descriptions.
    pub fn from_values(values: &[Value]) -> Result<Vec<Self>, GraphError> {
        values.iter().map(Self::from_value).collect()
    }
}

fn parse_transformer_name(value: &Value) -> Result<TransformerRef, GraphError> {
    match value {
        Value::String(s) => Ok(TransformerRef::Named(s.clone())),
        other => Err(GraphError::InvalidConfig(format!(
            "Transformer must be a string name, got {}",
            other
        ))),
    }
}

/// Parse a graph configuration from a YAML string.
///
/// The document must carry a top-level `nodes` list of step descriptions.
///
/// # Returns
/// Ordered list of parsed step descriptions
///
/// # Errors
/// Returns error if the YAML is invalid or the structure does not match the
/// step description grammar
pub fn parse_graph_config(contents: &str) -> Result<Vec<NodeConfig>, GraphError> {
    let doc: Value = serde_yaml::from_str(contents)
        .map_err(|e| GraphError::InvalidConfig(format!("Failed to parse YAML: {}", e)))?;

    let nodes = doc
        .get("nodes")
        .ok_or_else(|| GraphError::InvalidConfig("Config missing 'nodes' field".to_string()))?;

    match nodes {
        Value::Array(items) => NodeConfig::from_values(items),
        other => Err(GraphError::InvalidConfig(format!(
            "'nodes' must be a sequence, got {}",
            other
        ))),
    }
}

/// Load a graph configuration from a YAML file.
///
/// # Arguments
/// * `path` - Path to the graph YAML file
///
/// # Errors
/// Returns error if the file cannot be read or has invalid format
pub fn load_graph_config<P: AsRef<Path>>(path: P) -> Result<Vec<NodeConfig>, GraphError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        GraphError::InvalidConfig(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    parse_graph_config(&contents)
}
