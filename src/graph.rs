//! Transformer graph construction and evaluation.
//!
//! The graph owns every node in an arena and indexes them by name; children
//! are arena indices, so the structure is always a tree (a node is appended
//! under exactly one parent at creation and never re-linked). Evaluation is
//! an explicit-stack pre-order traversal: transform-kind nodes rewrite the
//! running value on the way down, extract-kind nodes contribute their output
//! to the flat result list and end their branch.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::NodeConfig;
use crate::registry::TransformerRegistry;
use crate::stimulus::Stimuli;
use crate::transformer::{TransformError, Transformer, TransformerKind, TransformerRef};

/// Error type for graph construction and evaluation
#[derive(Debug, Clone)]
pub enum GraphError {
    /// A step named a parent absent from the name index.
    UnknownParent(String),
    /// A transformer lookup or execution failed.
    Transform(TransformError),
    /// A step description did not match the config grammar.
    InvalidConfig(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownParent(name) => write!(f, "Unknown parent node: {}", name),
            GraphError::Transform(err) => write!(f, "{}", err),
            GraphError::InvalidConfig(msg) => write!(f, "Invalid graph config: {}", msg),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<TransformError> for GraphError {
    fn from(err: TransformError) -> Self {
        GraphError::Transform(err)
    }
}

/// Index of a node in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single step in the graph: a named transformer unit with an ordered list
/// of children.
pub struct Node {
    name: String,
    transformer: Arc<dyn Transformer>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, transformer: Arc<dyn Transformer>) -> Self {
        Self {
            name,
            transformer,
            children: Vec::new(),
        }
    }

    /// Append a child to the list of children. No constraint checks.
    pub(crate) fn add_child(&mut self, id: NodeId) {
        self.children.push(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag of the wrapped unit.
    pub fn kind(&self) -> TransformerKind {
        self.transformer.kind()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("children", &self.children)
            .finish()
    }
}

/// Root aggregate: the arena of nodes, the insertion-ordered name index and
/// the top-level children. The graph itself carries no transformer.
pub struct Graph {
    arena: Vec<Node>,
    nodes: IndexMap<String, NodeId>,
    roots: Vec<NodeId>,
    next_auto_id: usize,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            nodes: IndexMap::new(),
            roots: Vec::new(),
            next_auto_id: 0,
        }
    }

    /// Build a graph from an ordered list of step descriptions, resolving
    /// named transformers through `registry`.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use stimgraph::{Graph, NodeConfig, TransformerRegistry};
    ///
    /// let registry = TransformerRegistry::with_builtins();
    /// let configs = vec![
    ///     NodeConfig::named("lowercase", "lc")
    ///         .with_children(vec![NodeConfig::new("word_count")]),
    /// ];
    /// let graph = Graph::from_configs(configs, &registry).unwrap();
    /// let results = graph.extract("One TWO three").unwrap();
    /// assert_eq!(results, vec![json!(3)]);
    /// ```
    pub fn from_configs(
        configs: Vec<NodeConfig>,
        registry: &TransformerRegistry,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.add_nodes(configs, None, registry)?;
        Ok(graph)
    }

    /// Add one node under `parent` (the graph root when `None`), recursively
    /// adding the config's nested children under the new node. A `parent`
    /// named on the config itself takes precedence over the argument.
    ///
    /// Re-using an existing name overwrites the index entry silently; the
    /// earlier node stays in the arena, reachable only through its parent's
    /// child list.
    ///
    /// # Errors
    /// * `GraphError::UnknownParent` - `parent` is not in the name index
    /// * `GraphError::Transform(NotFound)` - a named transformer is not
    ///   registered
    pub fn add_node(
        &mut self,
        config: NodeConfig,
        parent: Option<&str>,
        registry: &TransformerRegistry,
    ) -> Result<NodeId, GraphError> {
        let parent_id = self.resolve_parent(parent)?;
        self.add_node_at(config, parent_id, registry)
    }

    /// Add each step description independently under the same parent
    /// (fan-out). Nested children inside each description still recurse.
    pub fn add_nodes(
        &mut self,
        configs: Vec<NodeConfig>,
        parent: Option<&str>,
        registry: &TransformerRegistry,
    ) -> Result<(), GraphError> {
        let parent_id = self.resolve_parent(parent)?;
        for config in configs {
            self.add_node_at(config, parent_id, registry)?;
        }
        Ok(())
    }

    /// Add the step descriptions as a strict linear chain: each subsequent
    /// step's parent is the previously added node.
    pub fn add_branch(
        &mut self,
        configs: Vec<NodeConfig>,
        parent: Option<&str>,
        registry: &TransformerRegistry,
    ) -> Result<(), GraphError> {
        let mut parent_id = self.resolve_parent(parent)?;
        for config in configs {
            parent_id = Some(self.add_node_at(config, parent_id, registry)?);
        }
        Ok(())
    }

    fn resolve_parent(&self, parent: Option<&str>) -> Result<Option<NodeId>, GraphError> {
        match parent {
            Some(name) => self
                .nodes
                .get(name)
                .copied()
                .map(Some)
                .ok_or_else(|| GraphError::UnknownParent(name.to_string())),
            None => Ok(None),
        }
    }

    fn add_node_at(
        &mut self,
        config: NodeConfig,
        parent: Option<NodeId>,
        registry: &TransformerRegistry,
    ) -> Result<NodeId, GraphError> {
        // A parent named on the step itself overrides the one the add
        // operation supplied.
        let parent = match config.parent {
            Some(ref name) => Some(
                self.get_id(name)
                    .ok_or_else(|| GraphError::UnknownParent(name.clone()))?,
            ),
            None => parent,
        };

        let name = match config.name {
            Some(name) => name,
            None => {
                // Explicit counter fallback for unnamed steps.
                let name = format!("node-{}", self.next_auto_id);
                self.next_auto_id += 1;
                name
            }
        };

        let transformer = match config.transformer {
            TransformerRef::Named(key) => registry.get(&key)?,
            TransformerRef::Direct(unit) => unit,
        };

        let id = NodeId(self.arena.len());
        self.arena.push(Node::new(name.clone(), transformer));
        tracing::debug!("Added node '{}'", name);
        self.nodes.insert(name, id);

        match parent {
            Some(pid) => self.arena[pid.0].add_child(id),
            None => self.roots.push(id),
        }

        for child in config.children {
            self.add_node_at(child, Some(id), registry)?;
        }

        Ok(id)
    }

    /// Look up a node by name. Returns the most recently added node when the
    /// name was re-used.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name).map(|id| &self.arena[id.0])
    }

    /// Look up a node's arena index by name.
    pub fn get_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.get(name).copied()
    }

    /// Access a node by arena index.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    /// Indexed node names, in insertion order.
    pub fn node_names(&self) -> Vec<&String> {
        self.nodes.keys().collect()
    }

    /// The graph's own top-level children.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes in the arena, orphaned ones included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Evaluate the graph and return the extraction results for the FIRST
    /// stimulus only.
    ///
    /// NOTE: batch input is accepted but truncated to the first stimulus.
    /// This reproduces the long-standing behavior of the batch entry point;
    /// use [`Graph::extract_all`] for per-stimulus results.
    pub fn extract<S: Into<Stimuli>>(&self, stims: S) -> Result<Vec<Value>, GraphError> {
        let mut all = self.extract_all(stims)?;
        if all.is_empty() {
            return Ok(Vec::new());
        }
        Ok(all.swap_remove(0))
    }

    /// Evaluate the graph for each stimulus independently, returning one
    /// ordered result list per stimulus.
    pub fn extract_all<S: Into<Stimuli>>(&self, stims: S) -> Result<Vec<Vec<Value>>, GraphError> {
        let stims = stims.into().into_vec();
        tracing::debug!("Extracting from {} stimuli", stims.len());

        stims.iter().map(|stim| self.collect(stim)).collect()
    }

    /// Pre-order, depth-first, left-to-right collection of extraction
    /// outputs, starting at the top-level children with `stim` as the
    /// initial running value. An extraction node contributes exactly one
    /// result and terminates its branch; nodes below it are unreachable.
    ///
    /// Uses an explicit stack rather than recursion, so traversal depth is
    /// not bounded by the call stack.
    fn collect(&self, stim: &Value) -> Result<Vec<Value>, GraphError> {
        let mut results = Vec::new();
        let mut stack: Vec<(NodeId, Value)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, stim.clone()))
            .collect();

        while let Some((id, value)) = stack.pop() {
            let node = &self.arena[id.0];

            let value = match node.transformer.kind() {
                TransformerKind::Extract => {
                    // Extraction nodes are terminal: the branch ends here and
                    // any children are never visited.
                    results.push(node.transformer.transform(&value)?);
                    continue;
                }
                TransformerKind::Transform => node.transformer.transform(&value)?,
            };

            for child in node.children.iter().rev() {
                stack.push((*child, value.clone()));
            }
        }

        Ok(results)
    }

    /// Placeholder for parent/child input-output type-compatibility
    /// checking. Intentionally a no-op; always succeeds.
    pub fn validate(&self) -> Result<(), GraphError> {
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
