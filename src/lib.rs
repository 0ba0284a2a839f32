//! # Stimgraph: Transformer Graph Evaluation Library
//!
//! Stimgraph builds a tree of processing steps ("transformers") from a
//! flexible nested description and evaluates it against input artifacts
//! ("stimuli"), collecting the outputs of extraction steps into a flat
//! ordered result list.
//!
//! ## Features
//!
//! - **Declarative graph construction**: mapping, positional or bare-string
//!   step descriptions, nested to any depth
//! - **Transformer registry**: named units resolved once at construction;
//!   direct unit handles also accepted
//! - **Explicit kind tags**: transform-kind units rewrite the running value,
//!   extract-kind units contribute terminal results
//! - **YAML graph configs**: load step descriptions from a `nodes:` document
//!
//! ## Example: YAML config
//!
//! ```yaml
//! nodes:
//!   - transformer: lowercase
//!     name: lc
//!     children:
//!       - [tokenize, tok, [length]]
//!       - word_count
//! ```
//!
//! ## Example: programmatic construction
//!
//! ```
//! use serde_json::json;
//! use stimgraph::{Graph, NodeConfig, TransformerRegistry};
//!
//! let registry = TransformerRegistry::with_builtins();
//! let configs = vec![
//!     NodeConfig::named("trim", "t").with_children(vec![
//!         NodeConfig::new("word_count"),
//!         NodeConfig::new("first_token"),
//!     ]),
//! ];
//!
//! let graph = Graph::from_configs(configs, &registry).unwrap();
//! let results = graph.extract("  hello there  ").unwrap();
//! assert_eq!(results, vec![json!(2), json!("hello")]);
//! ```

// Core modules
pub mod config;
pub mod graph;
pub mod registry;
pub mod stimulus;
pub mod transformer;
pub mod transforms;

// Re-export key types
pub use config::{load_graph_config, parse_graph_config, NodeConfig};
pub use graph::{Graph, GraphError, Node, NodeId};
pub use registry::TransformerRegistry;
pub use stimulus::Stimuli;
pub use transformer::{FnUnit, TransformError, Transformer, TransformerKind, TransformerRef};
pub use transforms::register_builtins;
