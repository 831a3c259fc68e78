//! # Contest Helper Config Graph
//!
//! Hierarchical configuration resolution for the contest helper: one merged
//! JSON document becomes a graph that answers partial, alias-tolerant, ranked
//! path queries and backs `{name}` template expansion.
//!
//! ## Architecture
//!
//! ```text
//! merged document (serde_json::Value)
//!     │
//!     ├──> Tree Builder
//!     │      ├─ map keys / list indices -> nodes (petgraph arena)
//!     │      └─ `aliases` entries -> match sets of the owning node
//!     │
//!     ├──> Path Resolver
//!     │      ├─ depth-first search over the whole graph
//!     │      ├─ rank = 1 + Σ 2^(len - i) per matched segment
//!     │      └─ best-first node list ("closest available match")
//!     │
//!     └──> Template Expander
//!            ├─ caller bindings first
//!            └─ breadth-first lookup over parents and children
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cph_config_graph::{Bindings, ConfigTree};
//! use serde_json::json;
//!
//! let tree = ConfigTree::build(&json!({
//!     "python": {
//!         "aliases": ["py"],
//!         "source_file_name": "main.py",
//!         "run": "python3 {source_file_name}"
//!     }
//! }))
//! .unwrap();
//!
//! let run = tree.resolve_best(["py", "run"]).unwrap();
//! assert_eq!(tree.format_node(run.id(), &Bindings::new()), "python3 main.py");
//! ```

mod builder;
mod config;
mod error;
mod path;
mod resolver;
mod template;
mod tree;
mod typed;
mod types;

pub use builder::TreeBuilder;
pub use config::ExpandConfig;
pub use error::{ConfigError, Result};
pub use path::QueryPath;
pub use resolver::{
    resolve_best, resolve_ranked, resolve_ranked_scored, resolve_ranked_scored_from,
    resolve_values, RankedMatch,
};
pub use template::{
    bindings, expand, expand_from, expand_recursive, expand_report, expand_report_from,
    format_node, placeholders, substitute, Bindings, ExpansionReport,
};
pub use tree::{ConfigTree, NodeRef, TreeStats};
pub use typed::{
    expand_as, expand_to_path, resolve_as, resolve_bool, resolve_first_as, resolve_float,
    resolve_int, resolve_list, resolve_string, resolve_validated, FromConfigValue,
};
pub use types::{ConfigNode, NodeId, NodeKey, NodeShape, ALIASES_KEY, ROOT_KEY, VALUE_KEY, WILDCARD};
