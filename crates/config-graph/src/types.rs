use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Key of the synthetic document root
pub const ROOT_KEY: &str = "root";

/// Query segment that matches every node
pub const WILDCARD: &str = "*";

/// Reserved map key holding extra match identifiers for the containing node
pub const ALIASES_KEY: &str = "aliases";

/// Map entry that supplies a template value for its containing node
pub const VALUE_KEY: &str = "value";

/// Stable handle of a node inside a [`crate::ConfigTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) NodeIndex);

impl NodeId {
    /// Arena slot of this node
    pub fn index(self) -> usize {
        self.0.index()
    }
}

/// Key of a node: a map key, or a position inside a list
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Name(String),
    Index(usize),
}

impl NodeKey {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for NodeKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for NodeKey {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// Borrowed view over the three value shapes a node can hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape<'a> {
    /// String, number, bool or null
    Scalar(&'a Value),
    /// Ordered list
    Sequence(&'a [Value]),
    /// Key-ordered map
    Map(&'a Map<String, Value>),
}

impl<'a> NodeShape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Map(map),
            scalar => Self::Scalar(scalar),
        }
    }
}

/// Vertex of the configuration graph
#[derive(Debug, Clone)]
pub struct ConfigNode {
    /// Map key or list index, unique among siblings
    pub key: NodeKey,

    /// Original sub-document rooted at this node
    pub value: Value,

    /// Strings a query segment may equal to hit this node
    pub matches: BTreeSet<String>,

    /// Containing node, `None` for the root
    pub parent: Option<NodeId>,
}

impl ConfigNode {
    /// Create a node whose match set is seeded with its own key and the wildcard
    pub fn new(key: NodeKey, value: Value, parent: Option<NodeId>) -> Self {
        let mut matches = BTreeSet::new();
        matches.insert(key.to_string());
        matches.insert(WILDCARD.to_string());
        Self {
            key,
            value,
            matches,
            parent,
        }
    }

    pub fn shape(&self) -> NodeShape<'_> {
        NodeShape::of(&self.value)
    }

    pub fn is_match(&self, segment: &str) -> bool {
        self.matches.contains(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn seed_matches_hold_key_and_wildcard() {
        let node = ConfigNode::new(NodeKey::Index(3), json!("x"), None);
        let matches: Vec<_> = node.matches.iter().cloned().collect();
        assert_eq!(matches, vec!["*".to_string(), "3".to_string()]);
        assert!(node.is_match("3"));
        assert!(!node.is_match("x"));
    }

    #[test]
    fn shape_follows_value_kind() {
        assert!(matches!(NodeShape::of(&json!(null)), NodeShape::Scalar(_)));
        assert!(matches!(NodeShape::of(&json!([1, 2])), NodeShape::Sequence(s) if s.len() == 2));
        assert!(matches!(NodeShape::of(&json!({"a": 1})), NodeShape::Map(_)));
    }

    #[test]
    fn key_display() {
        assert_eq!(NodeKey::from("python").to_string(), "python");
        assert_eq!(NodeKey::from(0usize).to_string(), "0");
        assert_eq!(NodeKey::from(2usize).as_index(), Some(2));
    }
}
