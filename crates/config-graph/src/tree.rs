use crate::types::{ConfigNode, NodeId, NodeKey, NodeShape, ROOT_KEY};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// Configuration graph built from one merged document
///
/// Nodes live in a petgraph arena; parent -> child edges are added in
/// document order, so edge ids double as sibling order. The tree is never
/// mutated once built.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    /// Directed graph (parent -> child)
    graph: DiGraph<ConfigNode, ()>,

    /// Synthetic document root
    root: NodeId,
}

/// Shape statistics of a configuration graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Longest root-to-leaf chain, counting both ends
    pub max_depth: usize,
    /// Sum of match set sizes over all nodes
    pub total_matches: usize,
}

impl ConfigTree {
    /// Start a tree holding only the root node
    pub(crate) fn with_root(document: Value) -> Self {
        let mut graph = DiGraph::new();
        let root = NodeId(graph.add_node(ConfigNode::new(
            NodeKey::Name(ROOT_KEY.to_string()),
            document,
            None,
        )));
        Self { graph, root }
    }

    /// Append `node` as the last child of `parent`
    pub(crate) fn add_child(&mut self, parent: NodeId, mut node: ConfigNode) -> NodeId {
        node.parent = Some(parent);
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent.0, idx, ());
        NodeId(idx)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut ConfigNode> {
        self.graph.node_weight_mut(id.0)
    }

    /// Add an extra child edge without touching parent links.
    ///
    /// Only used to build deliberately cyclic graphs in tests.
    #[cfg(test)]
    pub(crate) fn link(&mut self, from: NodeId, to: NodeId) {
        self.graph.add_edge(from.0, to.0, ());
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Get node data
    pub fn node(&self, id: NodeId) -> Option<&ConfigNode> {
        self.graph.node_weight(id.0)
    }

    /// Borrowed handle for `id`, if it belongs to this tree
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node(id).map(|_| NodeRef { tree: self, id })
    }

    /// Children of `id` in document order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut edges: Vec<_> = self
            .graph
            .edges(id.0)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, target)| NodeId(target)).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Get node count
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All nodes in arena order (root first)
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.graph
            .node_indices()
            .map(move |idx| NodeRef { tree: self, id: NodeId(idx) })
    }

    /// Keys from the root down to `id`, root included
    pub fn key_path(&self, id: NodeId) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if !seen.insert(node_id) {
                break;
            }
            match self.node(node_id) {
                Some(node) => {
                    keys.push(node.key.clone());
                    current = node.parent;
                }
                None => break,
            }
        }
        keys.reverse();
        keys
    }

    /// Dotted path from the root, e.g. `root.python.commands.0`
    pub fn display_path(&self, id: NodeId) -> String {
        self.key_path(id)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Compute shape statistics
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.len(),
            leaf_count: 0,
            max_depth: 0,
            total_matches: 0,
        };

        for node in self.graph.node_weights() {
            stats.total_matches += node.matches.len();
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(self.root, 1usize)]);
        while let Some((id, depth)) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            stats.max_depth = stats.max_depth.max(depth);
            let children = self.children(id);
            if children.is_empty() {
                stats.leaf_count += 1;
            }
            queue.extend(children.into_iter().map(|child| (child, depth + 1)));
        }

        stats
    }
}

/// Borrowed handle to one node of a [`ConfigTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ConfigTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }

    fn data(&self) -> &'a ConfigNode {
        // NodeRef is only handed out for ids present in the arena
        &self.tree.graph[self.id.0]
    }

    pub fn key(&self) -> &'a NodeKey {
        &self.data().key
    }

    pub fn value(&self) -> &'a Value {
        &self.data().value
    }

    pub fn matches(&self) -> &'a BTreeSet<String> {
        &self.data().matches
    }

    pub fn shape(&self) -> NodeShape<'a> {
        NodeShape::of(self.value())
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.data().parent.and_then(|id| self.tree.get(id))
    }

    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.tree
            .children(self.id)
            .into_iter()
            .map(|id| NodeRef { tree: self.tree, id })
            .collect()
    }

    pub fn path(&self) -> String {
        self.tree.display_path(self.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", &self.path())
            .field("value", self.value())
            .finish()
    }
}
