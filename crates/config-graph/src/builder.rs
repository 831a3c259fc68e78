use crate::error::{kind_name, ConfigError, Result};
use crate::tree::ConfigTree;
use crate::types::{ConfigNode, NodeId, NodeKey, ALIASES_KEY};
use serde_json::Value;
use std::collections::VecDeque;

/// Build a configuration graph from a merged document
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Expand `document` into a node graph.
    ///
    /// The top level must be a map. Every `aliases` entry is folded into the
    /// match set of the map that holds it instead of becoming a child.
    pub fn build(&self, document: &Value) -> Result<ConfigTree> {
        if !document.is_object() {
            return Err(ConfigError::invalid_document(kind_name(document)));
        }

        let mut tree = ConfigTree::with_root(document.clone());
        let mut queue = VecDeque::from([tree.root_id()]);

        while let Some(id) = queue.pop_front() {
            let value = match tree.node(id) {
                Some(node) => node.value.clone(),
                None => continue,
            };

            match value {
                Value::Object(map) => {
                    for (key, child_value) in map {
                        if key == ALIASES_KEY {
                            let aliases = Self::collect_aliases(&tree, id, &child_value)?;
                            if let Some(node) = tree.node_mut(id) {
                                log::trace!(
                                    "Aliases {:?} added to {}",
                                    aliases,
                                    node.key
                                );
                                node.matches.extend(aliases);
                            }
                            continue;
                        }
                        let child = ConfigNode::new(NodeKey::Name(key), child_value, Some(id));
                        queue.push_back(tree.add_child(id, child));
                    }
                }
                Value::Array(items) => {
                    for (idx, item) in items.into_iter().enumerate() {
                        let child = ConfigNode::new(NodeKey::Index(idx), item, Some(id));
                        queue.push_back(tree.add_child(id, child));
                    }
                }
                _ => {}
            }
        }

        log::debug!("Built config tree: {} nodes", tree.len());

        Ok(tree)
    }

    fn collect_aliases(tree: &ConfigTree, owner: NodeId, value: &Value) -> Result<Vec<String>> {
        let invalid = |found: &str| ConfigError::invalid_aliases(tree.display_path(owner), found);

        let Value::Array(items) = value else {
            return Err(invalid(kind_name(value)));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(alias) => Ok(alias.clone()),
                other => Err(invalid(&format!("list containing {}", kind_name(other)))),
            })
            .collect()
    }
}

impl ConfigTree {
    /// Build a graph from a merged document (see [`TreeBuilder::build`])
    pub fn build(document: &Value) -> Result<Self> {
        TreeBuilder::new().build(document)
    }

    /// Parse an in-memory JSON string and build a graph from it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::build(&document)
    }
}
