//! Ranked, alias-tolerant path lookup.
//!
//! The search walks the whole reachable graph depth-first instead of
//! following literal prefixes, so a query still lands on the closest
//! available node when the exact path does not exist. Matching an earlier
//! query segment is worth exponentially more than matching a later one.

use crate::path::QueryPath;
use crate::tree::{ConfigTree, NodeRef};
use crate::types::NodeId;
use serde_json::Value;
use std::collections::HashSet;

/// Rank assigned to the search seed
const SEED_RANK: u128 = 1;

/// Node hit by a query, with the rank it was discovered at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch<'a> {
    pub node: NodeRef<'a>,
    pub rank: u128,
}

/// Search state: unmatched suffix of the query starts at `offset`
struct Frame {
    offset: usize,
    rank: u128,
    node: NodeId,
}

/// `2^exponent`, saturating instead of overflowing
fn segment_weight(exponent: usize) -> u128 {
    u32::try_from(exponent)
        .ok()
        .and_then(|shift| 1u128.checked_shl(shift))
        .unwrap_or(u128::MAX)
}

/// All hits for `path` below `start`, best first, with their ranks
pub fn resolve_ranked_scored_from<'a>(
    tree: &'a ConfigTree,
    start: NodeId,
    path: impl Into<QueryPath>,
) -> Vec<RankedMatch<'a>> {
    let path = path.into();
    if path.is_empty() || tree.node(start).is_none() {
        return Vec::new();
    }

    let segments = path.segments();
    let total = segments.len();

    let mut candidates: Vec<(u128, NodeId)> = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![Frame {
        offset: 0,
        rank: SEED_RANK,
        node: start,
    }];

    while let Some(frame) = stack.pop() {
        if !visited.insert(frame.node) {
            continue;
        }

        for child in tree.children(frame.node) {
            let Some(child_data) = tree.node(child) else {
                continue;
            };

            let mut matched = false;
            for (pos, segment) in segments.iter().enumerate().skip(frame.offset) {
                if !child_data.is_match(segment) {
                    continue;
                }
                matched = true;
                let relative = pos - frame.offset;
                let rank = frame.rank.saturating_add(segment_weight(total - relative));
                stack.push(Frame {
                    offset: pos + 1,
                    rank,
                    node: child,
                });
                candidates.push((rank, child));
            }

            if !matched {
                stack.push(Frame {
                    offset: frame.offset,
                    rank: frame.rank,
                    node: child,
                });
            }
        }
    }

    // stable: equal ranks keep discovery order
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    log::trace!(
        "Resolved {} -> {} candidates ({} nodes visited)",
        path,
        candidates.len(),
        visited.len()
    );

    candidates
        .into_iter()
        .filter_map(|(rank, id)| tree.get(id).map(|node| RankedMatch { node, rank }))
        .collect()
}

/// All hits for `path` below the root, best first, with their ranks
pub fn resolve_ranked_scored<'a>(
    tree: &'a ConfigTree,
    path: impl Into<QueryPath>,
) -> Vec<RankedMatch<'a>> {
    resolve_ranked_scored_from(tree, tree.root_id(), path)
}

/// All nodes hit by `path`, best first
pub fn resolve_ranked<'a>(tree: &'a ConfigTree, path: impl Into<QueryPath>) -> Vec<NodeRef<'a>> {
    resolve_ranked_scored(tree, path)
        .into_iter()
        .map(|hit| hit.node)
        .collect()
}

/// Best node for `path`, if anything matched
pub fn resolve_best<'a>(tree: &'a ConfigTree, path: impl Into<QueryPath>) -> Option<NodeRef<'a>> {
    resolve_ranked_scored(tree, path)
        .into_iter()
        .next()
        .map(|hit| hit.node)
}

/// Values of all nodes hit by `path`, best first
pub fn resolve_values<'a>(tree: &'a ConfigTree, path: impl Into<QueryPath>) -> Vec<&'a Value> {
    resolve_ranked(tree, path)
        .into_iter()
        .map(|node| node.value())
        .collect()
}

impl ConfigTree {
    /// See [`resolve_ranked`]
    pub fn resolve_ranked(&self, path: impl Into<QueryPath>) -> Vec<NodeRef<'_>> {
        resolve_ranked(self, path)
    }

    /// See [`resolve_ranked_scored`]
    pub fn resolve_ranked_scored(&self, path: impl Into<QueryPath>) -> Vec<RankedMatch<'_>> {
        resolve_ranked_scored(self, path)
    }

    /// See [`resolve_best`]
    pub fn resolve_best(&self, path: impl Into<QueryPath>) -> Option<NodeRef<'_>> {
        resolve_best(self, path)
    }

    /// See [`resolve_values`]
    pub fn resolve_values(&self, path: impl Into<QueryPath>) -> Vec<&Value> {
        resolve_values(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(doc: Value) -> ConfigTree {
        ConfigTree::build(&doc).unwrap()
    }

    #[test]
    fn empty_path_yields_nothing() {
        let t = tree(json!({"a": 1}));
        assert!(t.resolve_ranked(Vec::<String>::new()).is_empty());
        assert!(t.resolve_best(Vec::<String>::new()).is_none());
    }

    #[test]
    fn exact_path_wins() {
        let t = tree(json!({"python": {"language_id": "5078"}, "language_id": "0"}));
        let best = t.resolve_best(["python", "language_id"]).unwrap();
        assert_eq!(best.value(), &json!("5078"));
    }

    #[test]
    fn ranks_follow_segment_weights() {
        let t = tree(json!({"a": {"b": 1}}));
        let hits = t.resolve_ranked_scored(["a", "b"]);
        let summary: Vec<(String, u128)> = hits
            .iter()
            .map(|h| (h.node.path(), h.rank))
            .collect();
        // a: 1 + 2^2, a.b: 5 + 2^2 (remaining index restarts at 0)
        assert_eq!(
            summary,
            vec![("root.a.b".to_string(), 9), ("root.a".to_string(), 5)]
        );
    }

    #[test]
    fn missing_segments_fall_back_to_closest_node() {
        let t = tree(json!({"python": {"timeout": 3}, "timeout": 10}));
        let best = t.resolve_best(["rust", "timeout"]).unwrap();
        // both timeouts match position 1 at the same rank; discovery order decides
        assert_eq!(best.value(), &json!(10));
        assert_eq!(t.resolve_values(["rust", "timeout"]).len(), 2);
    }

    #[test]
    fn nothing_matches() {
        let t = tree(json!({"a": {"b": 1}}));
        assert!(t.resolve_ranked(["zzz"]).is_empty());
    }

    #[test]
    fn repeated_hits_are_reported_per_position() {
        let t = tree(json!({"a": 1}));
        let ranks: Vec<u128> = t.resolve_ranked_scored(["a", "a"]).iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![5, 3]);
    }

    #[test]
    fn resolve_from_subtree() {
        let t = tree(json!({"python": {"name": "py"}, "rust": {"name": "rs"}}));
        let rust = t.root().children()[1].id();
        let hits = resolve_ranked_scored_from(&t, rust, ["name"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node.value(), &json!("rs"));
    }

    #[test]
    fn cyclic_graph_terminates() {
        let mut t = tree(json!({"a": {"b": {"c": 1}}}));
        let a = t.root().children()[0].id();
        let b = t.children(a)[0];
        t.link(b, a);

        let hits = t.resolve_ranked(["a", "b", "c"]);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].value(), &json!(1));
        assert_eq!(t.resolve_ranked(["*"]).len(), 1);
    }

    #[test]
    fn segment_weight_saturates() {
        assert_eq!(segment_weight(3), 8);
        assert_eq!(segment_weight(200), u128::MAX);
    }
}
