//! `{name}` template expansion backed by the configuration graph.
//!
//! Caller-supplied bindings win. Whatever is still unresolved is looked up
//! by a breadth-first walk over parents and children, starting at the root
//! or at the node that owns the template. Placeholders nothing can resolve
//! stay in the output verbatim.

use crate::config::ExpandConfig;
use crate::error::Result;
use crate::tree::ConfigTree;
use crate::types::{NodeId, VALUE_KEY};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Caller-supplied placeholder values
pub type Bindings = HashMap<String, String>;

/// `{{` and `}}` are literal-brace escapes and never start a placeholder
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex")
});

/// Build [`Bindings`] from key/value pairs
pub fn bindings<I, K, V>(pairs: I) -> Bindings
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Distinct placeholder names in order of first appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|name| name.as_str().to_string()))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Replace known placeholders, leave the rest untouched.
///
/// Doubled braces collapse to single literal braces.
pub fn substitute(template: &str, values: &Bindings) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1) else {
                return caps[0][..1].to_string();
            };
            match values.get(name.as_str()) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Outcome of one expansion pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpansionReport {
    pub text: String,
    /// Names satisfied by caller bindings
    pub from_bindings: Vec<String>,
    /// Names satisfied by the graph, with the text they resolved to
    pub from_graph: BTreeMap<String, String>,
    /// Names nothing could resolve
    pub missing: Vec<String>,
}

impl ExpansionReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Text a node contributes when it satisfies a placeholder
fn lookup_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get(VALUE_KEY).and_then(lookup_text_entry),
        Value::Null | Value::Array(_) => None,
    }
}

/// A map's `value` entry: null defers to the next node like a bare null
fn lookup_text_entry(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(plain_text(other)),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One expansion pass starting the graph search at `start`
pub fn expand_report_from(
    template: &str,
    tree: &ConfigTree,
    start: NodeId,
    initial: &Bindings,
) -> ExpansionReport {
    let names = placeholders(template);
    let mut resolved = initial.clone();
    let (from_bindings, mut missing): (Vec<String>, Vec<String>) =
        names.into_iter().partition(|name| initial.contains_key(name));

    let mut from_graph = BTreeMap::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    if !missing.is_empty() && tree.node(start).is_some() {
        queue.push_back(start);
    }

    while let Some(id) = queue.pop_front() {
        if missing.is_empty() {
            break;
        }
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = tree.node(id) else {
            continue;
        };

        let key = node.key.to_string();
        if let Some(pos) = missing.iter().position(|name| *name == key) {
            if let Some(text) = lookup_text(&node.value) {
                missing.remove(pos);
                from_graph.insert(key.clone(), text.clone());
                resolved.insert(key, text);
            }
        }

        if let Some(parent) = node.parent {
            queue.push_back(parent);
        }
        queue.extend(tree.children(id));
    }

    if !missing.is_empty() {
        log::trace!("Unresolved placeholders {:?} in {:?}", missing, template);
    }

    ExpansionReport {
        text: substitute(template, &resolved),
        from_bindings,
        from_graph,
        missing,
    }
}

/// One expansion pass searching from the root
pub fn expand_report(template: &str, tree: &ConfigTree, initial: &Bindings) -> ExpansionReport {
    expand_report_from(template, tree, tree.root_id(), initial)
}

/// Expand `template` once, searching the graph from `start`
pub fn expand_from(template: &str, tree: &ConfigTree, start: NodeId, initial: &Bindings) -> String {
    expand_report_from(template, tree, start, initial).text
}

/// Expand `template` once, searching the graph from the root
pub fn expand(template: &str, tree: &ConfigTree, initial: &Bindings) -> String {
    expand_from(template, tree, tree.root_id(), initial)
}

/// Expand repeatedly until the text stops changing or the pass limit is hit
pub fn expand_recursive(
    template: &str,
    tree: &ConfigTree,
    initial: &Bindings,
    config: &ExpandConfig,
) -> Result<String> {
    config.validate()?;

    let mut current = template.to_string();
    for _ in 0..config.max_passes {
        let next = expand(&current, tree, initial);
        if next == current {
            return Ok(current);
        }
        current = next;
    }

    if expand(&current, tree, initial) != current {
        log::warn!(
            "Template {:?} still changing after {} passes",
            template,
            config.max_passes
        );
    }
    Ok(current)
}

/// Expand the node's own value as a template, searching from that node.
///
/// Strings are used as-is, maps contribute their `value` entry, anything
/// else its JSON text.
pub fn format_node(tree: &ConfigTree, node: NodeId, initial: &Bindings) -> String {
    let template = match tree.node(node).map(|n| &n.value) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) if map.contains_key(VALUE_KEY) => plain_text(&map[VALUE_KEY]),
        Some(other) => other.to_string(),
        None => return String::new(),
    };
    expand_from(&template, tree, node, initial)
}

impl ConfigTree {
    /// See [`expand`]
    pub fn expand(&self, template: &str, initial: &Bindings) -> String {
        expand(template, self, initial)
    }

    /// See [`expand_recursive`]
    pub fn expand_recursive(
        &self,
        template: &str,
        initial: &Bindings,
        config: &ExpandConfig,
    ) -> Result<String> {
        expand_recursive(template, self, initial, config)
    }

    /// See [`format_node`]
    pub fn format_node(&self, node: NodeId, initial: &Bindings) -> String {
        format_node(self, node, initial)
    }
}
