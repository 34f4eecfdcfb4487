//! Tree cleanup
//!
//!     Two passes over everything reachable from the root, both post-order and both visiting
//!     each node once:
//!
//!         strip      drops `null`, empty lists and empty maps, and forgets the registry
//!                    entries of every node it reaches. Whatever is still registered
//!                    afterwards is an orphan.
//!         collapse   merges a sole text child into its parent when none of the child's
//!                    fields disagree with the parent's.

use super::CHILDREN;
use crate::remarkable::graph::{Graph, Node, NodeId, Registry, Value};
use std::collections::HashSet;

const TYPE: &str = "type";
const TEXT_TYPE: &str = "text";

/// Run both passes.
pub fn clean(graph: &mut Graph, root: NodeId, registry: &mut Registry) {
    strip_trivial(graph, root, registry);
    collapse_text(graph, root);
}

/// Remove trivial values below `root`.
pub fn strip_trivial(graph: &mut Graph, root: NodeId, registry: &mut Registry) {
    let mut visited = HashSet::new();
    strip(graph, root, registry, &mut visited);
}

fn strip(graph: &mut Graph, id: NodeId, registry: &mut Registry, visited: &mut HashSet<NodeId>) {
    if !visited.insert(id) {
        return;
    }
    registry.remove_node(id);

    match graph.node(id).clone() {
        Node::List(values) => {
            for value in &values {
                if let Value::Node(child) = value {
                    strip(graph, *child, registry, visited);
                }
            }
            let kept = values
                .into_iter()
                .filter(|value| !graph.is_trivial(value))
                .collect();
            *graph.node_mut(id) = Node::List(kept);
        }
        Node::Map(fields) => {
            for value in fields.values() {
                if let Value::Node(child) = value {
                    strip(graph, *child, registry, visited);
                }
            }
            let kept = fields
                .into_iter()
                .filter(|(_, value)| !graph.is_trivial(value))
                .collect();
            *graph.node_mut(id) = Node::Map(kept);
        }
    }
}

/// Merge sole text children into their parents, bottom up.
pub fn collapse_text(graph: &mut Graph, root: NodeId) {
    let mut visited = HashSet::new();
    collapse(graph, root, &mut visited);
}

fn collapse(graph: &mut Graph, id: NodeId, visited: &mut HashSet<NodeId>) {
    if !visited.insert(id) {
        return;
    }
    for (_, value) in graph.edges(id) {
        if let Value::Node(child) = value {
            collapse(graph, child, visited);
        }
    }

    let Some(child) = sole_text_child(graph, id) else {
        return;
    };
    let Some(child_fields) = graph.map(child).cloned() else {
        return;
    };
    let Some(parent_fields) = graph.map(id) else {
        return;
    };

    let merged: Vec<(String, Value)> = child_fields
        .into_iter()
        .filter(|(key, _)| key != TYPE && key != CHILDREN)
        .collect();
    let conflict = merged
        .iter()
        .any(|(key, value)| parent_fields.get(key).is_some_and(|existing| existing != value));
    if conflict {
        return;
    }

    if let Some(parent_fields) = graph.map_mut(id) {
        parent_fields.extend(merged);
        parent_fields.remove(CHILDREN);
    }
}

/// The only child of `id`, when it is a text leaf.
fn sole_text_child(graph: &Graph, id: NodeId) -> Option<NodeId> {
    let children = graph.get(id, CHILDREN)?.as_node()?;
    let [Value::Node(child)] = graph.list(children)?.as_slice() else {
        return None;
    };
    let fields = graph.map(*child)?;
    if fields.get(TYPE)?.as_str() != Some(TEXT_TYPE) {
        return None;
    }
    let is_leaf = match fields.get(CHILDREN) {
        None => true,
        Some(value) => graph.is_trivial(value),
    };
    is_leaf.then_some(*child)
}
