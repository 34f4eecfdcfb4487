//! Content transforms
//!
//! A content transform is called once for every edge of the finished tree, parents before
//! children, with the chain of nodes leading to the edge and the edge's key. It may rewrite
//! the value in place; the walk descends into whatever the edge holds afterwards.

use super::arena::{Graph, Key, Node, NodeId, Value};

/// A user hook run over the assembled tree.
pub trait ContentTransform: Send + Sync {
    /// `ancestors` ends with the node owning the edge at `key`.
    fn apply(&self, graph: &mut Graph, ancestors: &[NodeId], key: &Key);
}

impl<F> ContentTransform for F
where
    F: Fn(&mut Graph, &[NodeId], &Key) + Send + Sync,
{
    fn apply(&self, graph: &mut Graph, ancestors: &[NodeId], key: &Key) {
        self(graph, ancestors, key)
    }
}

/// Run `transform` over every edge reachable from `root`.
///
/// Edges back into the current ancestry are offered to the transform but not followed.
pub fn walk_content(graph: &mut Graph, root: NodeId, transform: &dyn ContentTransform) {
    let mut ancestors = Vec::new();
    visit(graph, root, transform, &mut ancestors);
}

fn visit(
    graph: &mut Graph,
    id: NodeId,
    transform: &dyn ContentTransform,
    ancestors: &mut Vec<NodeId>,
) {
    ancestors.push(id);
    let keys: Vec<Key> = match graph.node(id) {
        Node::List(values) => (0..values.len()).map(Key::Index).collect(),
        Node::Map(fields) => fields.keys().cloned().map(Key::Name).collect(),
    };

    for key in keys {
        if graph.edge(id, &key).is_none() {
            continue;
        }
        transform.apply(graph, ancestors, &key);
        if let Some(Value::Node(child)) = graph.edge(id, &key).cloned() {
            if !ancestors.contains(&child) {
                visit(graph, child, transform, ancestors);
            }
        }
    }
    ancestors.pop();
}
