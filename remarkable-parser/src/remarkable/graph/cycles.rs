//! Cycle removal
//!
//!     Walks the graph depth first from the root keeping the current ancestry. An edge that
//!     points at one of its own ancestors is a cycle; it is either replaced by the ancestor's
//!     path string (`$[0].children[1]`) or deleted, and reported in both cases.

use super::arena::{Graph, Key, Node, NodeId, Value};
use super::registry::ROOT_NAME;
use std::fmt;
use tracing::debug;

/// What to do with an edge that closes a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Replace the edge with the ancestor's path.
    #[default]
    Name,
    Delete,
}

/// A removed back edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Path of the ancestor the edge pointed at.
    pub ancestor: String,
    /// Path of the edge itself.
    pub edge: String,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} === {}", self.ancestor, self.edge)
    }
}

enum Verdict {
    Descend(NodeId),
    Keep,
    BackEdge(String),
}

struct CycleWalk {
    policy: CyclePolicy,
    ancestry: Vec<(NodeId, String)>,
    cycles: Vec<Cycle>,
}

/// Remove every back edge reachable from `root`, returning them in discovery order.
pub fn remove_cycles(graph: &mut Graph, root: NodeId, policy: CyclePolicy) -> Vec<Cycle> {
    let mut walk = CycleWalk {
        policy,
        ancestry: vec![(root, ROOT_NAME.to_string())],
        cycles: Vec::new(),
    };
    walk.visit(graph, root);
    walk.cycles
}

impl CycleWalk {
    fn path(&self) -> String {
        self.ancestry.iter().map(|(_, segment)| segment.as_str()).collect()
    }

    fn judge(&mut self, value: &Value, key: &Key) -> Verdict {
        let Value::Node(target) = value else {
            return Verdict::Keep;
        };
        let Some(depth) = self.ancestry.iter().position(|(id, _)| id == target) else {
            return Verdict::Descend(*target);
        };

        let ancestor: String = self.ancestry[..=depth]
            .iter()
            .map(|(_, segment)| segment.as_str())
            .collect();
        let cycle = Cycle {
            ancestor: ancestor.clone(),
            edge: format!("{}{}", self.path(), key),
        };
        debug!(cycle = %cycle, "removing cycle");
        self.cycles.push(cycle);
        Verdict::BackEdge(ancestor)
    }

    fn descend(&mut self, graph: &mut Graph, target: NodeId, key: &Key) {
        self.ancestry.push((target, key.to_string()));
        self.visit(graph, target);
        self.ancestry.pop();
    }

    fn visit(&mut self, graph: &mut Graph, id: NodeId) {
        match graph.node(id) {
            Node::List(_) => self.visit_list(graph, id),
            Node::Map(_) => self.visit_map(graph, id),
        }
    }

    fn visit_list(&mut self, graph: &mut Graph, id: NodeId) {
        let mut index = 0;
        while let Some(value) = graph.list(id).and_then(|values| values.get(index)).cloned() {
            let key = Key::Index(index);
            match self.judge(&value, &key) {
                Verdict::Keep => {}
                Verdict::Descend(target) => self.descend(graph, target, &key),
                Verdict::BackEdge(ancestor) => {
                    if let Some(values) = graph.list_mut(id) {
                        match self.policy {
                            CyclePolicy::Name => values[index] = Value::string(ancestor),
                            CyclePolicy::Delete => {
                                values.remove(index);
                                continue;
                            }
                        }
                    }
                }
            }
            index += 1;
        }
    }

    fn visit_map(&mut self, graph: &mut Graph, id: NodeId) {
        for (key, value) in graph.edges(id) {
            match self.judge(&value, &key) {
                Verdict::Keep => {}
                Verdict::Descend(target) => self.descend(graph, target, &key),
                Verdict::BackEdge(ancestor) => {
                    let Key::Name(name) = &key else { continue };
                    match self.policy {
                        CyclePolicy::Name => {
                            graph.insert(id, name.clone(), Value::string(ancestor));
                        }
                        CyclePolicy::Delete => {
                            graph.remove(id, name);
                        }
                    }
                }
            }
        }
    }
}
