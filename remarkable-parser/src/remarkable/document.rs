//! Assembled document

use crate::remarkable::graph::{Cycle, Graph, NodeId, Value};
use serde::{Serialize, Serializer};
use serde_json::Value as Json;

/// The forest produced by the assembler, with the cycles removed on the way.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    graph: Graph,
    root: NodeId,
    cycles: Vec<Cycle>,
}

impl DocumentTree {
    pub fn new(graph: Graph, root: NodeId, cycles: Vec<Cycle>) -> Self {
        Self {
            graph,
            root,
            cycles,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.graph.list(self.root).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The top-level nodes as JSON.
    pub fn nodes(&self) -> Vec<Json> {
        self.graph
            .list(self.root)
            .map(|values| values.iter().map(|v| self.graph.export(v)).collect())
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Json {
        self.graph.export(&Value::Node(self.root))
    }
}

impl Serialize for DocumentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
