//! Arena-backed document graph
//!
//!     Assembly shares nodes freely: a metadata node's children list is both a field of the
//!     node and a registry container, a collection list is referenced by every node declaring
//!     it, a relation map points at the node it relates. The graph therefore stores every map
//!     and list in an arena and links them by [NodeId]; identity is handle equality.
//!
//!     Scalars (strings, numbers, booleans, null) are stored inline as `serde_json` values.
//!     Maps keep their keys sorted, the same order `serde_json` uses when exporting.

use serde_json::Value as Json;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Handle of a map or list in the [Graph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A value stored in a map field or list slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Inline scalar; never a `serde_json` array or object.
    Scalar(Json),
    /// Reference to a map or list.
    Node(NodeId),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Json::String(s.into()))
    }

    pub fn null() -> Self {
        Value::Scalar(Json::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Json::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(*id),
            Value::Scalar(_) => None,
        }
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Node(id)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

/// Map fields, sorted by key.
pub type Fields = BTreeMap<String, Value>;

/// A container node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Map(Fields),
    List(Vec<Value>),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Map(fields) => fields.is_empty(),
            Node::List(values) => values.is_empty(),
        }
    }
}

/// Key of an edge leaving a node: a list index or a map field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

/// Renders path segments: `[2]` for indices, `.children` for fields.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "[{}]", index),
            Key::Name(name) => write!(f, ".{}", name),
        }
    }
}

/// The arena.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn new_map(&mut self) -> NodeId {
        self.alloc(Node::Map(Fields::new()))
    }

    pub fn new_list(&mut self) -> NodeId {
        self.alloc(Node::List(Vec::new()))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn map(&self, id: NodeId) -> Option<&Fields> {
        match self.node(id) {
            Node::Map(fields) => Some(fields),
            Node::List(_) => None,
        }
    }

    pub fn map_mut(&mut self, id: NodeId) -> Option<&mut Fields> {
        match self.node_mut(id) {
            Node::Map(fields) => Some(fields),
            Node::List(_) => None,
        }
    }

    pub fn list(&self, id: NodeId) -> Option<&Vec<Value>> {
        match self.node(id) {
            Node::List(values) => Some(values),
            Node::Map(_) => None,
        }
    }

    pub fn list_mut(&mut self, id: NodeId) -> Option<&mut Vec<Value>> {
        match self.node_mut(id) {
            Node::List(values) => Some(values),
            Node::Map(_) => None,
        }
    }

    pub fn is_list(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::List(_))
    }

    pub fn is_map(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::Map(_))
    }

    /// Field `key` of a map; `None` for lists and missing keys.
    pub fn get(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.map(id)?.get(key)
    }

    /// Set field `key` of a map, returning the previous value. Lists are left untouched.
    pub fn insert(&mut self, id: NodeId, key: impl Into<String>, value: Value) -> Option<Value> {
        self.map_mut(id)?.insert(key.into(), value)
    }

    pub fn remove(&mut self, id: NodeId, key: &str) -> Option<Value> {
        self.map_mut(id)?.remove(key)
    }

    /// Append to a list. Maps are left untouched.
    pub fn push(&mut self, id: NodeId, value: Value) {
        if let Some(values) = self.list_mut(id) {
            values.push(value);
        }
    }

    /// The value reached from `id` through `key`.
    pub fn edge(&self, id: NodeId, key: &Key) -> Option<&Value> {
        match (self.node(id), key) {
            (Node::Map(fields), Key::Name(name)) => fields.get(name),
            (Node::List(values), Key::Index(index)) => values.get(*index),
            _ => None,
        }
    }

    /// Snapshot of the edges leaving `id`, in order.
    pub fn edges(&self, id: NodeId) -> Vec<(Key, Value)> {
        match self.node(id) {
            Node::Map(fields) => fields
                .iter()
                .map(|(k, v)| (Key::Name(k.clone()), v.clone()))
                .collect(),
            Node::List(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i), v.clone()))
                .collect(),
        }
    }

    /// Whether `value` is `null`, an empty list or an empty map.
    pub fn is_trivial(&self, value: &Value) -> bool {
        match value {
            Value::Scalar(json) => json.is_null(),
            Value::Node(id) => self.node(*id).is_empty(),
        }
    }

    /// Assign a map field, promoting to a fresh list on repeated assignment.
    pub fn set_or_append(&mut self, id: NodeId, key: &str, value: Value) {
        let current = self.get(id, key).cloned();
        let merged = match current {
            None => value,
            Some(Value::Node(existing)) if self.is_list(existing) => {
                let mut values = self.list(existing).cloned().unwrap_or_default();
                values.push(value);
                Value::Node(self.alloc(Node::List(values)))
            }
            Some(existing) => Value::Node(self.alloc(Node::List(vec![existing, value]))),
        };
        self.insert(id, key, merged);
    }

    /// Copy a `serde_json` value into the arena.
    pub fn import(&mut self, json: Json) -> Value {
        match json {
            Json::Array(values) => {
                let values = values.into_iter().map(|v| self.import(v)).collect();
                Value::Node(self.alloc(Node::List(values)))
            }
            Json::Object(map) => Value::Node(self.import_map(map)),
            scalar => Value::Scalar(scalar),
        }
    }

    pub fn import_map(&mut self, map: serde_json::Map<String, Json>) -> NodeId {
        let fields = map
            .into_iter()
            .map(|(k, v)| (k, self.import(v)))
            .collect();
        self.alloc(Node::Map(fields))
    }

    /// Copy a value out of the arena.
    ///
    /// Shared nodes are copied once per reference. An edge back to a node that is currently
    /// being exported exports as `null`, so this terminates on any graph.
    pub fn export(&self, value: &Value) -> Json {
        let mut active = HashSet::new();
        self.export_guarded(value, &mut active)
    }

    fn export_guarded(&self, value: &Value, active: &mut HashSet<NodeId>) -> Json {
        let id = match value {
            Value::Scalar(json) => return json.clone(),
            Value::Node(id) => *id,
        };
        if !active.insert(id) {
            return Json::Null;
        }
        let json = match self.node(id) {
            Node::Map(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), self.export_guarded(v, active)))
                    .collect(),
            ),
            Node::List(values) => Json::Array(
                values
                    .iter()
                    .map(|v| self.export_guarded(v, active))
                    .collect(),
            ),
        };
        active.remove(&id);
        json
    }
}
