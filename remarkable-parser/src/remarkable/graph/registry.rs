//! Named containers
//!
//!     The registry maps a container name (`resume`, `resume.children`, `skills`) to the value
//!     currently held under it and the name of its parent. Adding to a name that is already
//!     taken merges instead of replacing; see [combine] for the rules.

use super::arena::{Graph, Node, NodeId, Value};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// Name of the document root container.
pub const ROOT_NAME: &str = "$";

/// Field a scalar is moved under when it has to become a map.
pub const VALUE_FIELD: &str = "value";

/// What a registered container holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Scalar(Json),
    List(NodeId),
    Map(NodeId),
}

impl Slot {
    /// Classify a graph value.
    pub fn of(graph: &Graph, value: &Value) -> Slot {
        match value {
            Value::Scalar(json) => Slot::Scalar(json.clone()),
            Value::Node(id) if graph.is_list(*id) => Slot::List(*id),
            Value::Node(id) => Slot::Map(*id),
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            Slot::List(id) | Slot::Map(id) => Some(*id),
            Slot::Empty | Slot::Scalar(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Slot::Empty => Value::null(),
            Slot::Scalar(json) => Value::Scalar(json),
            Slot::List(id) | Slot::Map(id) => Value::Node(id),
        }
    }
}

/// Merge `incoming` into `existing`.
///
///     empty  + x       => x
///     list   + x       => x appended to the list
///     map    + map     => keys merged, incoming wins
///     map    + other   => other appended under `value`
///     scalar + x       => `{ value: scalar }`, then merged as a map
pub fn combine(graph: &mut Graph, existing: Slot, incoming: Slot) -> Slot {
    match (existing, incoming) {
        (Slot::Empty, incoming) => incoming,
        (existing, Slot::Empty) => existing,
        (Slot::List(list), incoming) => {
            graph.push(list, incoming.into_value());
            Slot::List(list)
        }
        (Slot::Map(map), Slot::Map(other)) => {
            let fields = graph.map(other).cloned().unwrap_or_default();
            if let Some(target) = graph.map_mut(map) {
                target.extend(fields);
            }
            Slot::Map(map)
        }
        (Slot::Map(map), incoming) => {
            graph.set_or_append(map, VALUE_FIELD, incoming.into_value());
            Slot::Map(map)
        }
        (Slot::Scalar(scalar), incoming) => {
            let map = graph.new_map();
            graph.insert(map, VALUE_FIELD, Value::Scalar(scalar));
            combine(graph, Slot::Map(map), incoming)
        }
    }
}

/// A registered container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub parent: String,
    pub slot: Slot,
}

/// Container names, sorted.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Container>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Container> {
        self.entries.get(name)
    }

    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.entries.get(name).map(|container| container.slot.clone())
    }

    pub fn insert(&mut self, name: impl Into<String>, container: Container) -> Option<Container> {
        self.entries.insert(name.into(), container)
    }

    pub fn remove(&mut self, name: &str) -> Option<Container> {
        self.entries.remove(name)
    }

    /// Register `incoming` under `name`, merging with what is already there.
    ///
    /// The parent of an existing entry is kept. Returns the entry's slot after the merge.
    pub fn add(&mut self, graph: &mut Graph, name: &str, parent: &str, incoming: Slot) -> Slot {
        match self.entries.get_mut(name) {
            Some(container) => {
                let existing = std::mem::take(&mut container.slot);
                container.slot = combine(graph, existing, incoming);
                container.slot.clone()
            }
            None => {
                self.entries.insert(
                    name.to_string(),
                    Container {
                        parent: parent.to_string(),
                        slot: incoming.clone(),
                    },
                );
                incoming
            }
        }
    }

    /// The list registered under `name`, creating or wrapping one as needed.
    ///
    /// A missing entry becomes an empty list; a non-list entry becomes a list holding it.
    pub fn list_for(&mut self, graph: &mut Graph, name: &str, parent: &str) -> NodeId {
        let container = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Container {
                parent: parent.to_string(),
                slot: Slot::Empty,
            });
        match std::mem::take(&mut container.slot) {
            Slot::List(id) => {
                container.slot = Slot::List(id);
                id
            }
            Slot::Empty => {
                let id = graph.new_list();
                container.slot = Slot::List(id);
                id
            }
            other => {
                let id = graph.alloc(Node::List(vec![other.into_value()]));
                container.slot = Slot::List(id);
                id
            }
        }
    }

    /// Replace the slot of an existing entry.
    pub fn set_slot(&mut self, name: &str, slot: Slot) {
        if let Some(container) = self.entries.get_mut(name) {
            container.slot = slot;
        }
    }

    /// Forget every entry holding `id`.
    pub fn remove_node(&mut self, id: NodeId) {
        self.entries
            .retain(|_, container| container.slot.node() != Some(id));
    }

    /// Remove and return the entry with the smallest name.
    pub fn pop_first(&mut self) -> Option<(String, Container)> {
        self.entries.pop_first()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Container)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, Container)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export(graph: &Graph, slot: &Slot) -> Json {
        graph.export(&slot.clone().into_value())
    }

    #[test]
    fn test_combine_into_empty() {
        let mut graph = Graph::new();
        let slot = combine(&mut graph, Slot::Empty, Slot::Scalar(json!("x")));
        assert_eq!(slot, Slot::Scalar(json!("x")));
    }

    #[test]
    fn test_combine_appends_to_lists() {
        let mut graph = Graph::new();
        let list = graph.new_list();
        let slot = combine(&mut graph, Slot::List(list), Slot::Scalar(json!(1)));
        assert_eq!(slot, Slot::List(list));
        assert_eq!(export(&graph, &slot), json!([1]));
    }

    #[test]
    fn test_combine_merges_maps() {
        let mut graph = Graph::new();
        let a = graph.import(json!({ "a": 1, "b": 1 })).as_node().unwrap();
        let b = graph.import(json!({ "b": 2, "c": 2 })).as_node().unwrap();
        let slot = combine(&mut graph, Slot::Map(a), Slot::Map(b));
        assert_eq!(export(&graph, &slot), json!({ "a": 1, "b": 2, "c": 2 }));
    }

    #[test]
    fn test_combine_coerces_scalars() {
        let mut graph = Graph::new();
        let slot = combine(&mut graph, Slot::Scalar(json!("s")), Slot::Scalar(json!("t")));
        assert_eq!(export(&graph, &slot), json!({ "value": ["s", "t"] }));

        let list = graph.import(json!([1])).as_node().unwrap();
        let slot = combine(&mut graph, Slot::Scalar(json!("s")), Slot::List(list));
        assert_eq!(export(&graph, &slot), json!({ "value": ["s", [1]] }));

        let map = graph.import(json!({ "k": true })).as_node().unwrap();
        let slot = combine(&mut graph, Slot::Scalar(json!("s")), Slot::Map(map));
        assert_eq!(export(&graph, &slot), json!({ "k": true, "value": "s" }));
    }

    #[test]
    fn test_add_keeps_first_parent() {
        let mut graph = Graph::new();
        let mut registry = Registry::new();
        let list = graph.new_list();
        registry.add(&mut graph, "skills", "$", Slot::List(list));
        registry.add(&mut graph, "skills", "resume", Slot::Scalar(json!("go")));

        let container = registry.get("skills").unwrap();
        assert_eq!(container.parent, "$");
        assert_eq!(export(&graph, &container.slot), json!(["go"]));
    }

    #[test]
    fn test_list_for_wraps_existing_value() {
        let mut graph = Graph::new();
        let mut registry = Registry::new();
        registry.add(&mut graph, "tags", "$", Slot::Scalar(json!("a")));
        let list = registry.list_for(&mut graph, "tags", "$");
        assert_eq!(graph.export(&Value::Node(list)), json!(["a"]));
        assert_eq!(registry.list_for(&mut graph, "tags", "$"), list);

        let fresh = registry.list_for(&mut graph, "other", "x");
        assert_eq!(registry.get("other").unwrap().parent, "x");
        assert!(graph.node(fresh).is_empty());
    }

    #[test]
    fn test_remove_node_forgets_all_aliases() {
        let mut graph = Graph::new();
        let mut registry = Registry::new();
        let list = graph.new_list();
        registry.add(&mut graph, "a", "$", Slot::List(list));
        registry.add(&mut graph, "b", "$", Slot::List(list));
        registry.add(&mut graph, "c", "$", Slot::Scalar(json!(1)));
        registry.remove_node(list);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("c"));
    }
}
