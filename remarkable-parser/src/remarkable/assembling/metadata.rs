//! Metadata node placement
//!
//!     A metadata token becomes a map node. Before it is placed:
//!
//!         - `type` and the declared `is` values move into `className`; `type` becomes the
//!           first declared value, or `metadata`.
//!         - The parent is read from `@parent`, or from a `@claims` entry whose value is
//!           `@this` (a relation: "<claimant> has me as <predicate>").
//!         - The name is the explicit `name`, the relation path, the declared type or a
//!           generated `##` name, in that order.
//!         - Every key listed in `collections` becomes a shared, named list.
//!
//!     The node is registered under its name and `<name>.children`, then placed under its
//!     parent or, without one, in the current scope.

use super::naming::{first_name, name_of};
use super::{Assembly, CHILDREN};
use crate::remarkable::graph::{combine, NodeId, Slot, Value, ROOT_NAME};
use crate::remarkable::resolving::{
    merge_into, set_or_append, with_map_entry, CLAIMS, DEFAULT_SUBJECT,
};
use crate::remarkable::token::{Token, METADATA};
use serde_json::{Map, Value as Json};
use unicode_normalization::UnicodeNormalization;

pub(super) const CLASS_NAME: &str = "className";
/// Map receiving values displaced from a node.
pub(super) const MOVED: &str = "metadata";

const TYPE: &str = "type";
const IS: &str = "is";
const NAME: &str = "name";
const PARENT: &str = "@parent";
const COLLECTIONS: &str = "collections";

/// Where a metadata node asked to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ParentRef {
    /// `@parent = <name>`
    Named(String),
    /// `@claims <subject> <predicate> @this`
    Relation { subject: String, predicate: String },
}

impl ParentRef {
    fn subject(&self) -> &str {
        match self {
            ParentRef::Named(name) => name,
            ParentRef::Relation { subject, .. } => subject,
        }
    }
}

impl Assembly<'_> {
    /// Place a metadata token, returning the new node and the container that later siblings
    /// without a parent of their own land in.
    pub(super) fn place_metadata(&mut self, token: Token, scope: NodeId) -> (NodeId, NodeId) {
        let mut fields = token.fields;
        fields.insert(TYPE.to_string(), Json::String(token.kind));
        merge_into(&mut fields, TYPE, CLASS_NAME);
        let declared = merge_into(&mut fields, IS, CLASS_NAME)
            .as_ref()
            .and_then(first_name);
        fields.insert(
            TYPE.to_string(),
            Json::String(declared.clone().unwrap_or_else(|| METADATA.to_string())),
        );
        join_class_names(&mut fields);

        let parent = take_parent(&mut fields);
        let name = self.node_name(&fields, declared.as_deref(), parent.as_ref());
        let parent_name = parent
            .as_ref()
            .map_or(ROOT_NAME, ParentRef::subject)
            .to_string();

        let collections = take_collections(&mut fields);
        for key in &collections {
            move_to_metadata(&mut fields, key);
        }

        let node = self.graph.import_map(fields);
        for key in collections {
            let list = self.registry.list_for(&mut self.graph, &key, &name);
            self.graph.insert(node, key, Value::Node(list));
        }

        let children = self.graph.new_list();
        self.graph.insert(node, CHILDREN, Value::Node(children));
        self.registry.add(
            &mut self.graph,
            &format!("{}.{}", name, CHILDREN),
            &name,
            Slot::List(children),
        );
        self.registry
            .add(&mut self.graph, &name, &parent_name, Slot::Map(node));

        let container = match parent {
            None => {
                self.graph.push(scope, Value::Node(node));
                scope
            }
            Some(ParentRef::Relation { subject, predicate }) => {
                let relation = self.graph.new_map();
                self.graph.insert(relation, predicate, Value::Node(node));
                let slot = self
                    .registry
                    .add(&mut self.graph, &subject, ROOT_NAME, Slot::Map(relation));
                self.children_of_slot(slot)
            }
            Some(ParentRef::Named(parent)) => self.attach_to_named(&parent, node),
        };
        (node, container)
    }

    fn node_name(
        &mut self,
        fields: &Map<String, Json>,
        declared: Option<&str>,
        parent: Option<&ParentRef>,
    ) -> String {
        let name = match (fields.get(NAME).and_then(name_of), parent) {
            (Some(name), _) => name,
            (None, Some(ParentRef::Relation { subject, predicate })) => {
                format!("{}.{}", subject, predicate)
            }
            (None, parent) => {
                let base = match declared {
                    Some(declared) => declared.to_string(),
                    None => self.names.next_name(),
                };
                match parent {
                    Some(ParentRef::Named(parent)) => format!("{}.{}", parent, base),
                    _ => base,
                }
            }
        };
        name.nfc().collect()
    }

    /// Append `node` under the container named `parent`.
    fn attach_to_named(&mut self, parent: &str, node: NodeId) -> NodeId {
        let children_name = format!("{}.{}", parent, CHILDREN);
        match self.registry.slot(parent) {
            None => {
                let list = self.graph.new_list();
                self.graph.push(list, Value::Node(node));
                self.registry
                    .add(&mut self.graph, parent, ROOT_NAME, Slot::List(list));
                list
            }
            Some(Slot::List(list)) => {
                self.graph.push(list, Value::Node(node));
                list
            }
            Some(_) if self.registry.contains(&children_name) => {
                let slot = self.registry.add(
                    &mut self.graph,
                    &children_name,
                    parent,
                    Slot::Map(node),
                );
                self.children_of_slot(slot)
            }
            Some(slot) => {
                let map = match slot {
                    Slot::Map(map) => map,
                    other => {
                        let empty = self.graph.new_map();
                        let merged = combine(&mut self.graph, other, Slot::Map(empty));
                        self.registry.set_slot(parent, merged.clone());
                        merged.node().unwrap_or(empty)
                    }
                };
                let children = self.ensure_children(map);
                self.graph.push(children, Value::Node(node));
                self.registry.add(
                    &mut self.graph,
                    &children_name,
                    parent,
                    Slot::List(children),
                );
                children
            }
        }
    }

    /// The list content should be appended to when `slot` is the target.
    fn children_of_slot(&mut self, slot: Slot) -> NodeId {
        match slot {
            Slot::List(list) => list,
            Slot::Map(map) => self.ensure_children(map),
            Slot::Empty | Slot::Scalar(_) => self.root,
        }
    }

    /// The `children` list of a map node, created when missing; a non-list value is wrapped.
    fn ensure_children(&mut self, map: NodeId) -> NodeId {
        if let Some(children) = self.children_list(map) {
            return children;
        }
        let list = self.graph.new_list();
        if let Some(existing) = self.graph.remove(map, CHILDREN) {
            self.graph.push(list, existing);
        }
        self.graph.insert(map, CHILDREN, Value::Node(list));
        list
    }
}

fn join_class_names(fields: &mut Map<String, Json>) {
    let joined = match fields.get(CLASS_NAME) {
        Some(Json::Array(classes)) => classes
            .iter()
            .filter_map(name_of)
            .collect::<Vec<_>>()
            .join(" "),
        _ => return,
    };
    fields.insert(CLASS_NAME.to_string(), Json::String(joined));
}

/// Remove and return the node's parent reference.
///
/// Relations found in `@claims` are consumed; a claimant left without claims is dropped, and
/// so is an emptied `@claims`. A relation wins over `@parent`, which is removed either way.
fn take_parent(fields: &mut Map<String, Json>) -> Option<ParentRef> {
    let mut relation = None;
    let mut claims_emptied = false;

    if let Some(Json::Object(claims)) = fields.get_mut(CLAIMS) {
        let subjects: Vec<String> = claims.keys().cloned().collect();
        for subject in subjects {
            if subject == DEFAULT_SUBJECT {
                continue;
            }
            let Some(Json::Object(claimed)) = claims.get_mut(&subject) else {
                continue;
            };
            let predicates: Vec<String> = claimed
                .iter()
                .filter(|(predicate, value)| {
                    *predicate != DEFAULT_SUBJECT && value.as_str() == Some(DEFAULT_SUBJECT)
                })
                .map(|(predicate, _)| predicate.clone())
                .collect();
            for predicate in predicates {
                claimed.remove(&predicate);
                relation = Some(ParentRef::Relation {
                    subject: subject.clone(),
                    predicate,
                });
            }
            if relation.is_some() && claimed.is_empty() {
                claims.remove(&subject);
            }
        }
        claims_emptied = claims.is_empty();
    }
    if claims_emptied {
        fields.remove(CLAIMS);
    }

    let named = fields.remove(PARENT);
    relation.or_else(|| named.as_ref().and_then(name_of).map(ParentRef::Named))
}

/// Remove `collections` and return the collection keys it lists.
fn take_collections(fields: &mut Map<String, Json>) -> Vec<String> {
    let names = match fields.remove(COLLECTIONS) {
        None => return Vec::new(),
        Some(Json::Array(values)) => values.iter().filter_map(name_of).collect(),
        Some(value) => name_of(&value).into_iter().collect::<Vec<_>>(),
    };
    names.into_iter().filter(|name| name != CHILDREN).collect()
}

/// Move `fields[key]` into the node's `metadata` map.
pub(super) fn move_to_metadata(fields: &mut Map<String, Json>, key: &str) {
    if let Some(value) = fields.remove(key) {
        with_map_entry(fields, MOVED, |moved| set_or_append(moved, key, value));
    }
}
