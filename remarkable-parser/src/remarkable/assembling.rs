//! Token tree assembly
//!
//!     Reassembles the resolved token stream into the document tree.
//!
//!     The walk keeps one append target per open scope. A metadata token opens a node that
//!     collects the content tokens following it in the same scope; nested tokens open a new
//!     scope inside their own node. Named containers (nodes, their children lists, declared
//!     collections, relation parents) are tracked in a registry for the length of one run.
//!
//!     After the walk:
//!
//!         1. cleanup strips trivial values and collapses text leaves
//!         2. registry entries never reached from the root are appended there as orphans,
//!            wrapped under their name, and cleaned the same way
//!         3. cycles are named or deleted
//!         4. content transforms run, in order
//!
//!     Nothing here fails on author input: dangling parents, name clashes and cycles all end
//!     in a well-formed tree.

mod cleanup;
mod content;
mod metadata;
mod naming;

pub use cleanup::{clean, collapse_text, strip_trivial};
pub use naming::UniqueNames;

use crate::remarkable::document::DocumentTree;
use crate::remarkable::graph::{
    remove_cycles, walk_content, Container, Graph, NodeId, Registry, Slot, Value, ROOT_NAME,
};
use crate::remarkable::options::PipelineOptions;
use crate::remarkable::token::Token;
use std::collections::HashSet;
use tracing::debug;

/// Field holding a node's ordered children.
pub const CHILDREN: &str = "children";

/// Assemble a resolved token stream into a document tree.
pub fn assemble(tokens: Vec<Token>, options: &PipelineOptions) -> DocumentTree {
    let mut assembly = Assembly::new(options);
    assembly.assemble_scope(tokens);
    assembly.finish()
}

/// State of one assembly run.
pub(crate) struct Assembly<'o> {
    graph: Graph,
    registry: Registry,
    names: UniqueNames,
    options: &'o PipelineOptions,
    root: NodeId,
    scopes: Vec<NodeId>,
}

impl<'o> Assembly<'o> {
    fn new(options: &'o PipelineOptions) -> Self {
        let mut graph = Graph::new();
        let root = graph.new_list();
        let mut registry = Registry::new();
        registry.insert(
            ROOT_NAME,
            Container {
                parent: ROOT_NAME.to_string(),
                slot: Slot::List(root),
            },
        );

        Self {
            graph,
            registry,
            names: UniqueNames::new(),
            options,
            root,
            scopes: vec![root],
        }
    }

    fn current_scope(&self) -> NodeId {
        self.scopes.last().copied().unwrap_or(self.root)
    }

    fn assemble_scope(&mut self, tokens: Vec<Token>) {
        let mut container = self.current_scope();
        let mut active: Option<NodeId> = None;

        for token in tokens {
            if token.is_metadata() {
                let (node, next) = self.place_metadata(token, container);
                active = Some(node);
                container = next;
                if let Some(scope) = self.scopes.last_mut() {
                    *scope = next;
                }
            } else if self.is_dropped(&token) {
                continue;
            } else {
                let target = active
                    .and_then(|node| self.children_list(node))
                    .unwrap_or(container);
                let (children, nested) = self.place_content(token, target);
                if !nested.is_empty() {
                    self.scopes.push(children);
                    self.assemble_scope(nested);
                    self.scopes.pop();
                }
            }
        }
    }

    /// The current `children` list of a map node, if it has one.
    fn children_list(&self, node: NodeId) -> Option<NodeId> {
        self.graph
            .get(node, CHILDREN)
            .and_then(Value::as_node)
            .filter(|&children| self.graph.is_list(children))
    }

    fn finish(self) -> DocumentTree {
        let Assembly {
            mut graph,
            mut registry,
            options,
            root,
            ..
        } = self;

        registry.remove(ROOT_NAME);
        clean(&mut graph, root, &mut registry);
        if promote_orphans(&mut graph, root, registry) > 0 {
            clean(&mut graph, root, &mut Registry::new());
        }

        let cycles = remove_cycles(&mut graph, root, options.cycle_policy());
        for transform in &options.content_transforms {
            walk_content(&mut graph, root, transform.as_ref());
        }
        DocumentTree::new(graph, root, cycles)
    }
}

/// Append the containers left in the registry to the root, wrapped under their names.
///
/// Containers held inside other leftover containers are not promoted on their own: the
/// outermost ones go first, and everything a promoted container reaches is forgotten before
/// the next one is considered. Containers that only hold each other go last, by name.
fn promote_orphans(graph: &mut Graph, root: NodeId, mut registry: Registry) -> usize {
    let starts: Vec<NodeId> = registry
        .iter()
        .filter_map(|(_, container)| container.slot.node())
        .collect();
    let nested = reachable_below(graph, &starts);
    let outermost: Vec<String> = registry
        .iter()
        .filter(|(_, container)| {
            container
                .slot
                .node()
                .is_some_and(|id| !nested.contains(&id))
        })
        .map(|(name, _)| name.clone())
        .collect();

    let mut promoted = 0;
    for name in outermost {
        if let Some(container) = registry.remove(&name) {
            if promote(graph, root, name, container, &mut registry) {
                promoted += 1;
            }
        }
    }
    while let Some((name, container)) = registry.pop_first() {
        if promote(graph, root, name, container, &mut registry) {
            promoted += 1;
        }
    }
    promoted
}

fn promote(
    graph: &mut Graph,
    root: NodeId,
    name: String,
    container: Container,
    registry: &mut Registry,
) -> bool {
    let Some(id) = container.slot.node() else {
        return false;
    };
    if graph.node(id).is_empty() {
        return false;
    }
    debug!(name = %name, parent = %container.parent, "promoting orphan container");
    let wrapper = graph.new_map();
    graph.insert(wrapper, name, Value::Node(id));
    graph.push(root, Value::Node(wrapper));
    strip_trivial(graph, wrapper, registry);
    true
}

/// Every node reachable from `starts` through at least one edge.
fn reachable_below(graph: &Graph, starts: &[NodeId]) -> HashSet<NodeId> {
    let child_nodes = |id: NodeId| {
        graph
            .edges(id)
            .into_iter()
            .filter_map(|(_, value)| value.as_node())
    };
    let mut seen = HashSet::new();
    let mut pending: Vec<NodeId> = starts.iter().flat_map(|&id| child_nodes(id)).collect();
    while let Some(id) = pending.pop() {
        if seen.insert(id) {
            pending.extend(child_nodes(id));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remarkable::resolving::resolve;
    use serde_json::{json, Value as Json};

    fn tree(tokens: Vec<Token>) -> Json {
        assemble(resolve(tokens), &PipelineOptions::default()).to_value()
    }

    #[test]
    fn test_content_lands_in_open_metadata_node() {
        let tokens = vec![
            Token::html("<!-- : resume -->\n"),
            Token::new("heading")
                .with_field("depth", 1)
                .with_raw("# Jane\n")
                .with_text("Jane")
                .with_tokens(vec![Token::text("Jane")]),
            Token::new("space").with_raw("\n\n"),
        ];
        assert_eq!(
            tree(tokens),
            json!([{
                "type": "resume",
                "className": "metadata resume",
                "children": [{ "type": "heading", "depth": 1, "text": "Jane" }]
            }])
        );
    }

    #[test]
    fn test_content_before_metadata_stays_in_scope() {
        let tokens = vec![
            Token::new("paragraph").with_tokens(vec![Token::text("intro")]),
            Token::html("<!-- : card -->"),
            Token::new("paragraph").with_tokens(vec![Token::text("body")]),
        ];
        assert_eq!(
            tree(tokens),
            json!([
                { "type": "paragraph", "text": "intro" },
                {
                    "type": "card",
                    "className": "metadata card",
                    "children": [{ "type": "paragraph", "text": "body" }]
                }
            ])
        );
    }

    #[test]
    fn test_options_keep_space_and_html() {
        let tokens = vec![Token::new("space").with_raw("\n"), Token::html("<br>")];
        let options = PipelineOptions::default()
            .with_retain_space(true)
            .with_allow_html(true);
        assert_eq!(
            assemble(tokens, &options).to_value(),
            json!([{ "type": "space" }, { "type": "html", "text": "<br>" }])
        );
    }

    #[test]
    fn test_untyped_nodes_get_generated_names() {
        let tokens = vec![
            Token::html("<!-- : rank = 1 -->"),
            Token::html("<!-- : rank = 2 -->"),
        ];
        let document = assemble(resolve(tokens), &PipelineOptions::default());
        assert_eq!(
            document.to_value(),
            json!([
                { "type": "metadata", "className": "metadata", "rank": "1" },
                { "type": "metadata", "className": "metadata", "rank": "2" }
            ])
        );
    }

    #[test]
    fn test_named_parent_collects_later_nodes() {
        let tokens = vec![
            Token::html("<!-- : resume -->"),
            Token::html("<!-- : skill : @parent = resume : name = go -->"),
            Token::new("paragraph").with_tokens(vec![Token::text("Go")]),
        ];
        assert_eq!(
            tree(tokens),
            json!([{
                "type": "resume",
                "className": "metadata resume",
                "children": [{
                    "type": "skill",
                    "className": "metadata skill",
                    "name": "go",
                    "children": [{ "type": "paragraph", "text": "Go" }]
                }]
            }])
        );
    }

    #[test]
    fn test_unknown_parent_becomes_orphan() {
        let tokens = vec![Token::html("<!-- : job : @parent = history -->")];
        assert_eq!(
            tree(tokens),
            json!([{ "history": [{ "type": "job", "className": "metadata job" }] }])
        );
    }

    #[test]
    fn test_collections_are_shared_lists() {
        let tokens = vec![
            Token::html("<!-- : resume : collections = skills -->"),
            Token::html("<!-- : skill : @parent = skills : name = go -->"),
            Token::html("<!-- : skill : @parent = skills : name = rust -->"),
        ];
        assert_eq!(
            tree(tokens),
            json!([{
                "type": "resume",
                "className": "metadata resume",
                "skills": [
                    { "type": "skill", "className": "metadata skill", "name": "go" },
                    { "type": "skill", "className": "metadata skill", "name": "rust" }
                ]
            }])
        );
    }

    #[test]
    fn test_unreferenced_collection_is_promoted_once() {
        let tokens = vec![
            Token::html("<!-- : skill : @parent = skills : name = go -->"),
            Token::html("<!-- : @parent = drafts -->"),
        ];
        let value = tree(tokens);
        let roots = value.as_array().unwrap();
        let skills: Vec<_> = roots.iter().filter(|n| n.get("skills").is_some()).collect();
        assert_eq!(roots.len(), 2);
        assert_eq!(skills.len(), 1);
        assert_eq!(
            skills[0]["skills"],
            json!([{ "type": "skill", "className": "metadata skill", "name": "go" }])
        );
    }

    #[test]
    fn test_relation_parent() {
        let tokens = vec![
            Token::html("<!-- : resume -->"),
            Token::html("<!-- : contact : @claims = resume = contact = -->"),
            Token::new("paragraph").with_tokens(vec![Token::text("jane@example.com")]),
        ];
        assert_eq!(
            tree(tokens),
            json!([{
                "type": "resume",
                "className": "metadata resume",
                "contact": {
                    "type": "contact",
                    "className": "metadata contact",
                    "children": [{ "type": "paragraph", "text": "jane@example.com" }]
                }
            }])
        );
    }

    #[test]
    fn test_self_parent_cycle_is_named() {
        let tokens = vec![Token::html("<!-- : loop : name = x : @parent = x -->")];
        let document = assemble(resolve(tokens), &PipelineOptions::default());

        assert_eq!(document.cycles().len(), 1);
        assert_eq!(
            document.cycles()[0].to_string(),
            "$[0].x === $[0].x.children[0]"
        );
        assert_eq!(
            document.to_value(),
            json!([{
                "x": {
                    "type": "loop",
                    "className": "metadata loop",
                    "name": "x",
                    "children": ["$[0].x"]
                }
            }])
        );
    }

    #[test]
    fn test_self_parent_cycle_is_deleted() {
        let tokens = vec![Token::html("<!-- : loop : name = x : @parent = x -->")];
        let options = PipelineOptions::default().with_name_cycles(false);
        let document = assemble(resolve(tokens), &options);

        assert_eq!(
            document.to_value(),
            json!([{
                "x": { "type": "loop", "className": "metadata loop", "name": "x", "children": [] }
            }])
        );
    }

    #[test]
    fn test_content_transforms_run_last() {
        let tokens = vec![Token::new("paragraph").with_tokens(vec![Token::text("hi")])];
        let options = PipelineOptions::default().with_content_transform(
            |graph: &mut Graph, ancestors: &[NodeId], key: &crate::remarkable::graph::Key| {
                let Some(&owner) = ancestors.last() else { return };
                if let Some(text) = graph.edge(owner, key).and_then(Value::as_str) {
                    if text == "hi" {
                        graph.insert(owner, "text", Value::string("HI"));
                    }
                }
            },
        );
        assert_eq!(
            assemble(tokens, &options).to_value(),
            json!([{ "type": "paragraph", "text": "HI" }])
        );
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let tokens = vec![Token::html("<!-- : rank = 1 -->")];
        let first = assemble(resolve(tokens.clone()), &PipelineOptions::default());
        let second = assemble(resolve(tokens), &PipelineOptions::default());
        assert_eq!(first.to_value(), second.to_value());
    }
}
