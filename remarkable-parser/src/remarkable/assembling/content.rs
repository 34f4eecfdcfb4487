//! Content token placement

use super::metadata::move_to_metadata;
use super::{Assembly, CHILDREN};
use crate::remarkable::graph::{NodeId, Value};
use crate::remarkable::token::{Token, HTML, SPACE, TEXT};
use serde_json::Value as Json;

impl Assembly<'_> {
    /// Whether the options drop this token.
    pub(super) fn is_dropped(&self, token: &Token) -> bool {
        (token.is(SPACE) && !self.options.retain_space)
            || (token.is(HTML) && !self.options.allow_html)
    }

    /// Append a content token to `container`.
    ///
    /// Returns the node's `children` list and the nested tokens that belong in it.
    pub(super) fn place_content(
        &mut self,
        mut token: Token,
        container: NodeId,
    ) -> (NodeId, Vec<Token>) {
        let has_nested = token.has_nested();
        let nested = token.take_nested();

        let text = if token.is(TEXT) {
            token.raw.take().or(token.text.take())
        } else {
            token.text.take()
        };

        let mut fields = token.fields;
        move_to_metadata(&mut fields, CHILDREN);
        fields.insert("type".to_string(), Json::String(token.kind));
        if let Some(text) = text.filter(|_| !has_nested) {
            fields.insert("text".to_string(), Json::String(text));
        }

        let node = self.graph.import_map(fields);
        let children = self.graph.new_list();
        self.graph.insert(node, CHILDREN, Value::Node(children));
        self.graph.push(container, Value::Node(node));
        (children, nested)
    }
}
