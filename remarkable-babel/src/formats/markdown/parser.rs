//! Markdown tokenizing (Markdown → tokens)
//!
//! Pipeline: Markdown string → Comrak AST → flat token list
//!
//! Block nodes become tokens whose `raw` is the source lines they span. Blank lines between
//! sibling blocks become `space` tokens. Inline children are nested under `tokens`, list items
//! under `items`. Adjacent text runs, soft breaks included, are merged into one `text` token.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use remarkable_parser::remarkable::token::{Token, SPACE, TEXT};
use serde_json::Value;
use tracing::trace;

/// Tokenize a markdown string
pub fn tokenize_markdown(source: &str) -> Vec<Token> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let lines = SourceLines::new(source);
    block_tokens(root, &lines)
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

/// Source text split into lines, terminators kept
struct SourceLines<'s> {
    lines: Vec<&'s str>,
}

impl<'s> SourceLines<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            lines: source.split_inclusive('\n').collect(),
        }
    }

    /// The full source lines covered by a node
    fn span<'a>(&self, node: &'a AstNode<'a>) -> String {
        let start = start_line(node).saturating_sub(1);
        let end = end_line(node).min(self.lines.len());
        if start >= end {
            return String::new();
        }
        self.lines[start..end].concat()
    }
}

fn start_line<'a>(node: &'a AstNode<'a>) -> usize {
    node.data.borrow().sourcepos.start.line
}

fn end_line<'a>(node: &'a AstNode<'a>) -> usize {
    node.data.borrow().sourcepos.end.line
}

/// Tokens for the block children of `parent`, with `space` tokens for the gaps between them
fn block_tokens<'a>(parent: &'a AstNode<'a>, lines: &SourceLines<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut previous_end: Option<usize> = None;

    for node in parent.children() {
        let start = start_line(node);
        if let Some(end) = previous_end {
            if start > end + 1 {
                tokens.push(Token::new(SPACE).with_raw("\n".repeat(start - end - 1)));
            }
        }
        previous_end = Some(end_line(node));

        if let Some(token) = block_token(node, lines) {
            tokens.push(token);
        }
    }

    tokens
}

fn block_token<'a>(node: &'a AstNode<'a>, lines: &SourceLines<'_>) -> Option<Token> {
    let raw = lines.span(node);
    let value = node.data.borrow().value.clone();

    let token = match value {
        NodeValue::Heading(heading) => Token::new("heading")
            .with_raw(raw)
            .with_field("depth", heading.level)
            .with_text(plain_text(node))
            .with_tokens(inline_tokens(node)),

        NodeValue::Paragraph => Token::new("paragraph")
            .with_raw(raw)
            .with_text(plain_text(node))
            .with_tokens(inline_tokens(node)),

        NodeValue::BlockQuote => Token::new("blockquote")
            .with_raw(raw)
            .with_text(plain_text(node))
            .with_tokens(block_tokens(node, lines)),

        NodeValue::List(list) => {
            let ordered = list.list_type == ListType::Ordered;
            let start = if ordered {
                Value::from(list.start)
            } else {
                Value::String(String::new())
            };
            let items = node
                .children()
                .filter_map(|item| block_token(item, lines))
                .collect();
            Token::new("list")
                .with_raw(raw)
                .with_field("ordered", ordered)
                .with_field("start", start)
                .with_field("loose", !list.tight)
                .with_items(items)
        }

        NodeValue::Item(_) => Token::new("list_item")
            .with_raw(raw)
            .with_text(plain_text(node))
            .with_tokens(block_tokens(node, lines)),

        NodeValue::CodeBlock(code) => Token::new("code")
            .with_raw(raw)
            .with_field("lang", code.info.clone())
            .with_text(code.literal.trim_end_matches('\n')),

        NodeValue::HtmlBlock(html) => Token::html(html.literal.clone()).with_field("block", true),

        NodeValue::ThematicBreak => Token::new("hr").with_raw(raw),

        other => {
            trace!(node = ?other, "skipping unsupported markdown block");
            return None;
        }
    };

    Some(token)
}

/// Tokens for the inline children of `parent`
fn inline_tokens<'a>(parent: &'a AstNode<'a>) -> Vec<Token> {
    let mut tokens = Vec::new();
    for node in parent.children() {
        push_inline(&mut tokens, node);
    }
    tokens
}

fn push_inline<'a>(tokens: &mut Vec<Token>, node: &'a AstNode<'a>) {
    let value = node.data.borrow().value.clone();

    match value {
        NodeValue::Text(text) => push_text(tokens, &text),
        NodeValue::SoftBreak => push_text(tokens, "\n"),
        NodeValue::LineBreak => tokens.push(Token::new("br").with_raw("\n")),
        NodeValue::Code(code) => tokens.push(
            Token::new("codespan")
                .with_raw(format!("`{}`", code.literal))
                .with_text(code.literal),
        ),
        NodeValue::HtmlInline(html) => tokens.push(Token::html(html)),
        NodeValue::Strong => tokens.push(span("strong", "**", node)),
        NodeValue::Emph => tokens.push(span("em", "*", node)),
        NodeValue::Strikethrough => tokens.push(span("del", "~~", node)),
        NodeValue::Link(link) => {
            let text = plain_text(node);
            tokens.push(
                Token::new("link")
                    .with_raw(format!("[{}]({})", text, link.url))
                    .with_field("href", link.url)
                    .with_field("title", title(link.title))
                    .with_text(text)
                    .with_tokens(inline_tokens(node)),
            );
        }
        NodeValue::Image(link) => {
            let text = plain_text(node);
            tokens.push(
                Token::new("image")
                    .with_raw(format!("![{}]({})", text, link.url))
                    .with_field("href", link.url)
                    .with_field("title", title(link.title))
                    .with_text(text),
            );
        }
        other => trace!(node = ?other, "skipping unsupported markdown inline"),
    }
}

/// An emphasis-like span wrapping inline children
fn span<'a>(kind: &str, marker: &str, node: &'a AstNode<'a>) -> Token {
    let text = plain_text(node);
    Token::new(kind)
        .with_raw(format!("{marker}{text}{marker}"))
        .with_text(text)
        .with_tokens(inline_tokens(node))
}

fn title(title: String) -> Value {
    if title.is_empty() {
        Value::Null
    } else {
        Value::String(title)
    }
}

/// Append text, extending the previous token when it is text too
fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if let Some(last) = tokens.last_mut().filter(|token| token.is(TEXT)) {
        last.raw.get_or_insert_with(String::new).push_str(text);
        last.text.get_or_insert_with(String::new).push_str(text);
        return;
    }
    tokens.push(Token::text(text));
}

/// Concatenated text content of a node
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::HtmlInline(html) => out.push_str(html),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}
