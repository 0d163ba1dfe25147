//! Recursive-descent parser for organize formats.
//!
//! Grammar (two levels, blocks never nest):
//!
//! ```text
//! format  := (block | tag | literal)*
//! block   := '{' (tag | literal)+ '}'      content holds no '{' or '}'
//! tag     := '%' [A-Za-z]*
//! ```
//!
//! Braces that do not form a block are plain literal text, so `{a{b}c}`
//! parses as `{a`, block `{b}`, `c}`. All spans are byte offsets into the
//! input string.

use super::tags::Tag;
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Literal { text: &'a str, span: Range<usize> },
    Tag { name: &'a str, span: Range<usize> },
    Block { children: Vec<Node<'a>>, span: Range<usize> },
}

/// Highlighting class of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Literal,
    /// Block delimiters and literal text inside a block.
    Block,
    ValidTag,
    InvalidTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub span: Range<usize>,
    pub kind: TokenKind,
    pub in_block: bool,
}

pub fn parse(input: &str) -> Vec<Node<'_>> {
    parse_range(input, 0, input.len(), true)
}

fn parse_range(input: &str, start: usize, end: usize, allow_blocks: bool) -> Vec<Node<'_>> {
    let bytes = input.as_bytes();
    let mut nodes = Vec::new();
    let mut literal_start = start;
    let mut pos = start;

    while pos < end {
        match bytes[pos] {
            b'{' if allow_blocks => match block_end(bytes, pos, end) {
                Some(close) => {
                    push_literal(input, literal_start..pos, &mut nodes);
                    let children = parse_range(input, pos + 1, close, false);
                    nodes.push(Node::Block { children, span: pos..close + 1 });
                    pos = close + 1;
                    literal_start = pos;
                }
                None => pos += 1,
            },
            b'%' => {
                push_literal(input, literal_start..pos, &mut nodes);
                let name_end = tag_end(bytes, pos, end);
                nodes.push(Node::Tag { name: &input[pos + 1..name_end], span: pos..name_end });
                pos = name_end;
                literal_start = pos;
            }
            _ => pos += 1,
        }
    }
    push_literal(input, literal_start..end, &mut nodes);
    nodes
}

fn push_literal<'a>(input: &'a str, span: Range<usize>, nodes: &mut Vec<Node<'a>>) {
    if !span.is_empty() {
        nodes.push(Node::Literal { text: &input[span.clone()], span });
    }
}

/// Index of the `}` closing the block opened at `open`, if the next brace
/// after it is a `}` and the block is not empty.
fn block_end(bytes: &[u8], open: usize, end: usize) -> Option<usize> {
    let next = (open + 1..end).find(|&i| bytes[i] == b'{' || bytes[i] == b'}')?;
    (bytes[next] == b'}' && next > open + 1).then_some(next)
}

fn tag_end(bytes: &[u8], percent: usize, end: usize) -> usize {
    (percent + 1..end).find(|&i| !bytes[i].is_ascii_alphabetic()).unwrap_or(end)
}

/// Every `%name` in `input` with its byte offset, blocks or not.
pub fn tag_names(input: &str) -> Vec<(usize, &str)> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] == b'%' {
            let end = tag_end(bytes, pos, bytes.len());
            out.push((pos, &input[pos + 1..end]));
            pos = end;
        } else {
            pos += 1;
        }
    }
    out
}

/// Split a format into highlighting spans. The spans cover the input in order
/// without overlapping.
pub fn classify(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    classify_nodes(&parse(input), false, &mut tokens);
    tokens
}

fn classify_nodes(nodes: &[Node<'_>], in_block: bool, tokens: &mut Vec<Token>) {
    for node in nodes {
        match node {
            Node::Literal { span, .. } => {
                let kind = if in_block { TokenKind::Block } else { TokenKind::Literal };
                tokens.push(Token { span: span.clone(), kind, in_block });
            }
            Node::Tag { name, span } => {
                let kind = if Tag::from_name(name).is_some() { TokenKind::ValidTag } else { TokenKind::InvalidTag };
                tokens.push(Token { span: span.clone(), kind, in_block });
            }
            Node::Block { children, span } => {
                tokens.push(Token { span: span.start..span.start + 1, kind: TokenKind::Block, in_block: true });
                classify_nodes(children, true, tokens);
                tokens.push(Token { span: span.end - 1..span.end, kind: TokenKind::Block, in_block: true });
            }
        }
    }
}
