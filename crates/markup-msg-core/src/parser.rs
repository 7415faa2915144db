// crates/markup-msg-core/src/parser.rs
// ============================================================================
// Module: Template Parser
// Description: Builds a tree of indexed element nodes from template tokens.
// Purpose: Validate bracket balance and produce the structure the renderer walks.
// Dependencies: crate::error, crate::lexer, crate::syntax, serde
// ============================================================================

//! ## Overview
//! [`parse`] consumes the token stream with an explicit stack seeded by a
//! synthetic root frame (index `0`, the slot of the message wrapper). Text
//! joins the children of the frame on top of the stack, an element opener
//! pushes a new frame, and a closer pops the frame into its parent. The
//! stack must end with exactly the root frame.
//!
//! ### Example
//!
//! ```
//! use markup_msg_core::parser::ParsedChild;
//! use markup_msg_core::parser::parse;
//!
//! let root = parse("Click [1:here] now").unwrap();
//! assert_eq!(root.index, 0);
//! assert_eq!(root.children.len(), 3);
//! assert!(matches!(&root.children[1], ParsedChild::Node(node) if node.index == 1));
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::SyntaxErrorKind;
use crate::error::TemplateError;
use crate::error::TemplateResult;
use crate::lexer::Token;
use crate::lexer::tokenize;
use crate::syntax::ESCAPE;
use crate::syntax::PLACEHOLDER_OPEN;
use crate::syntax::placeholder_at;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted template size in bytes.
pub const MAX_TEMPLATE_BYTES: usize = 64 * 1024;
/// Maximum element nesting depth below the root.
pub const MAX_TEMPLATE_DEPTH: usize = 64;

// ============================================================================
// SECTION: Parsed Tree
// ============================================================================

/// Slot index of the synthetic root node.
pub const ROOT_INDEX: usize = 0;

/// An element node of a parsed template.
///
/// # Invariants
/// - Only the root carries [`ROOT_INDEX`].
/// - Text children are still escaped; the renderer unescapes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedNode {
    /// Slot index this node renders from.
    pub index: usize,
    /// Ordered children.
    pub children: Vec<ParsedChild>,
}

/// A child of a [`ParsedNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedChild {
    /// Escaped literal text, possibly containing `{name}` references.
    Text(String),
    /// Nested element reference.
    Node(ParsedNode),
}

impl ParsedNode {
    /// Creates an empty node for `index`.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            children: Vec::new(),
        }
    }

    /// Creates an empty root node.
    #[must_use]
    pub const fn root() -> Self {
        Self::new(ROOT_INDEX)
    }

    /// Returns the largest slot index referenced by this node or its descendants.
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.children
            .iter()
            .filter_map(|child| match child {
                ParsedChild::Node(node) => Some(node.max_index()),
                ParsedChild::Text(_) => None,
            })
            .fold(self.index, usize::max)
    }

    /// Returns the distinct `{name}` references in document order.
    #[must_use]
    pub fn expression_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_expression_names(&mut names);
        names
    }

    /// Appends placeholder names found under this node to `names`.
    fn collect_expression_names(&self, names: &mut Vec<String>) {
        for child in &self.children {
            match child {
                ParsedChild::Text(text) => {
                    for name in placeholder_names_in(text) {
                        if !names.iter().any(|known| known == name) {
                            names.push(name.to_string());
                        }
                    }
                }
                ParsedChild::Node(node) => node.collect_expression_names(names),
            }
        }
    }
}

/// Yields the `{name}` references of an escaped text run, skipping escaped characters.
fn placeholder_names_in(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut chars = text.char_indices();
    while let Some((index, ch)) = chars.next() {
        if ch == ESCAPE {
            chars.next();
        } else if ch == PLACEHOLDER_OPEN {
            if let Some(name) = placeholder_at(&text[index + ch.len_utf8() ..]) {
                names.push(name);
            }
        }
    }
    names
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Open frame on the parser stack.
struct Frame {
    /// Node under construction.
    node: ParsedNode,
    /// Byte offset of the opening bracket (0 for the root).
    ///
    /// Reported when the frame is never closed.
    position: usize,
}

/// Parses `template` into its root node.
///
/// # Errors
/// Returns [`TemplateError::Syntax`] for malformed element syntax or
/// unbalanced brackets, [`TemplateError::TooLarge`] and
/// [`TemplateError::TooDeep`] when limits are exceeded.
pub fn parse(template: &str) -> TemplateResult<ParsedNode> {
    if template.len() > MAX_TEMPLATE_BYTES {
        return Err(TemplateError::TooLarge {
            max_bytes: MAX_TEMPLATE_BYTES,
            actual_bytes: template.len(),
        });
    }

    let mut stack = vec![Frame {
        node: ParsedNode::root(),
        position: 0,
    }];

    for spanned in tokenize(template) {
        let spanned = spanned?;
        match spanned.token {
            Token::Text(text) => {
                top(&mut stack, spanned.position)?
                    .children
                    .push(ParsedChild::Text(text.to_string()));
            }
            Token::Open(index) => {
                if index == ROOT_INDEX {
                    return Err(TemplateError::syntax(
                        SyntaxErrorKind::ReservedElementIndex,
                        spanned.position,
                    ));
                }
                if stack.len() > MAX_TEMPLATE_DEPTH {
                    return Err(TemplateError::TooDeep {
                        max_depth: MAX_TEMPLATE_DEPTH,
                        actual_depth: stack.len(),
                        position: spanned.position,
                    });
                }
                stack.push(Frame {
                    node: ParsedNode::new(index),
                    position: spanned.position,
                });
            }
            Token::Close => {
                if stack.len() <= 1 {
                    return Err(unmatched(spanned.position));
                }
                let Some(frame) = stack.pop() else {
                    return Err(unmatched(spanned.position));
                };
                top(&mut stack, spanned.position)?.children.push(ParsedChild::Node(frame.node));
            }
        }
    }

    if stack.len() > 1 {
        let position = stack.last().map_or(template.len(), |frame| frame.position);
        return Err(unmatched(position));
    }
    stack.pop().map(|frame| frame.node).ok_or_else(|| unmatched(template.len()))
}

/// Returns the node on top of the stack.
fn top(stack: &mut [Frame], position: usize) -> TemplateResult<&mut ParsedNode> {
    stack.last_mut().map(|frame| &mut frame.node).ok_or_else(|| unmatched(position))
}

/// Builds the bracket-balance error.
const fn unmatched(position: usize) -> TemplateError {
    TemplateError::syntax(SyntaxErrorKind::UnmatchedElements, position)
}
