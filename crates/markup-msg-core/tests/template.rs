// crates/markup-msg-core/tests/template.rs
// ============================================================================
// Test Module: Template Tokenizer and Parser
// Coverage: Token streams, nested parsing, escapes, syntax errors, and limits.
// ============================================================================
//! ## Overview
//! Integration tests for the template grammar.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use markup_msg_core::MAX_TEMPLATE_BYTES;
use markup_msg_core::MAX_TEMPLATE_DEPTH;
use markup_msg_core::ParsedChild;
use markup_msg_core::ParsedNode;
use markup_msg_core::SyntaxErrorKind;
use markup_msg_core::TemplateError;
use markup_msg_core::Token;
use markup_msg_core::parse;
use markup_msg_core::syntax::escape;
use markup_msg_core::syntax::unescape;
use markup_msg_core::tokenize;
use support::TestResult;
use support::ensure;

// ========================================================================
// Helpers
// ========================================================================

/// Builds a text child.
fn text(value: &str) -> ParsedChild {
    ParsedChild::Text(value.to_string())
}

/// Builds a node child.
fn node(index: usize, children: Vec<ParsedChild>) -> ParsedChild {
    ParsedChild::Node(ParsedNode {
        index,
        children,
    })
}

/// Returns the syntax error kind and position, if `result` is one.
fn syntax_error(result: Result<ParsedNode, TemplateError>) -> Option<(SyntaxErrorKind, usize)> {
    match result {
        Err(TemplateError::Syntax {
            kind,
            position,
        }) => Some((kind, position)),
        _ => None,
    }
}

// ========================================================================
// Tokenizer
// ========================================================================

/// Tests tokenizes text and element markers with offsets.
#[test]
fn tokenizes_text_and_element_markers() -> TestResult {
    let tokens: Vec<_> = tokenize("a[12:b]c").collect::<Result<_, _>>()?;
    let kinds: Vec<Token<'_>> = tokens.iter().map(|spanned| spanned.token).collect();
    let positions: Vec<usize> = tokens.iter().map(|spanned| spanned.position).collect();
    ensure(
        kinds == vec![Token::Text("a"), Token::Open(12), Token::Text("b"), Token::Close, Token::Text("c")],
        format!("unexpected tokens: {kinds:?}"),
    )?;
    ensure(positions == vec![0, 1, 5, 6, 7], format!("unexpected positions: {positions:?}"))?;
    Ok(())
}

/// Tests escape pairs stay inside one text token.
#[test]
fn escape_pairs_stay_in_text() -> TestResult {
    let tokens: Vec<_> = tokenize(r"a\[b\]c\\").collect::<Result<_, _>>()?;
    ensure(tokens.len() == 1, "expected a single text token")?;
    ensure(tokens[0].token == Token::Text(r"a\[b\]c\\"), "escapes must pass through verbatim")?;
    Ok(())
}

/// Tests the token stream can be restarted from a clone.
#[test]
fn token_stream_is_restartable() -> TestResult {
    let tokens = tokenize("x[1:y]");
    let first: Vec<_> = tokens.clone().collect::<Result<_, _>>()?;
    let second: Vec<_> = tokens.collect::<Result<_, _>>()?;
    ensure(first == second, "cloned streams must yield identical tokens")?;
    Ok(())
}

/// Tests the tokenizer stops after the first error.
#[test]
fn tokenizer_fuses_after_error() -> TestResult {
    let mut tokens = tokenize("a[b]");
    ensure(matches!(tokens.next(), Some(Ok(_))), "expected leading text")?;
    ensure(matches!(tokens.next(), Some(Err(_))), "expected index error")?;
    ensure(tokens.next().is_none(), "stream must end after an error")?;
    Ok(())
}

// ========================================================================
// Parser
// ========================================================================

/// Tests parses nested elements in order.
#[test]
fn parses_nested_elements() -> TestResult {
    let root = parse("a[1:b[2:c]d]e")?;
    let expected = ParsedNode {
        index: 0,
        children: vec![
            text("a"),
            node(1, vec![text("b"), node(2, vec![text("c")]), text("d")]),
            text("e"),
        ],
    };
    ensure(root == expected, format!("unexpected tree: {root:?}"))?;
    ensure(root.max_index() == 2, "max index should be 2")?;
    Ok(())
}

/// Tests empty templates and empty elements are accepted.
#[test]
fn parses_empty_shapes() -> TestResult {
    ensure(parse("")? == ParsedNode::root(), "empty template is an empty root")?;
    let root = parse("[1:]")?;
    ensure(root.children == vec![node(1, Vec::new())], "empty element keeps no children")?;
    Ok(())
}

/// Tests escaped brackets are text, not elements.
#[test]
fn escaped_brackets_are_text() -> TestResult {
    let root = parse(r"see \[1:x\]")?;
    ensure(root.children == vec![text(r"see \[1:x\]")], "escaped brackets must stay text")?;
    Ok(())
}

/// Tests expression names are collected once in document order.
#[test]
fn collects_expression_names() -> TestResult {
    let root = parse(r"{b} and [1:{a} or {b}] \{c}")?;
    ensure(root.expression_names() == vec!["b".to_string(), "a".to_string()], "unexpected names")?;
    Ok(())
}

/// Tests a missing closing bracket reports the opening position.
#[test]
fn unclosed_element_is_rejected() -> TestResult {
    let error = syntax_error(parse("[1:abc"));
    ensure(error == Some((SyntaxErrorKind::UnmatchedElements, 0)), format!("got {error:?}"))?;
    Ok(())
}

/// Tests a stray closing bracket is rejected at its position.
#[test]
fn stray_close_is_rejected() -> TestResult {
    let error = syntax_error(parse("abc]"));
    ensure(error == Some((SyntaxErrorKind::UnmatchedElements, 3)), format!("got {error:?}"))?;
    Ok(())
}

/// Tests a bracket without digits and colon is rejected.
#[test]
fn missing_index_is_rejected() -> TestResult {
    for template in ["[x:y]", "[1y]", "[:y]", "["] {
        let error = syntax_error(parse(template));
        ensure(
            error == Some((SyntaxErrorKind::ExpectedElementIndex, 0)),
            format!("{template}: got {error:?}"),
        )?;
    }
    Ok(())
}

/// Tests index zero is reserved for the root.
#[test]
fn index_zero_is_reserved() -> TestResult {
    let error = syntax_error(parse("a[0:b]"));
    ensure(error == Some((SyntaxErrorKind::ReservedElementIndex, 1)), format!("got {error:?}"))?;
    Ok(())
}

/// Tests a trailing lone backslash is rejected.
#[test]
fn dangling_escape_is_rejected() -> TestResult {
    let error = syntax_error(parse("abc\\"));
    ensure(error == Some((SyntaxErrorKind::DanglingEscape, 3)), format!("got {error:?}"))?;
    Ok(())
}

/// Tests huge indices are reported as overflow.
#[test]
fn index_overflow_is_rejected() -> TestResult {
    let error = syntax_error(parse("[99999999999999999999999:x]"));
    ensure(error == Some((SyntaxErrorKind::ElementIndexOverflow, 0)), format!("got {error:?}"))?;
    Ok(())
}

// ========================================================================
// Limits
// ========================================================================

/// Tests templates over the size limit are rejected.
#[test]
fn oversized_template_is_rejected() -> TestResult {
    let template = "a".repeat(MAX_TEMPLATE_BYTES + 1);
    ensure(
        matches!(parse(&template), Err(TemplateError::TooLarge { .. })),
        "expected TooLarge",
    )?;
    Ok(())
}

/// Tests nesting beyond the depth limit is rejected.
#[test]
fn deep_nesting_is_rejected() -> TestResult {
    let within = format!("{}{}", "[1:".repeat(MAX_TEMPLATE_DEPTH), "]".repeat(MAX_TEMPLATE_DEPTH));
    ensure(parse(&within).is_ok(), "nesting at the limit must parse")?;

    let depth = MAX_TEMPLATE_DEPTH + 1;
    let beyond = format!("{}{}", "[1:".repeat(depth), "]".repeat(depth));
    ensure(
        matches!(parse(&beyond), Err(TemplateError::TooDeep { .. })),
        "expected TooDeep",
    )?;
    Ok(())
}

// ========================================================================
// Escaping
// ========================================================================

/// Tests escape and unescape on reserved characters.
#[test]
fn escape_round_trips_reserved_characters() -> TestResult {
    let raw = r"a[b]c\d";
    let escaped = escape(raw);
    ensure(escaped == r"a\[b\]c\\d", format!("unexpected escape: {escaped}"))?;
    ensure(unescape(&escaped) == raw, "unescape must invert escape")?;
    ensure(unescape(r"\x") == "x", "any escaped character is kept literally")?;
    Ok(())
}
