// crates/markup-msg-core/src/lexer.rs
// ============================================================================
// Module: Template Tokenizer
// Description: Lazy lexer for the message-template mini-language.
// Purpose: Split template text into text runs, element openers, and closers.
// Dependencies: crate::error, crate::syntax
// ============================================================================

//! ## Overview
//! [`tokenize`] returns a lazy iterator over [`SpannedToken`]s. The iterator
//! is `Clone`, so a caller can restart it cheaply, and it is fused: after the
//! first error it yields nothing further.
//!
//! Token rules:
//! - **Text**: the longest run of characters that are not a raw `[`, `]` or
//!   an unescaped `\`. Escape pairs (`\[`, `\\`, ...) stay inside the run
//!   verbatim and are only unescaped at render time.
//! - **Open**: `[` followed by one or more ASCII digits and `:`.
//! - **Close**: a lone `]`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::iter::FusedIterator;

use crate::error::SyntaxErrorKind;
use crate::error::TemplateError;
use crate::syntax::CLOSE_ELEMENT;
use crate::syntax::ESCAPE;
use crate::syntax::INDEX_SEPARATOR;
use crate::syntax::OPEN_ELEMENT;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// A lexical unit of a message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, still escaped.
    Text(&'a str),
    /// Start of an element reference carrying its index.
    Open(usize),
    /// End of the innermost open element reference.
    Close,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'a> {
    /// Token value.
    pub token: Token<'a>,
    /// Byte offset of the token's first character.
    pub position: usize,
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Starts tokenizing `template`.
///
/// No work happens until the returned iterator is advanced.
#[must_use]
pub const fn tokenize(template: &str) -> Tokens<'_> {
    Tokens {
        input: template,
        offset: 0,
        failed: false,
    }
}

/// Lazy token stream over a template string.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    /// Template text being tokenized.
    input: &'a str,
    /// Byte offset of the next unread character.
    offset: usize,
    /// Set once an error has been returned.
    failed: bool,
}

impl<'a> Tokens<'a> {
    /// Lexes a text run starting at the current offset.
    fn lex_text(&mut self) -> Result<Token<'a>, TemplateError> {
        let start = self.offset;
        let rest = &self.input[start ..];
        let mut end = rest.len();
        let mut chars = rest.char_indices();
        while let Some((index, ch)) = chars.next() {
            match ch {
                OPEN_ELEMENT | CLOSE_ELEMENT => {
                    end = index;
                    break;
                }
                ESCAPE => {
                    if chars.next().is_none() {
                        return Err(TemplateError::syntax(
                            SyntaxErrorKind::DanglingEscape,
                            start + index,
                        ));
                    }
                }
                _ => {}
            }
        }
        self.offset = start + end;
        Ok(Token::Text(&self.input[start .. self.offset]))
    }

    /// Lexes `[<digits>:` starting at the current offset.
    fn lex_open(&mut self) -> Result<Token<'a>, TemplateError> {
        let start = self.offset;
        let digits_start = start + OPEN_ELEMENT.len_utf8();
        let bytes = self.input.as_bytes();
        let mut digits_end = digits_start;
        while bytes.get(digits_end).is_some_and(u8::is_ascii_digit) {
            digits_end += 1;
        }
        if digits_end == digits_start || bytes.get(digits_end) != Some(&b':') {
            return Err(TemplateError::syntax(SyntaxErrorKind::ExpectedElementIndex, start));
        }
        let index = self.input[digits_start .. digits_end]
            .parse::<usize>()
            .map_err(|_| TemplateError::syntax(SyntaxErrorKind::ElementIndexOverflow, start))?;
        self.offset = digits_end + INDEX_SEPARATOR.len_utf8();
        Ok(Token::Open(index))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<SpannedToken<'a>, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let position = self.offset;
        let first = self.input[position ..].chars().next()?;
        let result = match first {
            OPEN_ELEMENT => self.lex_open(),
            CLOSE_ELEMENT => {
                self.offset += CLOSE_ELEMENT.len_utf8();
                Ok(Token::Close)
            }
            _ => self.lex_text(),
        };
        if result.is_err() {
            self.failed = true;
        }
        Some(result.map(|token| SpannedToken {
            token,
            position,
        }))
    }
}

impl FusedIterator for Tokens<'_> {}
