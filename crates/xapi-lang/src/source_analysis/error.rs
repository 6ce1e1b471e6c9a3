// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse errors.
//!
//! Parsing does not recover: the first lexical or syntactic problem aborts
//! the parse with a [`ParseError`] carrying the offending span and its
//! line/column.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::{LineIndex, Position, Span};

/// A fatal error raised while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind} at {position}")]
#[diagnostic(code(xapi::parse))]
pub struct ParseError {
    #[source]
    pub kind: ParseErrorKind,
    #[label("here")]
    pub span: Span,
    pub position: Position,
}

impl ParseError {
    /// Creates an error at `span`, resolving its position against `source`.
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span, source: &str) -> Self {
        let position = LineIndex::new(source).position(source, span.start());
        Self {
            kind,
            span,
            position,
        }
    }

    /// Creates an error whose position is already known.
    #[must_use]
    pub const fn at(kind: ParseErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }

    /// The human-readable message without the position suffix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated character literal")]
    UnterminatedChar,

    #[error("unterminated template literal")]
    UnterminatedTemplate,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(EcoString),

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: EcoString,
        found: EcoString,
    },

    #[error("unexpected {0} after the end of the input")]
    TrailingInput(EcoString),

    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedClosingTag {
        expected: EcoString,
        found: EcoString,
    },

    #[error("duplicate key '{0}' in json object")]
    DuplicateJsonKey(EcoString),

    #[error("unterminated interpolation in template literal")]
    UnterminatedInterpolation,

    #[error("nesting is too deep (maximum {0} levels)")]
    NestingTooDeep(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_resolves_position() {
        let source = "class A {\n  int x\n}";
        let err = ParseError::new(
            ParseErrorKind::Unexpected {
                expected: "';'".into(),
                found: "'}'".into(),
            },
            Span::new(18, 19),
            source,
        );
        assert_eq!(err.position, Position::new(3, 1));
        assert_eq!(err.to_string(), "expected ';', found '}' at 3:1");
        assert_eq!(err.message(), "expected ';', found '}'");
    }

    #[test]
    fn mismatched_tag_message() {
        let kind = ParseErrorKind::MismatchedClosingTag {
            expected: "one".into(),
            found: "many".into(),
        };
        assert_eq!(kind.to_string(), "closing tag </many> does not match <one>");
    }
}
