// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Comments recovered by the [`CommentLexer`](crate::source_analysis::CommentLexer).

use ecow::EcoString;

use crate::source_analysis::{Position, Range, Span};

/// The lexical form of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// text`, including `/// text`
    Line,
    /// `/* text */`
    Block,
    /// `/** text */`
    Doc,
}

impl CommentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Block => "block",
            Self::Doc => "doc",
        }
    }
}

/// A comment with its exact location.
///
/// Comments are immutable. Attribution moves a comment into exactly one slot
/// of one node (its attached comment or one of its orphans); a comment that
/// has not been moved yet is an orphan by definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    kind: CommentKind,
    content: EcoString,
    span: Span,
    range: Range,
}

impl Comment {
    #[must_use]
    pub const fn new(kind: CommentKind, content: EcoString, span: Span, range: Range) -> Self {
        Self {
            kind,
            content,
            span,
            range,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CommentKind {
        self.kind
    }

    /// Text between the delimiters.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub const fn begin(&self) -> Position {
        self.range.begin
    }

    #[must_use]
    pub const fn end(&self) -> Position {
        self.range.end
    }

    #[must_use]
    pub const fn is_line(&self) -> bool {
        matches!(self.kind, CommentKind::Line)
    }
}
