// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Comment Lexer.
//!
//! A single scan over raw source text that recovers every comment with its
//! exact location, independent of the grammar parser. It understands just
//! enough of the token grammar to not mistake `//` inside a string, char or
//! template literal for a comment.
//!
//! The scan is total: unterminated literals and comments run to the end of
//! the input instead of failing.
//!
//! # Example
//!
//! ```
//! use xapi_lang::ast::CommentKind;
//! use xapi_lang::source_analysis::collect_comments;
//!
//! let comments = collect_comments("/** Doc */ int x; // trailing");
//! assert_eq!(comments.len(), 2);
//! assert_eq!(comments[0].kind(), CommentKind::Doc);
//! assert_eq!(comments[1].content(), " trailing");
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ast::{Comment, CommentKind};

use super::{LineIndex, Span};

/// Yields the comments of a source text in order of appearance.
pub struct CommentLexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    index: LineIndex,
}

impl std::fmt::Debug for CommentLexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentLexer")
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl<'src> CommentLexer<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            index: LineIndex::new(source),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    /// Skips a string or char literal opened by `quote`. Both end at a
    /// newline.
    fn skip_quoted(&mut self, quote: char) {
        self.advance();
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '\n' => return,
                c if c == quote => return,
                _ => {}
            }
        }
    }

    /// Skips a backtick template. Inside `${...}` braces nest and a backtick
    /// does not close the literal, the same rule the token lexer applies.
    fn skip_template(&mut self) {
        self.advance();
        let mut interpolation_depth = 0usize;
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '$' if self.peek_char() == Some('{') => {
                    self.advance();
                    interpolation_depth += 1;
                }
                '{' if interpolation_depth > 0 => interpolation_depth += 1,
                '}' if interpolation_depth > 0 => interpolation_depth -= 1,
                '`' if interpolation_depth == 0 => return,
                _ => {}
            }
        }
    }

    /// `///` is a line comment whose content starts with `/`.
    fn line_comment(&mut self, start: usize) -> Comment {
        self.advance();
        self.advance();
        let content_start = self.offset();
        while self.peek_char().is_some_and(|c| c != '\n' && c != '\r') {
            self.advance();
        }
        let end = self.offset();
        self.make(CommentKind::Line, start, content_start, end, end)
    }

    fn block_comment(&mut self, start: usize) -> Comment {
        self.advance();
        self.advance();
        // `/**/` is an empty block comment, not an open doc comment
        let kind = if self.peek_char() == Some('*') && self.peek_char_n(1) != Some('/') {
            self.advance();
            CommentKind::Doc
        } else {
            CommentKind::Block
        };
        let content_start = self.offset();
        loop {
            match self.peek_char() {
                None => {
                    let end = self.source.len();
                    return self.make(kind, start, content_start, end, end);
                }
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    let content_end = self.offset();
                    self.advance();
                    self.advance();
                    let end = self.offset();
                    return self.make(kind, start, content_start, content_end, end);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn make(
        &self,
        kind: CommentKind,
        start: usize,
        content_start: usize,
        content_end: usize,
        end: usize,
    ) -> Comment {
        let span = Span::from(start..end);
        let range = self.index.range(self.source, span);
        let content = &self.source[content_start..content_end];
        Comment::new(kind, content.into(), span, range)
    }
}

impl Iterator for CommentLexer<'_> {
    type Item = Comment;

    fn next(&mut self) -> Option<Comment> {
        loop {
            let start = self.offset();
            match self.peek_char()? {
                '`' => self.skip_template(),
                quote @ ('"' | '\'') => self.skip_quoted(quote),
                '/' if self.peek_char_n(1) == Some('/') => return Some(self.line_comment(start)),
                '/' if self.peek_char_n(1) == Some('*') => {
                    return Some(self.block_comment(start));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Collects every comment in `source`, in order of appearance.
#[must_use]
pub fn collect_comments(source: &str) -> Vec<Comment> {
    let comments: Vec<Comment> = CommentLexer::new(source).collect();
    tracing::debug!(count = comments.len(), "collected comments");
    comments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Position;

    fn kinds(source: &str) -> Vec<CommentKind> {
        collect_comments(source).iter().map(Comment::kind).collect()
    }

    #[test]
    fn recognises_all_kinds() {
        assert_eq!(
            kinds("// a\n/* b */\n/** c */\n/// d\n"),
            vec![
                CommentKind::Line,
                CommentKind::Block,
                CommentKind::Doc,
                CommentKind::Line
            ]
        );
    }

    #[test]
    fn triple_slash_is_a_line_comment() {
        let comments = collect_comments("x(); /// note");
        assert_eq!(comments[0].kind(), CommentKind::Line);
        assert_eq!(comments[0].content(), "/ note");
    }

    #[test]
    fn interpolations_do_not_end_a_template() {
        let comments = collect_comments("`a ${ \"`\" } b` // c");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content(), " c");

        let comments = collect_comments("`x ${ f({ k: `in` }) } // not` /* yes */");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind(), CommentKind::Block);
    }

    #[test]
    fn content_excludes_delimiters() {
        let comments = collect_comments("/* block */ // line\n/** doc */");
        assert_eq!(comments[0].content(), " block ");
        assert_eq!(comments[1].content(), " line");
        assert_eq!(comments[2].content(), " doc ");
    }

    #[test]
    fn empty_block_is_not_doc() {
        let comments = collect_comments("/**/ x");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind(), CommentKind::Block);
        assert_eq!(comments[0].content(), "");
    }

    #[test]
    fn positions_are_exact() {
        let comments = collect_comments("int x;\n  // note\n/* a\n b */");
        assert_eq!(comments[0].begin(), Position::new(2, 3));
        assert_eq!(comments[0].end(), Position::new(2, 9));
        assert_eq!(comments[1].begin(), Position::new(3, 1));
        assert_eq!(comments[1].end(), Position::new(4, 5));
    }

    #[test]
    fn ignores_comment_markers_in_literals() {
        let source = r#"s = "// no"; c = '/'; t = `/* no */`; // yes"#;
        let comments = collect_comments(source);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content(), " yes");
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let comments = collect_comments(r#"s = "a\"//b"; // c"#);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content(), " c");
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        let comments = collect_comments("x /* open");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content(), " open");
        assert_eq!(comments[0].span(), Span::new(2, 9));
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let comments = collect_comments("\"open\n// found");
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn crlf_line_comment_excludes_carriage_return() {
        let comments = collect_comments("// a\r\nb");
        assert_eq!(comments[0].content(), " a");
    }

    #[test]
    fn lexing_is_deterministic() {
        let source = "/** x */ class A { // y\n int z; /* w */ }";
        assert_eq!(collect_comments(source), collect_comments(source));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics_and_spans_are_ordered(source in "\\PC{0,200}") {
            let comments = collect_comments(&source);
            let mut last_end = 0;
            for comment in &comments {
                prop_assert!(comment.span().start() >= last_end);
                prop_assert!(comment.span().end() as usize <= source.len());
                last_end = comment.span().end();
            }
        }

        #[test]
        fn finds_each_line_comment(lines in prop::collection::vec("[a-z ]{0,10}", 0..10)) {
            let source: String = lines.iter().map(|l| format!("x; //{l}\n")).collect();
            let comments = collect_comments(&source);
            prop_assert_eq!(comments.len(), lines.len());
            for (comment, line) in comments.iter().zip(&lines) {
                prop_assert_eq!(comment.content(), line.as_str());
            }
        }
    }
}
