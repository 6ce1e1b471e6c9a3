// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Line/column positions.
//!
//! Comment attribution reasons about lines ("ends on the same line", "a blank
//! line in between"), so every node and comment carries 1-based
//! [`Position`]s alongside its byte [`Span`].

use std::fmt;

use super::Span;

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Inclusive begin/end positions of a construct.
///
/// `end` is the position of the last character, so a single-character token
/// has `begin == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub begin: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// Returns true if `other` begins at or after `self.begin` and ends at or
    /// before `self.end`.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }
}

/// Precomputed line starts for offset-to-position conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "source files over 4GB are not supported"
                )]
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Number of lines, counting a trailing empty line after a final `\n`.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of the character starting at byte `offset`.
    ///
    /// Offsets past the end clamp to the position just after the last
    /// character.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn position(&self, source: &str, offset: u32) -> Position {
        let offset = offset.min(source.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let column = source[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset as usize)
            .count();
        Position::new(line as u32 + 1, column as u32 + 1)
    }

    /// Inclusive range of `span`: begin at its first character, end at its
    /// last. An empty span maps to a single position.
    #[must_use]
    pub fn range(&self, source: &str, span: Span) -> Range {
        let begin = self.position(source, span.start());
        if span.is_empty() {
            return Range::new(begin, begin);
        }
        let last_len = source
            .get(..span.end() as usize)
            .and_then(|prefix| prefix.chars().next_back())
            .map_or(1, char::len_utf8);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a char is at most 4 bytes"
        )]
        let last_start = span.end().saturating_sub(last_len as u32).max(span.start());
        Range::new(begin, self.position(source, last_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let source = "ab\ncd";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source, 0), Position::new(1, 1));
        assert_eq!(index.position(source, 1), Position::new(1, 2));
        assert_eq!(index.position(source, 3), Position::new(2, 1));
        assert_eq!(index.position(source, 4), Position::new(2, 2));
    }

    #[test]
    fn range_end_is_inclusive() {
        let source = "foo();\nbar";
        let index = LineIndex::new(source);
        let range = index.range(source, Span::new(0, 6));
        assert_eq!(range.begin, Position::new(1, 1));
        assert_eq!(range.end, Position::new(1, 6));
    }

    #[test]
    fn range_over_multibyte_characters() {
        let source = "x = \"é\";";
        let index = LineIndex::new(source);
        let range = index.range(source, Span::new(4, 8));
        assert_eq!(range.begin, Position::new(1, 5));
        assert_eq!(range.end, Position::new(1, 7));
    }

    #[test]
    fn range_containment() {
        let outer = Range::new(Position::new(1, 1), Position::new(3, 1));
        let inner = Range::new(Position::new(2, 4), Position::new(2, 9));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn trailing_newline_adds_a_line() {
        assert_eq!(LineIndex::new("a\n").line_count(), 2);
        assert_eq!(LineIndex::new("").line_count(), 1);
    }
}
