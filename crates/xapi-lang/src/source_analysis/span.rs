// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte-offset source ranges.
//!
//! Tokens, nodes and comments all carry a [`Span`]. Line/column positions are
//! derived from spans through a [`LineIndex`](super::LineIndex) when needed.

use std::ops::Range;

/// A half-open byte range `[start, end)` into the source text.
///
/// ```
/// use xapi_lang::source_analysis::Span;
///
/// let outer = Span::new(0, 10);
/// assert!(outer.contains(Span::new(2, 4)));
/// assert_eq!(outer.merge(Span::new(8, 12)), Span::new(0, 12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    #[must_use]
    pub const fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Shifts both ends by `offset` bytes.
    #[must_use]
    pub const fn offset_by(self, offset: u32) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_is_empty() {
        let span = Span::point(7);
        assert!(span.is_empty());
        assert_eq!(span.start(), 7);
    }

    #[test]
    fn merge_is_order_independent() {
        let a = Span::new(5, 10);
        let b = Span::new(1, 6);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b), Span::new(1, 10));
    }

    #[test]
    fn offset_by_shifts_both_ends() {
        assert_eq!(Span::new(2, 4).offset_by(10), Span::new(12, 14));
    }

    #[test]
    fn into_source_span() {
        let source_span: miette::SourceSpan = Span::new(3, 8).into();
        assert_eq!(source_span.offset(), 3);
        assert_eq!(source_span.len(), 5);
    }
}
