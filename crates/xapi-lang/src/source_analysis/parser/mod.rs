// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for xapi source text.
//!
//! The parser turns a token stream into a [`SyntaxTree`] rooted at one of
//! several entry productions (see [`EntryPoint`]).
//!
//! # Design
//!
//! - **No recovery** - the first syntax error aborts the parse
//! - **One tree per call** - nodes live in an arena owned by the tree
//! - **Whole input** - every entry point rejects trailing tokens
//! - **Bounded recursion** - nesting is capped at [`MAX_NESTING_DEPTH`] and
//!   the recursive productions run under `stacker::maybe_grow`
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 10 | `\|\|` | Left |
//! | 20 | `&&` | Left |
//! | 30 | `\|` | Left |
//! | 40 | `^` | Left |
//! | 50 | `&` | Left |
//! | 60 | `==` `!=` | Left |
//! | 70 | `<` `>` `<=` `>=` `instanceof` | Left |
//! | 80 | `<<` `>>` `>>>` | Left |
//! | 90 | `+` `-` | Left |
//! | 100 | `*` `/` `%` | Left |
//!
//! Assignment and the conditional operator sit below the table and are
//! right-associative.
//!
//! # Usage
//!
//! ```
//! use xapi_lang::source_analysis::{parse, EntryPoint};
//! use xapi_lang::ast::NodeKind;
//!
//! let tree = parse("a + b * c", EntryPoint::Expression).unwrap();
//! assert!(matches!(tree.kind(tree.root()), NodeKind::Binary { .. }));
//! ```

use std::fmt;
use std::str::FromStr;

use ecow::EcoString;

use crate::ast::{NodeId, NodeKind, SyntaxTree, TreeBuilder};
use crate::attribution::{MergeOptions, attribute_comments};
use crate::source_analysis::{
    Keyword, ParseError, ParseErrorKind, Span, Token, TokenKind, collect_comments, lex,
};

mod declarations;
mod expressions;
mod markup;
mod statements;
mod types;

#[cfg(test)]
mod property_tests;

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. For left associativity the right binding
/// power is one more than the left.
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    pub(super) left: u8,
    pub(super) right: u8,
}

impl BindingPower {
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

/// Binding power of `instanceof`, which shares the relational level.
pub(super) const INSTANCEOF_POWER: BindingPower = BindingPower::left_assoc(70);

/// Gets the binding power for a binary operator, or `None` if `op` does not
/// continue a binary expression.
pub(super) fn binary_binding_power(op: &str) -> Option<BindingPower> {
    match op {
        "||" => Some(BindingPower::left_assoc(10)),
        "&&" => Some(BindingPower::left_assoc(20)),
        "|" => Some(BindingPower::left_assoc(30)),
        "^" => Some(BindingPower::left_assoc(40)),
        "&" => Some(BindingPower::left_assoc(50)),
        "==" | "!=" => Some(BindingPower::left_assoc(60)),
        "<" | ">" | "<=" | ">=" => Some(INSTANCEOF_POWER),
        "<<" | ">>" | ">>>" => Some(BindingPower::left_assoc(80)),
        "+" | "-" => Some(BindingPower::left_assoc(90)),
        "*" | "/" | "%" => Some(BindingPower::left_assoc(100)),
        _ => None,
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// The top-level production a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    CompilationUnit,
    Block,
    Statement,
    Type,
    Expression,
    Import,
    Annotation,
    BodyDeclaration,
    /// A `<tag ...>` document.
    TagContainer,
    /// A `{...}` or `[...]` document.
    JsonContainer,
}

impl EntryPoint {
    pub const ALL: [Self; 10] = [
        Self::CompilationUnit,
        Self::Block,
        Self::Statement,
        Self::Type,
        Self::Expression,
        Self::Import,
        Self::Annotation,
        Self::BodyDeclaration,
        Self::TagContainer,
        Self::JsonContainer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompilationUnit => "compilation-unit",
            Self::Block => "block",
            Self::Statement => "statement",
            Self::Type => "type",
            Self::Expression => "expression",
            Self::Import => "import",
            Self::Annotation => "annotation",
            Self::BodyDeclaration => "body-declaration",
            Self::TagContainer => "tag",
            Self::JsonContainer => "json",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entry| entry.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown entry point '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Parses `source` from the production named by `entry`.
///
/// # Errors
///
/// Returns the first lexical or syntax error, or
/// [`ParseErrorKind::TrailingInput`] if tokens remain after the production.
pub fn parse(source: &str, entry: EntryPoint) -> Result<SyntaxTree, ParseError> {
    tracing::debug!(entry = %entry, len = source.len(), "parsing");
    let tokens = lex(source)?;
    let mut parser = Parser::new(source, tokens);
    let root = match entry {
        EntryPoint::CompilationUnit => parser.parse_compilation_unit()?,
        EntryPoint::Block => parser.parse_block()?,
        EntryPoint::Statement => parser.parse_statement()?,
        EntryPoint::Type => parser.parse_type_or_void()?,
        EntryPoint::Expression => parser.parse_expression()?,
        EntryPoint::Import => parser.parse_import()?,
        EntryPoint::Annotation => parser.parse_annotation()?,
        EntryPoint::BodyDeclaration => parser.parse_body_declaration()?,
        EntryPoint::TagContainer => parser.parse_tag_container()?,
        EntryPoint::JsonContainer => parser.parse_json_document()?,
    };
    parser.expect_end()?;
    let tree = parser.builder.finish(root);
    tracing::trace!(nodes = tree.len(), "parsed");
    Ok(tree)
}

/// Parses `source` and attributes its comments to the resulting tree.
///
/// # Errors
///
/// Fails exactly when [`parse`] fails; comment collection is total.
pub fn parse_with_comments(
    source: &str,
    entry: EntryPoint,
    options: &MergeOptions,
) -> Result<SyntaxTree, ParseError> {
    let mut tree = parse(source, entry)?;
    let comments = collect_comments(source);
    attribute_comments(&mut tree, comments, options);
    Ok(tree)
}

pub fn parse_compilation_unit(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::CompilationUnit)
}

pub fn parse_block(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Block)
}

pub fn parse_statement(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Statement)
}

pub fn parse_type(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Type)
}

pub fn parse_expression(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Expression)
}

pub fn parse_import(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Import)
}

pub fn parse_annotation(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::Annotation)
}

pub fn parse_body_declaration(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::BodyDeclaration)
}

/// Parses a `<tag ...>` document such as a schema definition.
pub fn parse_tag_container(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::TagContainer)
}

pub fn parse_json_container(source: &str) -> Result<SyntaxTree, ParseError> {
    parse(source, EntryPoint::JsonContainer)
}

// ============================================================================
// Parser state
// ============================================================================

/// Maximum number of open syntactic levels.
///
/// A level is a tag, a JSON container, a statement, an expression operand or
/// a declaration. Productions that start at the same token share one level,
/// so `<a><a></a></a>` is two levels deep however many productions it passes
/// through. `stacker::maybe_grow` at the recursive entry points extends the
/// stack on the heap as a second line of defence.
pub(super) const MAX_NESTING_DEPTH: usize = 64;

/// The parser state.
pub(super) struct Parser<'src> {
    /// The tokens being parsed, ending with EOF.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// Node arena under construction.
    pub(super) builder: TreeBuilder<'src>,
    /// Start offsets of the open nesting levels, innermost last.
    levels: Vec<u32>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            builder: TreeBuilder::new(source),
            levels: Vec::new(),
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// The token at absolute index `index`, clamped to the final EOF token.
    pub(super) fn token_at(&self, index: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }

    pub(super) fn kind_at(&self, index: usize) -> &TokenKind {
        self.token_at(index).kind()
    }

    pub(super) fn current_token(&self) -> &Token {
        self.token_at(self.current)
    }

    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Peeks `offset` tokens past the current one.
    pub(super) fn peek_kind(&self, offset: usize) -> &TokenKind {
        self.kind_at(self.current + offset)
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Byte offset where the current token starts.
    pub(super) fn current_start(&self) -> u32 {
        self.current_token().span().start()
    }

    /// Byte offset where the last consumed token ends.
    pub(super) fn previous_end(&self) -> u32 {
        if self.current == 0 {
            return self.current_start();
        }
        self.tokens[self.current - 1].span().end()
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.previous_end().max(start))
    }

    /// Checks if the current token has the same variant as `kind`.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the same variant as `kind`, or fails naming
    /// `expected`.
    pub(super) fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(super) fn check_operator(&self, op: &str) -> bool {
        self.current_kind().is_operator(op)
    }

    pub(super) fn match_operator(&mut self, op: &str) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_operator(&mut self, op: &str) -> Result<Token, ParseError> {
        if self.check_operator(op) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{op}'")))
        }
    }

    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind().is_keyword(keyword)
    }

    pub(super) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    /// Consumes an identifier and returns its text.
    pub(super) fn expect_identifier(&mut self, expected: &str) -> Result<EcoString, ParseError> {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Returns true if the token at `index` starts exactly where the token
    /// before it ends.
    pub(super) fn is_adjacent(&self, index: usize) -> bool {
        index > 0 && self.token_at(index - 1).span().end() == self.token_at(index).span().start()
    }

    /// The operator at the current token and how many tokens it spans.
    ///
    /// `>` is lexed one character at a time so that `List<List<T>>` closes
    /// two type argument lists; here adjacent `>` and `=` tokens are glued
    /// back into `>=`, `>>`, `>>>`, `>>=` and `>>>=`.
    pub(super) fn current_operator(&self) -> Option<(EcoString, usize)> {
        let TokenKind::Operator(op) = self.current_kind() else {
            return None;
        };
        if op != ">" {
            return Some((op.clone(), 1));
        }
        let mut glued = EcoString::from(">");
        let mut count = 1;
        while count < 3
            && self.peek_kind(count).is_operator(">")
            && self.is_adjacent(self.current + count)
        {
            glued.push('>');
            count += 1;
        }
        if self.peek_kind(count).is_operator("=") && self.is_adjacent(self.current + count) {
            glued.push('=');
            count += 1;
        }
        Some((glued, count))
    }

    /// Consumes `count` tokens.
    pub(super) fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    // ========================================================================
    // Errors and nesting
    // ========================================================================

    pub(super) fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::at(kind, span, self.builder.position(span.start()))
    }

    /// An error for the current token, which is not what `expected` names.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current_token();
        self.error(
            ParseErrorKind::Unexpected {
                expected: expected.into(),
                found: token.kind().to_string().into(),
            },
            token.span(),
        )
    }

    /// Fails unless all input has been consumed.
    fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            return Ok(());
        }
        let token = self.current_token();
        Err(self.error(
            ParseErrorKind::TrailingInput(token.kind().to_string().into()),
            token.span(),
        ))
    }

    fn enter_nesting(&mut self, start: u32) -> Result<(), ParseError> {
        if self.levels.len() >= MAX_NESTING_DEPTH {
            return Err(self.error(
                ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                self.current_token().span(),
            ));
        }
        self.levels.push(start);
        Ok(())
    }

    fn leave_nesting(&mut self) {
        debug_assert!(
            !self.levels.is_empty(),
            "leave_nesting called without matching enter_nesting"
        );
        self.levels.pop();
    }

    /// Runs a recursive production one nesting level deeper, unless the
    /// innermost level already starts at the current token.
    ///
    /// 32 KiB red zone, 256 KiB new segment: the depth guard caps recursion
    /// so few segments are ever needed.
    pub(super) fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            let start = self.current_start();
            if self.levels.last() == Some(&start) {
                return production(self);
            }
            self.enter_nesting(start)?;
            let result = production(self);
            self.leave_nesting();
            result
        })
    }

    /// Runs a production under the stack guard without opening a level.
    ///
    /// For productions whose recursion always passes back through
    /// [`Parser::nested`], such as a block through its statements.
    pub(super) fn guarded<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || production(self))
    }

    // ========================================================================
    // Node allocation
    // ========================================================================

    pub(super) fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.builder.push(kind, span)
    }

    /// Allocates a node spanning from `start` to the last consumed token.
    pub(super) fn push_from(&mut self, kind: NodeKind, start: u32) -> NodeId {
        let span = self.span_from(start);
        self.builder.push(kind, span)
    }

    pub(super) fn node_span(&self, id: NodeId) -> Span {
        self.builder.span(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Literal};
    use crate::source_analysis::Position;

    /// Helper to parse a string and assert success.
    pub(super) fn parse_ok(source: &str, entry: EntryPoint) -> SyntaxTree {
        match parse(source, entry) {
            Ok(tree) => tree,
            Err(err) => panic!("expected {source:?} to parse as {entry}, got: {err}"),
        }
    }

    /// Helper to parse a string expecting an error.
    pub(super) fn parse_err(source: &str, entry: EntryPoint) -> ParseError {
        match parse(source, entry) {
            Ok(tree) => panic!("expected {source:?} to fail, got {:?}", tree.kind(tree.root())),
            Err(err) => err,
        }
    }

    #[test]
    fn entry_point_names_round_trip() {
        for entry in EntryPoint::ALL {
            assert_eq!(entry.as_str().parse::<EntryPoint>(), Ok(entry));
        }
        assert!("module".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn pratt_precedence_mul_over_add() {
        let tree = parse_ok("1 + 2 * 3", EntryPoint::Expression);
        let NodeKind::Binary { op, right, .. } = tree.kind(tree.root()) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Plus);
        assert!(matches!(
            tree.kind(*right),
            NodeKind::Binary {
                op: BinaryOp::Times,
                ..
            }
        ));
    }

    #[test]
    fn pratt_left_associativity() {
        let tree = parse_ok("a - b - c", EntryPoint::Expression);
        let NodeKind::Binary { left, .. } = tree.kind(tree.root()) else {
            panic!("expected binary");
        };
        assert!(matches!(
            tree.kind(*left),
            NodeKind::Binary {
                op: BinaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn glued_shift_operators() {
        for (source, expected) in [
            ("a >> 1", BinaryOp::SignedRightShift),
            ("a >>> 1", BinaryOp::UnsignedRightShift),
            ("a >= 1", BinaryOp::GreaterEquals),
            ("a > 1", BinaryOp::Greater),
        ] {
            let tree = parse_ok(source, EntryPoint::Expression);
            assert!(
                matches!(tree.kind(tree.root()), NodeKind::Binary { op, .. } if *op == expected),
                "{source}"
            );
        }
    }

    #[test]
    fn spaced_greater_than_is_not_glued() {
        parse_err("a > > 1", EntryPoint::Expression);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse_err("a + b c", EntryPoint::Expression);
        assert!(matches!(err.kind, ParseErrorKind::TrailingInput(_)));
        assert_eq!(err.position, Position::new(1, 7));
    }

    #[test]
    fn every_entry_point_accepts_its_production() {
        let cases = [
            (EntryPoint::CompilationUnit, "package a.b; import c.D; class E {}"),
            (EntryPoint::Block, "{ int x = 1; }"),
            (EntryPoint::Statement, "return;"),
            (EntryPoint::Type, "java.util.Map<String, int[]>"),
            (EntryPoint::Expression, "x.y(1)"),
            (EntryPoint::Import, "import static a.b.*;"),
            (EntryPoint::Annotation, "@Named(\"x\")"),
            (EntryPoint::BodyDeclaration, "private int x;"),
            (EntryPoint::TagContainer, "<a b=1/>"),
            (EntryPoint::JsonContainer, "{ a: 1 }"),
        ];
        for (entry, source) in cases {
            parse_ok(source, entry);
        }
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let source = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        let err = parse_err(&source, EntryPoint::Expression);
        assert!(matches!(err.kind, ParseErrorKind::NestingTooDeep(_)));
    }

    #[test]
    fn sixty_nested_tags_parse() {
        let source = format!("{}{}", "<a>".repeat(60), "</a>".repeat(60));
        parse_ok(&source, EntryPoint::TagContainer);
    }

    #[test]
    fn sixty_nested_json_arrays_parse() {
        let source = format!("{}{}", "[".repeat(60), "]".repeat(60));
        parse_ok(&source, EntryPoint::JsonContainer);
    }

    #[test]
    fn forty_nested_blocks_parse() {
        let source = format!("{}{}", "{ ".repeat(40), "} ".repeat(40));
        parse_ok(&source, EntryPoint::Block);
    }

    #[test]
    fn nested_ifs_in_a_method_parse() {
        let depth = 25;
        let source = format!(
            "void m() {{ {}{} }}",
            "if (a > b) { ".repeat(depth),
            "} ".repeat(depth)
        );
        parse_ok(&source, EntryPoint::BodyDeclaration);
    }

    #[test]
    fn nesting_cap_still_applies_to_tags() {
        let source = format!("{}{}", "<a>".repeat(100), "</a>".repeat(100));
        let err = parse_err(&source, EntryPoint::TagContainer);
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH));
    }

    #[test]
    fn lex_errors_surface_as_parse_errors() {
        let err = parse_err("\"open", EntryPoint::Expression);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn empty_compilation_unit() {
        let tree = parse_ok("", EntryPoint::CompilationUnit);
        assert!(matches!(
            tree.kind(tree.root()),
            NodeKind::CompilationUnit { package: None, .. }
        ));
    }

    #[test]
    fn literal_values_keep_spelling() {
        let tree = parse_ok("0x1F", EntryPoint::Expression);
        assert_eq!(
            tree.kind(tree.root()),
            &NodeKind::Literal(Literal::Integer("0x1F".into()))
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "class A { void m() { if (a) { b(); } else c = d ? e : f; } }";
        assert_eq!(
            parse_ok(source, EntryPoint::CompilationUnit),
            parse_ok(source, EntryPoint::CompilationUnit)
        );
    }
}
