// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the [`Lexer`](super::Lexer).
//!
//! Comments never appear in the token stream: the grammar lexer skips them
//! and the [`CommentLexer`](super::CommentLexer) recovers them in a separate
//! pass over the same text.
//!
//! `>` is always lexed on its own. The parser glues adjacent `>` and `=`
//! tokens into `>=`, `>>`, `>>>` and their compound assignments, which keeps
//! nested type arguments such as `Map<K, List<V>>` unambiguous.

use std::fmt;

use ecow::EcoString;

use super::Span;

/// Reserved words of the general-purpose grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    False,
    Final,
    Finally,
    Float,
    For,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Null,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    True,
    Try,
    Void,
    Volatile,
    While,
}

impl Keyword {
    /// Looks up the keyword spelled `text`, if any.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        let keyword = match text {
            "abstract" => Self::Abstract,
            "assert" => Self::Assert,
            "boolean" => Self::Boolean,
            "break" => Self::Break,
            "byte" => Self::Byte,
            "case" => Self::Case,
            "catch" => Self::Catch,
            "char" => Self::Char,
            "class" => Self::Class,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "do" => Self::Do,
            "double" => Self::Double,
            "else" => Self::Else,
            "enum" => Self::Enum,
            "extends" => Self::Extends,
            "false" => Self::False,
            "final" => Self::Final,
            "finally" => Self::Finally,
            "float" => Self::Float,
            "for" => Self::For,
            "if" => Self::If,
            "implements" => Self::Implements,
            "import" => Self::Import,
            "instanceof" => Self::Instanceof,
            "int" => Self::Int,
            "interface" => Self::Interface,
            "long" => Self::Long,
            "native" => Self::Native,
            "new" => Self::New,
            "null" => Self::Null,
            "package" => Self::Package,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "public" => Self::Public,
            "return" => Self::Return,
            "short" => Self::Short,
            "static" => Self::Static,
            "strictfp" => Self::Strictfp,
            "super" => Self::Super,
            "switch" => Self::Switch,
            "synchronized" => Self::Synchronized,
            "this" => Self::This,
            "throw" => Self::Throw,
            "throws" => Self::Throws,
            "transient" => Self::Transient,
            "true" => Self::True,
            "try" => Self::Try,
            "void" => Self::Void,
            "volatile" => Self::Volatile,
            "while" => Self::While,
            _ => return None,
        };
        Some(keyword)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Assert => "assert",
            Self::Boolean => "boolean",
            Self::Break => "break",
            Self::Byte => "byte",
            Self::Case => "case",
            Self::Catch => "catch",
            Self::Char => "char",
            Self::Class => "class",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Do => "do",
            Self::Double => "double",
            Self::Else => "else",
            Self::Enum => "enum",
            Self::Extends => "extends",
            Self::False => "false",
            Self::Final => "final",
            Self::Finally => "finally",
            Self::Float => "float",
            Self::For => "for",
            Self::If => "if",
            Self::Implements => "implements",
            Self::Import => "import",
            Self::Instanceof => "instanceof",
            Self::Int => "int",
            Self::Interface => "interface",
            Self::Long => "long",
            Self::Native => "native",
            Self::New => "new",
            Self::Null => "null",
            Self::Package => "package",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
            Self::Return => "return",
            Self::Short => "short",
            Self::Static => "static",
            Self::Strictfp => "strictfp",
            Self::Super => "super",
            Self::Switch => "switch",
            Self::Synchronized => "synchronized",
            Self::This => "this",
            Self::Throw => "throw",
            Self::Throws => "throws",
            Self::Transient => "transient",
            Self::True => "true",
            Self::Try => "try",
            Self::Void => "void",
            Self::Volatile => "volatile",
            Self::While => "while",
        }
    }

    /// Primitive type names (`int`, `boolean`, ...), excluding `void`.
    #[must_use]
    pub const fn is_primitive_type(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Byte
                | Self::Char
                | Self::Double
                | Self::Float
                | Self::Int
                | Self::Long
                | Self::Short
        )
    }

    /// Declaration modifiers (`public`, `static`, `final`, ...).
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Abstract
                | Self::Final
                | Self::Native
                | Self::Private
                | Self::Protected
                | Self::Public
                | Self::Static
                | Self::Strictfp
                | Self::Synchronized
                | Self::Transient
                | Self::Volatile
                | Self::Default
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token, without its location.
///
/// Literal payloads keep the exact source spelling (escapes included) so the
/// tree can reproduce the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Words ===
    /// An identifier: `foo`, `element`, `_tmp$1`
    Identifier(EcoString),

    /// A reserved word: `class`, `int`, `true`
    Keyword(Keyword),

    // === Literals ===
    /// An integer literal: `42`, `0x1F`, `0b101`
    Integer(EcoString),

    /// A long literal, suffix included: `42L`
    Long(EcoString),

    /// A floating-point literal: `3.14`, `1e10`, `2f`
    Floating(EcoString),

    /// A character literal without its quotes: `a` in `'a'`
    Char(EcoString),

    /// A string literal without its quotes: `hi\n` in `"hi\n"`
    String(EcoString),

    /// A template literal without its backticks.
    Template(EcoString),

    // === Delimiters ===
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // === Punctuation ===
    Semicolon,
    Comma,
    Dot,
    /// `...`
    Ellipsis,
    /// `@`
    At,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `->`
    Arrow,

    /// Any operator, including `=` and compound assignments. `>` is always a
    /// single-character operator token.
    Operator(EcoString),

    /// End of input.
    Eof,
}

impl TokenKind {
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_)
                | Self::Long(_)
                | Self::Floating(_)
                | Self::Char(_)
                | Self::String(_)
                | Self::Template(_)
                | Self::Keyword(Keyword::True | Keyword::False | Keyword::Null)
        )
    }

    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns true if this is the operator `op`.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self, Self::Operator(o) if o == op)
    }

    /// Returns true if this is the keyword `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    /// Identifier or keyword text. Tag and attribute names accept both, so
    /// `<enum values=[...]/>` and `default=` are legal.
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            Self::Keyword(keyword) => Some(keyword.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::Integer(s)
            | Self::Long(s)
            | Self::Floating(s)
            | Self::Operator(s) => write!(f, "'{s}'"),
            Self::Keyword(k) => write!(f, "'{k}'"),
            Self::Char(s) => write!(f, "'{s}' character literal"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Template(_) => write!(f, "template literal"),
            Self::LeftParen => write!(f, "'('"),
            Self::RightParen => write!(f, "')'"),
            Self::LeftBrace => write!(f, "'{{'"),
            Self::RightBrace => write!(f, "'}}'"),
            Self::LeftBracket => write!(f, "'['"),
            Self::RightBracket => write!(f, "']'"),
            Self::Semicolon => write!(f, "';'"),
            Self::Comma => write!(f, "','"),
            Self::Dot => write!(f, "'.'"),
            Self::Ellipsis => write!(f, "'...'"),
            Self::At => write!(f, "'@'"),
            Self::Question => write!(f, "'?'"),
            Self::Colon => write!(f, "':'"),
            Self::DoubleColon => write!(f, "'::'"),
            Self::Arrow => write!(f, "'->'"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the same token shifted by `offset` bytes.
    #[must_use]
    pub fn offset_by(self, offset: u32) -> Self {
        Self {
            span: self.span.offset_by(offset),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_round_trips() {
        for text in ["class", "int", "instanceof", "synchronized", "null"] {
            let keyword = Keyword::from_text(text).unwrap();
            assert_eq!(keyword.as_str(), text);
        }
        assert_eq!(Keyword::from_text("element"), None);
    }

    #[test]
    fn primitive_and_modifier_classification() {
        assert!(Keyword::Int.is_primitive_type());
        assert!(!Keyword::Void.is_primitive_type());
        assert!(Keyword::Static.is_modifier());
        assert!(!Keyword::Class.is_modifier());
    }

    #[test]
    fn word_accepts_identifiers_and_keywords() {
        assert_eq!(TokenKind::Identifier("size".into()).word(), Some("size"));
        assert_eq!(TokenKind::Keyword(Keyword::Enum).word(), Some("enum"));
        assert_eq!(TokenKind::Comma.word(), None);
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(TokenKind::Operator(">".into()).to_string(), "'>'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
