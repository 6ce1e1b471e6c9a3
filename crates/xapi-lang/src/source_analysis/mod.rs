// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for xapi source text.
//!
//! This module contains the lexer, the comment lexer and the parser.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into [`Token`]s, each carrying its
//! [`Span`]. Comments are skipped by the lexer; the independent
//! [`CommentLexer`] recovers them from the same text so they can be merged
//! back into the tree afterwards.
//!
//! ```
//! use xapi_lang::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("x + 1").unwrap();
//! assert_eq!(tokens.len(), 4); // x, +, 1, EOF
//! assert!(tokens[3].kind().is_eof());
//! ```
//!
//! # Parsing
//!
//! [`parse`] turns source text into a [`SyntaxTree`](crate::ast::SyntaxTree)
//! rooted at the requested [`EntryPoint`]. [`parse_with_comments`] also runs
//! the comment lexer and attributes the comments to the tree.
//!
//! # Error Handling
//!
//! Neither the lexer nor the parser recovers: the first problem is returned
//! as a [`ParseError`] with miette integration.

mod comments;
mod error;
mod lexer;
mod parser;
mod position;
mod span;
mod token;

pub use comments::{CommentLexer, collect_comments};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, lex, lex_range};
pub use parser::{
    EntryPoint, parse, parse_annotation, parse_block, parse_body_declaration,
    parse_compilation_unit, parse_expression, parse_import, parse_json_container, parse_statement,
    parse_tag_container, parse_type, parse_with_comments,
};
pub use position::{LineIndex, Position, Range};
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
