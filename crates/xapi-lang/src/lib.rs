// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! xapi language front end.
//!
//! This crate contains:
//! - Lexical analysis and parsing of the Java-like grammar with its markup
//!   extensions (tags, json containers, templates)
//! - The comment lexer and the comment attribution merger
//! - Tree visitors
//! - Template literal dedent
//! - The schema compiler for definition documents
//!
//! ```
//! use xapi_lang::attribution::MergeOptions;
//! use xapi_lang::source_analysis::{parse_with_comments, EntryPoint};
//!
//! let source = "class A {\n  // the answer\n  int x = 42;\n}";
//! let tree = parse_with_comments(source, EntryPoint::CompilationUnit, &MergeOptions::default())
//!     .unwrap();
//! let attached: Vec<_> = tree.comments().map(|c| c.content().trim().to_string()).collect();
//! assert_eq!(attached, ["the answer"]);
//! ```

pub mod ast;
pub mod attribution;
pub mod config;
pub mod schema;
pub mod source_analysis;
pub mod template;
pub mod visitor;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Comment, NodeId, NodeKind, SyntaxTree};
    pub use crate::attribution::MergeOptions;
    pub use crate::schema::{DslModel, Schema, compile_schema};
    pub use crate::source_analysis::{EntryPoint, ParseError, Span, parse, parse_with_comments};
}
