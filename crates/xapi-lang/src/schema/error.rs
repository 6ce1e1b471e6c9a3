// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Schema compilation errors.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::ast::{NodeId, SyntaxTree};
use crate::source_analysis::Span;

/// A fatal error raised while compiling a definition document.
///
/// The span points at the node that caused the failure, so the error can be
/// rendered against the document's source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(xapi::schema))]
pub struct SchemaCompilationError {
    #[source]
    pub kind: SchemaErrorKind,
    #[label("here")]
    pub span: Span,
}

impl SchemaCompilationError {
    #[must_use]
    pub const fn new(kind: SchemaErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// An error located at `node`.
    #[must_use]
    pub fn at(tree: &SyntaxTree, node: NodeId, kind: SchemaErrorKind) -> Self {
        Self::new(kind, tree.node(node).span())
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaErrorKind {
    #[error("<{tag}> is missing the {attribute}= attribute")]
    MissingAttribute {
        tag: EcoString,
        attribute: EcoString,
    },

    #[error("attribute {attribute} must not be empty on <{tag}>")]
    EmptyAttribute {
        tag: EcoString,
        attribute: EcoString,
    },

    #[error("{context} must be a json {expected}; got: {found}")]
    WrongShape {
        context: EcoString,
        expected: &'static str,
        found: EcoString,
    },

    #[error("duplicate element-def for '{0}'")]
    DuplicateElement(EcoString),

    #[error("duplicate child tag '{child}' in element-def '{element}'")]
    DuplicateChildTag { child: EcoString, element: EcoString },

    #[error("duplicate attribute '{attribute}' in {owner}")]
    DuplicateAttribute {
        attribute: EcoString,
        owner: EcoString,
    },

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("rootTag='{root_tag}' does not match any element-def; defined: [{}]", .defined.join(", "))]
    UnknownRootTag {
        root_tag: EcoString,
        defined: Vec<EcoString>,
    },

    #[error("conflicting required= for {0}")]
    ConflictingRequired(EcoString),

    #[error("conflicting default= presence for {0}")]
    ConflictingDefault(EcoString),

    #[error("conflicting type for {context}: {existing} vs {incoming}")]
    ConflictingType {
        context: EcoString,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("unknown type name '{0}'")]
    UnknownType(EcoString),

    #[error("unknown type tag <{0}>")]
    UnknownTypeTag(EcoString),

    #[error("unsupported type expression: {0}")]
    UnsupportedTypeExpression(EcoString),

    #[error("{0}")]
    BadTypeArguments(EcoString),

    #[error("invalid definition document: {0}")]
    InvalidDocument(EcoString),
}
