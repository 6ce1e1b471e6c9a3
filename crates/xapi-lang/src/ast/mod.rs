// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Syntax tree model.
//!
//! The tree is an arena ([`SyntaxTree`]) of [`Node`]s addressed by
//! [`NodeId`]. Each node holds a [`NodeKind`] (one variant per syntactic
//! form), its byte [`Span`](crate::source_analysis::Span), its 1-based
//! line/column [`Range`](crate::source_analysis::Range), at most one attached
//! [`Comment`] and any number of orphan comments.
//!
//! Trees are produced by the [parser](crate::source_analysis::parse), then
//! mutated once by [`attribute_comments`](crate::attribution::attribute_comments),
//! then read through the [visitors](crate::visitor).

mod comment;
mod node;
mod operators;
mod tree;

pub use comment::{Comment, CommentKind};
pub use node::{Literal, Node, NodeCategory, NodeId, NodeKind};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use tree::SyntaxTree;

pub(crate) use tree::TreeBuilder;
