// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

use ecow::EcoString;

use super::{SchemaCompilationError, SchemaErrorKind};
use crate::ast::{NodeId, SyntaxTree};

/// A parsed definition document: a tree whose root is a tag container.
#[derive(Debug, Clone, Copy)]
pub struct DslModel<'tree> {
    tree: &'tree SyntaxTree,
    root: NodeId,
}

impl<'tree> DslModel<'tree> {
    /// Wraps the root of `tree`.
    pub fn new(tree: &'tree SyntaxTree) -> Result<Self, SchemaCompilationError> {
        Self::at(tree, tree.root())
    }

    /// Wraps the tag container `root` of `tree`.
    pub fn at(tree: &'tree SyntaxTree, root: NodeId) -> Result<Self, SchemaCompilationError> {
        if tree.tag_name(root).is_none() {
            return Err(SchemaCompilationError::at(
                tree,
                root,
                SchemaErrorKind::InvalidDocument(
                    "the root of a definition document must be a tag".into(),
                ),
            ));
        }
        Ok(Self { tree, root })
    }

    #[must_use]
    pub const fn tree(&self) -> &'tree SyntaxTree {
        self.tree
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn tag_name(&self) -> &'tree str {
        self.tree.tag_name(self.root).unwrap_or_default()
    }

    /// The `name` attribute, falling back to the root tag name.
    #[must_use]
    pub fn name(&self) -> EcoString {
        self.tree
            .attribute_string(self.root, "name")
            .unwrap_or_else(|| self.tag_name().into())
    }

    /// The `package` attribute, empty when absent.
    #[must_use]
    pub fn package_name(&self) -> EcoString {
        self.tree
            .attribute_string(self.root, "package")
            .unwrap_or_default()
    }
}
