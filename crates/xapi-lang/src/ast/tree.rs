// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The node arena.
//!
//! A [`SyntaxTree`] owns its source text and every node of one parse. Nodes
//! are stored bottom-up: children are always allocated before their parent,
//! so the root is the last node. Ancestry is never stored; algorithms that
//! need it carry a path through their recursion.

use ecow::EcoString;

use super::{Comment, Literal, Node, NodeId, NodeKind};
use crate::source_analysis::{LineIndex, Position, Span};

/// One parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    source: EcoString,
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// The source text `id` was parsed from.
    #[must_use]
    pub fn source_text(&self, id: NodeId) -> &str {
        &self.source[self.node(id).span.as_range()]
    }

    /// Every node id in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0_u32..).zip(&self.nodes).map(|(i, _)| NodeId(i))
    }

    /// Every comment held by the tree, attached ones and orphans alike.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| node.comment.iter().chain(node.orphan_comments.iter()))
    }

    // ── Tag containers ──

    /// The tag name, if `id` is a tag container.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::UiContainer { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The attribute node named `name` on a tag container. The first one wins
    /// when a name is repeated.
    #[must_use]
    pub fn attribute(&self, container: NodeId, name: &str) -> Option<NodeId> {
        let NodeKind::UiContainer { attributes, .. } = self.kind(container) else {
            return None;
        };
        attributes.iter().copied().find(|&attr| {
            matches!(self.kind(attr), NodeKind::UiAttribute { name: n, .. } if n == name)
        })
    }

    /// Whether a tag container carries attribute `name` at all.
    #[must_use]
    pub fn has_attribute(&self, container: NodeId, name: &str) -> bool {
        self.attribute(container, name).is_some()
    }

    /// The value expression of attribute `name`. A bare attribute has none.
    #[must_use]
    pub fn attribute_value(&self, container: NodeId, name: &str) -> Option<NodeId> {
        match self.kind(self.attribute(container, name)?) {
            NodeKind::UiAttribute { value, .. } => *value,
            _ => None,
        }
    }

    /// The string form of attribute `name`. A bare attribute reads as `true`.
    #[must_use]
    pub fn attribute_string(&self, container: NodeId, name: &str) -> Option<EcoString> {
        let attr = self.attribute(container, name)?;
        match self.kind(attr) {
            NodeKind::UiAttribute { value: None, .. } => Some("true".into()),
            NodeKind::UiAttribute {
                value: Some(value), ..
            } => self.string_value(*value),
            _ => None,
        }
    }

    /// Nodes between the opening and closing tag, empty for `<tag/>`.
    #[must_use]
    pub fn body_children(&self, container: NodeId) -> &[NodeId] {
        let NodeKind::UiContainer {
            body: Some(body), ..
        } = self.kind(container)
        else {
            return &[];
        };
        match self.kind(*body) {
            NodeKind::UiBody { children } => children,
            _ => &[],
        }
    }

    // ── Values ──

    /// Reads a simple value as a string: string and char literals (unquoted),
    /// names and dotted names, numbers, booleans, and templates without
    /// interpolations. Anything else yields `None`.
    #[must_use]
    pub fn string_value(&self, id: NodeId) -> Option<EcoString> {
        match self.kind(id) {
            NodeKind::Literal(
                Literal::String(text)
                | Literal::Char(text)
                | Literal::Integer(text)
                | Literal::Long(text)
                | Literal::Double(text),
            )
            | NodeKind::Name(text) => Some(text.clone()),
            NodeKind::Literal(Literal::Boolean(value)) => Some(if *value {
                "true".into()
            } else {
                "false".into()
            }),
            NodeKind::QualifiedName { .. } | NodeKind::FieldAccess { .. } => {
                self.dotted_name(id)
            }
            NodeKind::TemplateLiteral {
                raw,
                interpolations,
            } if interpolations.is_empty() => Some(raw.clone()),
            NodeKind::Enclosed { inner } => self.string_value(*inner),
            _ => None,
        }
    }

    /// `a.b.c` for a chain of names, or `None` if the chain contains anything
    /// but names.
    #[must_use]
    pub fn dotted_name(&self, id: NodeId) -> Option<EcoString> {
        match self.kind(id) {
            NodeKind::Name(name) => Some(name.clone()),
            NodeKind::QualifiedName { qualifier, name }
            | NodeKind::FieldAccess {
                scope: qualifier,
                field: name,
            } => {
                let mut path = self.dotted_name(*qualifier)?;
                path.push('.');
                path.push_str(name);
                Some(path)
            }
            _ => None,
        }
    }

    // ── JSON containers ──

    #[must_use]
    pub fn is_json_object(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::JsonContainer { is_array: false, .. })
    }

    #[must_use]
    pub fn is_json_array(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::JsonContainer { is_array: true, .. })
    }

    /// The pair nodes of a json container.
    #[must_use]
    pub fn json_pairs(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id) {
            NodeKind::JsonContainer { pairs, .. } => Some(pairs),
            _ => None,
        }
    }

    /// The values of a json container, in order.
    #[must_use]
    pub fn json_values(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let pairs = self.json_pairs(id)?;
        Some(
            pairs
                .iter()
                .filter_map(|&pair| match self.kind(pair) {
                    NodeKind::JsonPair { value, .. } => Some(*value),
                    _ => None,
                })
                .collect(),
        )
    }

    /// The key of a map pair as a string.
    #[must_use]
    pub fn json_key_string(&self, pair: NodeId) -> Option<EcoString> {
        match self.kind(pair) {
            NodeKind::JsonPair { key: Some(key), .. } => self.string_value(*key),
            _ => None,
        }
    }

    /// The value of a json pair.
    #[must_use]
    pub fn json_pair_value(&self, pair: NodeId) -> Option<NodeId> {
        match self.kind(pair) {
            NodeKind::JsonPair { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Allocates nodes during a parse and resolves their line/column ranges.
#[derive(Debug)]
pub(crate) struct TreeBuilder<'src> {
    source: &'src str,
    index: LineIndex,
    nodes: Vec<Node>,
}

impl<'src> TreeBuilder<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn source(&self) -> &'src str {
        self.source
    }

    pub(crate) fn position(&self, offset: u32) -> Position {
        self.index.position(self.source, offset)
    }

    pub(crate) fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let range = self.index.range(self.source, span);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a source under 4GB cannot produce 2^32 nodes"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            range,
            unannotated_begin: None,
            comment: None,
            orphan_comments: Vec::new(),
        });
        id
    }

    /// Pushes a node whose leading annotations end before `unannotated_start`.
    pub(crate) fn push_annotated(
        &mut self,
        kind: NodeKind,
        span: Span,
        unannotated_start: Option<u32>,
    ) -> NodeId {
        let begin = unannotated_start.map(|offset| self.position(offset));
        let id = self.push(kind, span);
        self.nodes[id.index()].unannotated_begin = begin;
        id
    }

    pub(crate) fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            source: EcoString::from(self.source),
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> SyntaxTree {
        // <item size="3" flag/>
        let source = "<item size=\"3\" flag/>";
        let mut builder = TreeBuilder::new(source);
        let value = builder.push(
            NodeKind::Literal(Literal::String("3".into())),
            Span::new(11, 14),
        );
        let size = builder.push(
            NodeKind::UiAttribute {
                name: "size".into(),
                value: Some(value),
            },
            Span::new(6, 14),
        );
        let flag = builder.push(
            NodeKind::UiAttribute {
                name: "flag".into(),
                value: None,
            },
            Span::new(15, 19),
        );
        let root = builder.push(
            NodeKind::UiContainer {
                name: "item".into(),
                attributes: vec![size, flag],
                body: None,
            },
            Span::new(0, 21),
        );
        builder.finish(root)
    }

    #[test]
    fn root_is_allocated_last() {
        let tree = small_tree();
        assert_eq!(tree.root().index(), tree.len() - 1);
        assert_eq!(tree.tag_name(tree.root()), Some("item"));
    }

    #[test]
    fn attribute_lookup() {
        let tree = small_tree();
        let root = tree.root();
        assert_eq!(tree.attribute_string(root, "size").as_deref(), Some("3"));
        assert_eq!(tree.attribute_string(root, "flag").as_deref(), Some("true"));
        assert!(tree.attribute_value(root, "flag").is_none());
        assert!(!tree.has_attribute(root, "missing"));
        assert!(tree.body_children(root).is_empty());
    }

    #[test]
    fn ranges_are_resolved_on_push() {
        let tree = small_tree();
        let root = tree.node(tree.root());
        assert_eq!(root.begin(), Position::new(1, 1));
        assert_eq!(root.end(), Position::new(1, 21));
        assert_eq!(tree.source_text(tree.root()), "<item size=\"3\" flag/>");
    }

    #[test]
    fn fresh_tree_has_no_comments() {
        assert_eq!(small_tree().comments().count(), 0);
    }
}
