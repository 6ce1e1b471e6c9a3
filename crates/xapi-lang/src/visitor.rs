// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tree visitors.
//!
//! Two protocols are provided over the closed [`NodeKind`] set:
//!
//! - [`Visitor`] - side-effecting. [`walk`] calls [`Visitor::enter`] before a
//!   node's children and [`Visitor::leave`] after them, passing the path of
//!   ancestor ids. Returning [`Walk::SkipChildren`] from `enter` prunes the
//!   subtree.
//! - [`GenericVisitor`] - value-returning. The implementation decides, by
//!   matching on the node's kind, whether to recurse
//!   ([`visit_children`]) and how to combine the results.
//!
//! Nodes only forward to their children; all interpretation lives in the
//! visitor. For the common "call this on every node" case use
//! [`walk_preorder`].
//!
//! ```
//! use xapi_lang::ast::{NodeKind, SyntaxTree, NodeId};
//! use xapi_lang::source_analysis::{parse, EntryPoint};
//! use xapi_lang::visitor::GenericVisitor;
//!
//! /// Counts the names in an expression.
//! struct Names;
//!
//! impl GenericVisitor for Names {
//!     type Output = usize;
//!
//!     fn visit(&mut self, tree: &SyntaxTree, id: NodeId) -> usize {
//!         let own = usize::from(matches!(tree.kind(id), NodeKind::Name(_)));
//!         own + xapi_lang::visitor::visit_children(self, tree, id).into_iter().sum::<usize>()
//!     }
//! }
//!
//! let tree = parse("a + b * f(c)", EntryPoint::Expression).unwrap();
//! assert_eq!(Names.visit(&tree, tree.root()), 3);
//! ```

use crate::ast::{NodeId, SyntaxTree};

#[cfg(doc)]
use crate::ast::NodeKind;

/// Whether [`walk`] descends into a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Walk {
    #[default]
    Continue,
    SkipChildren,
}

/// A side-effecting visitor driven by [`walk`].
///
/// `path` holds the ids of the ancestors of `id`, outermost first.
pub trait Visitor {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId, path: &[NodeId]) -> Walk {
        let _ = (tree, id, path);
        Walk::Continue
    }

    fn leave(&mut self, tree: &SyntaxTree, id: NodeId, path: &[NodeId]) {
        let _ = (tree, id, path);
    }
}

/// A value-returning visitor.
pub trait GenericVisitor {
    type Output;

    fn visit(&mut self, tree: &SyntaxTree, id: NodeId) -> Self::Output;
}

/// Visits every child of `id` in source order and collects the results.
pub fn visit_children<V>(visitor: &mut V, tree: &SyntaxTree, id: NodeId) -> Vec<V::Output>
where
    V: GenericVisitor + ?Sized,
{
    tree.children(id)
        .into_iter()
        .map(|child| {
            stacker::maybe_grow(32 * 1024, 256 * 1024, || visitor.visit(tree, child))
        })
        .collect()
}

/// Walks the whole tree depth-first from its root.
pub fn walk<V: Visitor + ?Sized>(tree: &SyntaxTree, visitor: &mut V) {
    let mut path = Vec::new();
    walk_node(tree, tree.root(), visitor, &mut path);
}

/// Walks the subtree rooted at `id`. `path` holds its ancestors and is left
/// unchanged on return.
pub fn walk_node<V: Visitor + ?Sized>(
    tree: &SyntaxTree,
    id: NodeId,
    visitor: &mut V,
    path: &mut Vec<NodeId>,
) {
    stacker::maybe_grow(32 * 1024, 256 * 1024, || {
        if visitor.enter(tree, id, path) == Walk::Continue {
            path.push(id);
            for child in tree.children(id) {
                walk_node(tree, child, visitor, path);
            }
            path.pop();
        }
        visitor.leave(tree, id, path);
    });
}

/// Calls `f` on every node in pre-order with its ancestor path.
pub fn walk_preorder<F>(tree: &SyntaxTree, f: F)
where
    F: FnMut(NodeId, &[NodeId]),
{
    struct Preorder<F>(F);

    impl<F: FnMut(NodeId, &[NodeId])> Visitor for Preorder<F> {
        fn enter(&mut self, _tree: &SyntaxTree, id: NodeId, path: &[NodeId]) -> Walk {
            (self.0)(id, path);
            Walk::Continue
        }
    }

    walk(tree, &mut Preorder(f));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::source_analysis::{EntryPoint, parse};

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
        max_depth: usize,
    }

    impl Visitor for Trace {
        fn enter(&mut self, tree: &SyntaxTree, id: NodeId, path: &[NodeId]) -> Walk {
            self.events.push(format!("+{}", tree.kind(id).variant_name()));
            self.max_depth = self.max_depth.max(path.len());
            if matches!(tree.kind(id), NodeKind::MethodCall { .. }) {
                Walk::SkipChildren
            } else {
                Walk::Continue
            }
        }

        fn leave(&mut self, tree: &SyntaxTree, id: NodeId, _path: &[NodeId]) {
            self.events.push(format!("-{}", tree.kind(id).variant_name()));
        }
    }

    #[test]
    fn walk_enters_and_leaves_in_order() {
        let tree = parse("a + f(b)", EntryPoint::Expression).unwrap();
        let mut trace = Trace::default();
        walk(&tree, &mut trace);
        assert_eq!(
            trace.events,
            ["+Binary", "+Name", "-Name", "+MethodCall", "-MethodCall", "-Binary"]
        );
        assert_eq!(trace.max_depth, 1);
    }

    #[test]
    fn preorder_paths_name_ancestors() {
        let tree = parse("<a><b x=1/></a>", EntryPoint::TagContainer).unwrap();
        let mut literal_path = Vec::new();
        walk_preorder(&tree, |id, path| {
            if matches!(tree.kind(id), NodeKind::Literal(_)) {
                literal_path = path
                    .iter()
                    .map(|&ancestor| tree.kind(ancestor).variant_name())
                    .collect();
            }
        });
        assert_eq!(
            literal_path,
            ["UiContainer", "UiBody", "UiContainer", "UiAttribute"]
        );
    }

    struct Depth;

    impl GenericVisitor for Depth {
        type Output = usize;

        fn visit(&mut self, tree: &SyntaxTree, id: NodeId) -> usize {
            1 + visit_children(self, tree, id).into_iter().max().unwrap_or(0)
        }
    }

    #[test]
    fn generic_visitor_combines_results() {
        let tree = parse("a * (b + c)", EntryPoint::Expression).unwrap();
        assert_eq!(Depth.visit(&tree, tree.root()), 4);
    }

    #[test]
    fn deep_left_chains_do_not_overflow() {
        let source = vec!["a"; 20_000].join(" + ");
        let tree = parse(&source, EntryPoint::Expression).unwrap();
        assert_eq!(Depth.visit(&tree, tree.root()), 20_000);
        let mut count = 0;
        walk_preorder(&tree, |_, _| count += 1);
        assert_eq!(count, tree.len());
    }
}
