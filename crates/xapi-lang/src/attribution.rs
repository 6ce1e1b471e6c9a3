// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Comment attribution.
//!
//! Merges the output of the [comment lexer](crate::source_analysis::collect_comments)
//! back into a parsed [`SyntaxTree`]. Every comment ends up either as the
//! single comment of exactly one node or as an orphan of the nearest
//! enclosing node. Comments are moved, never copied.
//!
//! For each node, starting at the root:
//!
//! 1. Comments contained in a child are handed to that child, recursively.
//! 2. A line comment on the line where a child ends goes to that child, or to
//!    the nearest descendant that begins on that line.
//! 3. The remaining comments and the children are merged in begin order; a
//!    pending comment goes to the next child without a comment, unless a
//!    blank line separates them and [`MergeOptions::assign_across_blank_lines`]
//!    is off.
//! 4. Whatever is left becomes an orphan of the node.
//!
//! Before that, the root itself may take a comment: a compilation unit with a
//! package header takes a leading banner, and any other root takes the
//! comment right before it under the same blank-line rule.
//!
//! Ancestry is never stored: the recursion carries it.

use serde::{Deserialize, Serialize};

use crate::ast::{Comment, NodeId, NodeKind, SyntaxTree};
use crate::source_analysis::Position;

/// Policy toggles for [`attribute_comments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MergeOptions {
    /// Attach a comment to the following node even when blank lines separate
    /// them. Off by default: a blank line turns the comment into an orphan.
    pub assign_across_blank_lines: bool,
    /// Treat leading annotations as part of a node when deciding whether a
    /// comment is inside or before it. On by default.
    pub annotations_as_node_start: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            assign_across_blank_lines: false,
            annotations_as_node_start: true,
        }
    }
}

/// Attaches `comments` to the nodes of `tree`.
///
/// `comments` must come from the same source text as `tree`. Their order
/// does not matter.
pub fn attribute_comments(tree: &mut SyntaxTree, comments: Vec<Comment>, options: &MergeOptions) {
    if comments.is_empty() {
        return;
    }
    let total = comments.len();
    let mut pending = comments;
    pending.sort_by_key(Comment::begin);

    let root = tree.root();
    let mut merger = Merger { tree, options };

    // A compilation unit with a package header takes a comment written
    // before everything else, typically a license banner.
    if let NodeKind::CompilationUnit {
        package: Some(_), ..
    } = merger.tree.kind(root)
    {
        let children = merger.children_by_begin(root, false);
        let first_child_begin = children.first().map(|&c| merger.tree.node(c).begin());
        let leads = first_child_begin.is_none_or(|begin| pending[0].begin() <= begin);
        if leads {
            let header = pending.remove(0);
            tracing::trace!(at = %header.begin(), "comment attached to compilation unit");
            merger.tree.node_mut(root).comment = Some(header);
        }
    } else if !matches!(merger.tree.kind(root), NodeKind::CompilationUnit { .. }) {
        merger.attach_leading_to_root(root, &mut pending);
    }

    merger.insert(root, pending);

    let attached = tree.ids().filter(|&id| tree.node(id).has_comment()).count();
    tracing::debug!(
        total,
        attached,
        orphaned = total - attached,
        "attributed comments"
    );
}

struct Merger<'t> {
    tree: &'t mut SyntaxTree,
    options: &'t MergeOptions,
}

/// An entry of the begin-ordered merge of children and comments.
#[derive(Debug, Clone, Copy)]
enum Item {
    Child(NodeId),
    Comment(usize),
}

impl Merger<'_> {
    fn insert(&mut self, node: NodeId, comments: Vec<Comment>) {
        if comments.is_empty() {
            return;
        }
        let children = self.children_by_begin(node, false);

        let mut remaining = comments;
        for &child in &children {
            let (inside, outside): (Vec<_>, Vec<_>) = remaining
                .into_iter()
                .partition(|comment| self.contains(child, comment));
            remaining = outside;
            stacker::maybe_grow(32 * 1024, 256 * 1024, || self.insert(child, inside));
        }

        let begins: Vec<Position> = remaining.iter().map(Comment::begin).collect();
        let mut pending: Vec<Option<Comment>> = remaining.into_iter().map(Some).collect();

        self.attach_trailing_line_comments(&children, &mut pending);
        self.attach_preceding_comments(&children, &begins, &mut pending);

        let orphans: Vec<Comment> = pending.into_iter().flatten().collect();
        if !orphans.is_empty() {
            tracing::trace!(node = %node, count = orphans.len(), "orphan comments");
            self.tree.node_mut(node).orphan_comments.extend(orphans);
        }
    }

    /// Gives a statement, expression or other non-unit root the comment
    /// right before it, as `// doc` in a parsed `// doc\nfoo();`.
    fn attach_leading_to_root(&mut self, root: NodeId, pending: &mut Vec<Comment>) {
        let begin = self.begin(root, !self.options.annotations_as_node_start);
        let Some(i) = pending.iter().rposition(|comment| comment.end() < begin) else {
            return;
        };
        if !self.options.assign_across_blank_lines && self.blank_line_between(&pending[i], root) {
            tracing::trace!(node = %root, "comment separated from root by blank line");
            return;
        }
        let comment = pending.remove(i);
        tracing::trace!(node = %root, at = %comment.begin(), "leading comment on root");
        self.tree.node_mut(root).comment = Some(comment);
    }

    /// `// comment` on the line where a child ends.
    fn attach_trailing_line_comments(
        &mut self,
        children: &[NodeId],
        pending: &mut [Option<Comment>],
    ) {
        for slot in pending.iter_mut() {
            let Some(comment) = slot.as_ref() else {
                continue;
            };
            if !comment.is_line() {
                continue;
            }
            let line = comment.begin().line;
            let target = children
                .iter()
                .filter(|&&child| self.tree.node(child).end().line == line)
                .find_map(|&child| self.line_comment_target(child, line));
            if let Some(target) = target {
                tracing::trace!(node = %target, line, "trailing line comment");
                self.tree.node_mut(target).comment = slot.take();
            }
        }
    }

    /// `node` itself if it begins on `line` and has no comment yet, else the
    /// first such descendant, nearest to the end of the line first.
    fn line_comment_target(&self, node: NodeId, line: u32) -> Option<NodeId> {
        let n = self.tree.node(node);
        if n.begin().line == line && !n.has_comment() {
            return Some(node);
        }
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.children_by_begin(node, false)
                .into_iter()
                .rev()
                .find_map(|child| self.line_comment_target(child, line))
        })
    }

    /// Walks children and comments in begin order, giving each child without
    /// a comment the still-unattached comment right before it.
    fn attach_preceding_comments(
        &mut self,
        children: &[NodeId],
        begins: &[Position],
        pending: &mut [Option<Comment>],
    ) {
        let ignore_annotations = !self.options.annotations_as_node_start;
        let mut items: Vec<(Position, Item)> = children
            .iter()
            .map(|&child| (self.begin(child, ignore_annotations), Item::Child(child)))
            .chain(
                begins
                    .iter()
                    .enumerate()
                    .map(|(i, &begin)| (begin, Item::Comment(i))),
            )
            .collect();
        items.sort_by_key(|&(begin, _)| begin);

        let mut previous: Option<usize> = None;
        for (_, item) in items {
            match item {
                // an already attached comment breaks the chain
                Item::Comment(i) => previous = pending[i].is_some().then_some(i),
                Item::Child(child) => {
                    let Some(i) = previous else {
                        continue;
                    };
                    if self.tree.node(child).has_comment() {
                        continue;
                    }
                    let Some(comment) = pending[i].as_ref() else {
                        continue;
                    };
                    if !self.options.assign_across_blank_lines
                        && self.blank_line_between(comment, child)
                    {
                        tracing::trace!(node = %child, "comment separated by blank line");
                        continue;
                    }
                    tracing::trace!(node = %child, at = %comment.begin(), "leading comment");
                    self.tree.node_mut(child).comment = pending[i].take();
                    previous = None;
                }
            }
        }
    }

    /// Whether at least one line lies between `comment` and `node`,
    /// whichever comes first.
    fn blank_line_between(&self, comment: &Comment, node: NodeId) -> bool {
        let n = self.tree.node(node);
        if comment.begin() <= n.begin() {
            n.begin().line > comment.end().line + 1
        } else {
            comment.begin().line > n.end().line + 1
        }
    }

    fn contains(&self, node: NodeId, comment: &Comment) -> bool {
        let n = self.tree.node(node);
        let begin = self.begin(node, !self.options.annotations_as_node_start);
        begin <= comment.begin() && comment.end() <= n.end()
    }

    fn begin(&self, node: NodeId, ignore_annotations: bool) -> Position {
        let n = self.tree.node(node);
        if ignore_annotations {
            n.begin_without_annotations()
        } else {
            n.begin()
        }
    }

    fn children_by_begin(&self, node: NodeId, ignore_annotations: bool) -> Vec<NodeId> {
        let mut children = self.tree.children(node);
        children.sort_by_key(|&child| self.begin(child, ignore_annotations));
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{EntryPoint, collect_comments, parse, parse_with_comments};

    fn merged(source: &str, entry: EntryPoint, options: &MergeOptions) -> SyntaxTree {
        parse_with_comments(source, entry, options).unwrap()
    }

    /// The node carrying the comment whose content is `content`.
    fn holder(tree: &SyntaxTree, content: &str) -> Option<NodeId> {
        tree.ids().find(|&id| {
            tree.node(id)
                .comment()
                .is_some_and(|comment| comment.content().trim() == content)
        })
    }

    fn orphan_holder(tree: &SyntaxTree, content: &str) -> Option<NodeId> {
        tree.ids().find(|&id| {
            tree.node(id)
                .orphan_comments()
                .iter()
                .any(|comment| comment.content().trim() == content)
        })
    }

    #[test]
    fn default_options() {
        let options = MergeOptions::default();
        assert!(!options.assign_across_blank_lines);
        assert!(options.annotations_as_node_start);
    }

    #[test]
    fn leading_comment_attaches_to_next_statement() {
        let tree = merged("{\n// doc\nfoo();\n}", EntryPoint::Block, &MergeOptions::default());
        let node = holder(&tree, "doc").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::ExpressionStmt { .. }));
    }

    #[test]
    fn blank_line_makes_an_orphan_by_default() {
        let source = "{\n// doc\n\nfoo();\n}";
        let tree = merged(source, EntryPoint::Block, &MergeOptions::default());
        assert_eq!(holder(&tree, "doc"), None);
        assert_eq!(orphan_holder(&tree, "doc"), Some(tree.root()));

        let options = MergeOptions {
            assign_across_blank_lines: true,
            ..MergeOptions::default()
        };
        let tree = merged(source, EntryPoint::Block, &options);
        let node = holder(&tree, "doc").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::ExpressionStmt { .. }));
    }

    #[test]
    fn leading_comment_attaches_to_statement_root() {
        let source = "// doc\n\nfoo();";
        let tree = merged(source, EntryPoint::Statement, &MergeOptions::default());
        assert_eq!(holder(&tree, "doc"), None);
        assert_eq!(orphan_holder(&tree, "doc"), Some(tree.root()));

        let options = MergeOptions {
            assign_across_blank_lines: true,
            ..MergeOptions::default()
        };
        let tree = merged(source, EntryPoint::Statement, &options);
        assert_eq!(holder(&tree, "doc"), Some(tree.root()));
        assert!(matches!(tree.kind(tree.root()), NodeKind::ExpressionStmt { .. }));

        let tree = merged("// a\n// b\nfoo();", EntryPoint::Statement, &MergeOptions::default());
        assert_eq!(holder(&tree, "b"), Some(tree.root()));
        assert_eq!(orphan_holder(&tree, "a"), Some(tree.root()));
    }

    #[test]
    fn triple_slash_trailing_comment_attaches_to_same_line() {
        let tree = merged("{\n  x(); /// note\n}", EntryPoint::Block, &MergeOptions::default());
        let node = holder(&tree, "/ note").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::ExpressionStmt { .. }));
    }

    #[test]
    fn trailing_line_comment_attaches_to_same_line() {
        let tree = merged(
            "{\n  int a = 1; // one\n  int b = 2;\n}",
            EntryPoint::Block,
            &MergeOptions::default(),
        );
        let node = holder(&tree, "one").unwrap();
        assert_eq!(tree.node(node).begin().line, 2);
        assert!(matches!(tree.kind(node), NodeKind::ExpressionStmt { .. }));
    }

    #[test]
    fn trailing_line_comment_falls_back_to_descendant() {
        let tree = merged(
            "{\n  foo(a,\n      b); // tail\n}",
            EntryPoint::Block,
            &MergeOptions::default(),
        );
        // the statement begins a line earlier, `b` is on the comment's line
        let node = holder(&tree, "tail").unwrap();
        assert_eq!(tree.kind(node), &NodeKind::Name("b".into()));
    }

    #[test]
    fn trailing_comment_claims_node_before_leading_comment() {
        let tree = merged(
            "{\n  // lead\n  call(x); // tail\n}",
            EntryPoint::Block,
            &MergeOptions::default(),
        );
        let tail = holder(&tree, "tail").unwrap();
        assert!(matches!(tree.kind(tail), NodeKind::ExpressionStmt { .. }));
        assert_eq!(orphan_holder(&tree, "lead"), Some(tree.root()));
    }

    #[test]
    fn comment_inside_a_child_goes_to_its_descendants() {
        let tree = merged(
            "class A {\n  /** Field doc */\n  int x;\n  void f() {\n    // body\n    g();\n  }\n}",
            EntryPoint::CompilationUnit,
            &MergeOptions::default(),
        );
        let field = holder(&tree, "Field doc").unwrap();
        assert!(matches!(tree.kind(field), NodeKind::FieldDeclaration { .. }));
        let body = holder(&tree, "body").unwrap();
        assert!(matches!(tree.kind(body), NodeKind::ExpressionStmt { .. }));
    }

    #[test]
    fn package_header_comment_goes_to_compilation_unit() {
        let tree = merged(
            "/* license */\npackage a;\nclass B {}",
            EntryPoint::CompilationUnit,
            &MergeOptions::default(),
        );
        assert_eq!(holder(&tree, "license"), Some(tree.root()));
    }

    #[test]
    fn without_package_first_comment_goes_to_type() {
        let tree = merged(
            "/** doc */\nclass B {}",
            EntryPoint::CompilationUnit,
            &MergeOptions::default(),
        );
        let node = holder(&tree, "doc").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::ClassOrInterfaceDeclaration { .. }));
    }

    #[test]
    fn annotations_toggle_changes_containment() {
        let source = "class A {\n  @Inject\n  // between\n  int x;\n}";

        let tree = merged(source, EntryPoint::CompilationUnit, &MergeOptions::default());
        // inside the annotated field, so it precedes the field's type
        let node = holder(&tree, "between").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::PrimitiveType(_)));

        let options = MergeOptions {
            annotations_as_node_start: false,
            ..MergeOptions::default()
        };
        let tree = merged(source, EntryPoint::CompilationUnit, &options);
        let node = holder(&tree, "between").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::FieldDeclaration { .. }));
    }

    #[test]
    fn comments_outside_root_become_root_orphans() {
        let tree = merged("a + b // end", EntryPoint::Expression, &MergeOptions::default());
        // `a` is the first child ending on the comment's line
        let node = holder(&tree, "end").unwrap();
        assert!(matches!(tree.kind(node), NodeKind::Name(_)));

        let tree = merged("x\n\n/* after */", EntryPoint::Expression, &MergeOptions::default());
        assert_eq!(orphan_holder(&tree, "after"), Some(tree.root()));
    }

    #[test]
    fn comments_are_moved_not_copied() {
        let source = "package p;\n// a\nclass A { /* b */ int x; // c\n /** d */ void f() { /* e */ } }\n// f";
        let mut tree = parse(source, EntryPoint::CompilationUnit).unwrap();
        let comments = collect_comments(source);
        let count = comments.len();
        attribute_comments(&mut tree, comments, &MergeOptions::default());
        assert_eq!(tree.comments().count(), count);
    }

    #[test]
    fn merging_is_deterministic() {
        let source = "class A {\n  // x\n  int a; // y\n\n  // z\n}";
        let options = MergeOptions::default();
        assert_eq!(
            merged(source, EntryPoint::CompilationUnit, &options),
            merged(source, EntryPoint::CompilationUnit, &options)
        );
    }
}
