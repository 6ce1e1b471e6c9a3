// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `xapi parse`: Parse a file and print its syntax tree.
//!
//! Comments are attributed before printing, so the dump shows which node
//! each comment ended up on and which ones were left as orphans.

use std::fmt::Write as _;

use camino::Utf8Path;
use miette::Result;
use serde_json::{Value, json};
use xapi_lang::ast::{Comment, Literal, Node, NodeId, NodeKind, SyntaxTree};
use xapi_lang::source_analysis::{EntryPoint, parse_with_comments};
use xapi_lang::visitor::{GenericVisitor, Visitor, Walk, visit_children, walk};

use super::{CommentFlags, OutputFormat, merge_options, read_source};
use crate::diagnostic::with_source;

/// Parse `path` from `entry` and print the tree.
pub fn run(
    path: &Utf8Path,
    entry: EntryPoint,
    format: OutputFormat,
    config: Option<&Utf8Path>,
    flags: CommentFlags,
) -> Result<()> {
    let source = read_source(path)?;
    let options = merge_options(path, config, flags)?;
    let tree = parse_with_comments(&source, entry, &options)
        .map_err(|err| with_source(err, path, &source))?;

    match format {
        OutputFormat::Text => print!("{}", dump_text(&tree)),
        OutputFormat::Json => println!("{}", JsonTree.visit(&tree, tree.root())),
    }
    Ok(())
}

/// A short label: the variant plus the name it declares or uses, if any.
fn node_label(kind: &NodeKind) -> String {
    let detail: Option<String> = match kind {
        NodeKind::Name(name)
        | NodeKind::QualifiedName { name, .. }
        | NodeKind::ClassOrInterfaceDeclaration { name, .. }
        | NodeKind::EnumDeclaration { name, .. }
        | NodeKind::EnumConstantDeclaration { name, .. }
        | NodeKind::MethodDeclaration { name, .. }
        | NodeKind::ConstructorDeclaration { name, .. }
        | NodeKind::Parameter { name, .. }
        | NodeKind::TypeParameter { name, .. }
        | NodeKind::VariableDeclarator { name, .. }
        | NodeKind::ClassOrInterfaceType { name, .. }
        | NodeKind::MethodCall { name, .. }
        | NodeKind::MemberValuePair { name, .. }
        | NodeKind::UiAttribute { name, .. } => Some(name.to_string()),
        NodeKind::FieldAccess { field, .. } => Some(field.to_string()),
        NodeKind::UiContainer { name, .. } => Some(format!("<{name}>")),
        NodeKind::PrimitiveType(keyword) => Some(keyword.to_string()),
        NodeKind::Binary { op, .. } => Some(op.to_string()),
        NodeKind::Unary { op, .. } => Some(op.to_string()),
        NodeKind::Assign { op, .. } => Some(op.to_string()),
        NodeKind::Literal(literal) => Some(match literal {
            Literal::String(text) => format!("{text:?}"),
            Literal::Char(text) => format!("'{text}'"),
            Literal::Integer(text) | Literal::Long(text) | Literal::Double(text) => {
                text.to_string()
            }
            Literal::Boolean(value) => value.to_string(),
            Literal::Null => "null".to_string(),
        }),
        _ => None,
    };
    match detail {
        Some(detail) => format!("{} {detail}", kind.variant_name()),
        None => kind.variant_name().to_string(),
    }
}

fn comment_line(comment: &Comment) -> String {
    format!(
        "{} comment {} {:?}",
        comment.kind().as_str(),
        comment.begin(),
        comment.content().trim()
    )
}

// ============================================================================
// Text dump
// ============================================================================

/// Renders one line per node, indented by depth, with its comments below.
struct TreeDump {
    out: String,
}

impl Visitor for TreeDump {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId, path: &[NodeId]) -> Walk {
        let node = tree.node(id);
        let indent = "  ".repeat(path.len());
        let _ = writeln!(
            self.out,
            "{indent}{} {}-{}",
            node_label(node.kind()),
            node.begin(),
            node.end()
        );
        if let Some(comment) = node.comment() {
            let _ = writeln!(self.out, "{indent}  = {}", comment_line(comment));
        }
        Walk::Continue
    }

    fn leave(&mut self, tree: &SyntaxTree, id: NodeId, path: &[NodeId]) {
        let indent = "  ".repeat(path.len());
        for orphan in tree.node(id).orphan_comments() {
            let _ = writeln!(self.out, "{indent}  ~ {}", comment_line(orphan));
        }
    }
}

fn dump_text(tree: &SyntaxTree) -> String {
    let mut dump = TreeDump { out: String::new() };
    walk(tree, &mut dump);
    dump.out
}

// ============================================================================
// JSON dump
// ============================================================================

fn comment_json(comment: &Comment) -> Value {
    json!({
        "kind": comment.kind().as_str(),
        "content": comment.content(),
        "begin": comment.begin().to_string(),
        "end": comment.end().to_string(),
    })
}

fn node_json(node: &Node, children: Vec<Value>) -> Value {
    json!({
        "node": node_label(node.kind()),
        "begin": node.begin().to_string(),
        "end": node.end().to_string(),
        "comment": node.comment().map(comment_json),
        "orphans": node.orphan_comments().iter().map(comment_json).collect::<Vec<_>>(),
        "children": children,
    })
}

struct JsonTree;

impl GenericVisitor for JsonTree {
    type Output = Value;

    fn visit(&mut self, tree: &SyntaxTree, id: NodeId) -> Value {
        let children = visit_children(self, tree, id);
        node_json(tree.node(id), children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xapi_lang::attribution::MergeOptions;

    fn tree(source: &str, entry: EntryPoint) -> SyntaxTree {
        parse_with_comments(source, entry, &MergeOptions::default()).unwrap()
    }

    #[test]
    fn test_text_dump_shows_nesting_and_comments() {
        let tree = tree("{\n  // call it\n  foo(1);\n}", EntryPoint::Block);
        let dump = dump_text(&tree);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "Block 1:1-4:1");
        assert_eq!(lines[1], "  ExpressionStmt 3:3-3:9");
        assert_eq!(lines[2], "    = line comment 2:3 \"call it\"");
        assert_eq!(lines[3], "    MethodCall foo 3:3-3:8");
        assert_eq!(lines[4], "      Literal 1 3:7-3:7");
    }

    #[test]
    fn test_text_dump_lists_orphans_after_children() {
        let tree = tree("{\n  foo();\n  // trailing\n}", EntryPoint::Block);
        let dump = dump_text(&tree);
        assert_eq!(dump.lines().last(), Some("  ~ line comment 3:3 \"trailing\""));
    }

    #[test]
    fn test_json_dump_mirrors_tree() {
        let tree = tree("<a x=1/>", EntryPoint::TagContainer);
        let value = JsonTree.visit(&tree, tree.root());
        assert_eq!(value["node"], "UiContainer <a>");
        assert_eq!(value["children"][0]["node"], "UiAttribute x");
        assert_eq!(value["children"][0]["children"][0]["node"], "Literal 1");
        assert_eq!(value["comment"], Value::Null);
    }

    #[test]
    fn test_labels() {
        assert_eq!(node_label(&NodeKind::Name("x".into())), "Name x");
        assert_eq!(node_label(&NodeKind::Empty), "Empty");
        assert_eq!(
            node_label(&NodeKind::Literal(Literal::String("hi".into()))),
            "Literal \"hi\""
        );
    }
}
