// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end behaviour of the front end: parse, attribute, dedent, compile.

use std::sync::Arc;

use xapi_lang::ast::{NodeId, NodeKind, SyntaxTree};
use xapi_lang::attribution::MergeOptions;
use xapi_lang::schema::{
    DslModel, Schema, SchemaCompilationError, SchemaErrorKind, compile_schema,
};
use xapi_lang::source_analysis::{
    EntryPoint, collect_comments, parse, parse_tag_container, parse_with_comments,
};
use xapi_lang::template::{dedent, dedent_lines};

const JAVA: &str = r#"/* License banner */
package com.acme;

import java.util.List;

/** A widget. */
@Component
public class Widget {
    // the size

    private int size = 3; // pixels

    /* orphaned */

    public Widget(int size) {
        this.size = size;
    }

    String render() {
        // leading
        return `
            <div>${size}</div>
        `; // trailing
    }
}
"#;

const DEFINITION: &str = r#"<xapi-dsl name="Boxes" rootTag="box"
    attributes={ size: <int required=true/> }
    elements=[
        <element-def name="box" attributes={ size: <int required=true/> } />,
        <element-def name="crate" attributes={ size: <int required=true/> } />,
    ]
/>"#;

fn compile(source: &str) -> Result<Schema, SchemaCompilationError> {
    let tree = parse_tag_container(source).expect("definition should parse");
    compile_schema(&DslModel::new(&tree).expect("root is a tag"))
}

fn find(tree: &SyntaxTree, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
    tree.ids().filter(|&id| pred(tree.kind(id))).collect()
}

#[test]
fn comment_count_is_conserved_by_attribution() {
    let expected = collect_comments(JAVA).len();
    assert_eq!(expected, 7);
    for options in [
        MergeOptions::default(),
        MergeOptions {
            assign_across_blank_lines: true,
            annotations_as_node_start: false,
        },
    ] {
        let tree = parse_with_comments(JAVA, EntryPoint::CompilationUnit, &options).unwrap();
        assert_eq!(tree.comments().count(), expected);
    }
}

#[test]
fn banner_goes_to_compilation_unit() {
    let tree =
        parse_with_comments(JAVA, EntryPoint::CompilationUnit, &MergeOptions::default()).unwrap();
    let root = tree.node(tree.root());
    assert_eq!(root.comment().unwrap().content().trim(), "License banner");
}

#[test]
fn dedent_literal_example() {
    assert_eq!(dedent("\n    a\n      b\n    "), ["a", "  b", ""]);
}

#[test]
fn dedent_is_idempotent_on_template_text() {
    let tree = parse(JAVA, EntryPoint::CompilationUnit).unwrap();
    let templates = find(&tree, |kind| matches!(kind, NodeKind::TemplateLiteral { .. }));
    assert_eq!(templates.len(), 1);
    let NodeKind::TemplateLiteral { raw, .. } = tree.kind(templates[0]) else {
        unreachable!()
    };
    let once = dedent(raw);
    assert_eq!(once, ["<div>${size}</div>", ""]);
    assert_eq!(dedent_lines(&once), once);
}

#[test]
fn blank_line_blocks_attachment_unless_enabled() {
    let source = "{\n// doc\n\nfoo();\n}";

    let tree = parse_with_comments(source, EntryPoint::Block, &MergeOptions::default()).unwrap();
    let block = tree.node(tree.root());
    assert_eq!(block.orphan_comments().len(), 1);
    assert_eq!(block.orphan_comments()[0].content().trim(), "doc");
    let stmts = find(&tree, |kind| matches!(kind, NodeKind::ExpressionStmt { .. }));
    assert!(tree.node(stmts[0]).comment().is_none());

    let options = MergeOptions {
        assign_across_blank_lines: true,
        ..MergeOptions::default()
    };
    let tree = parse_with_comments(source, EntryPoint::Block, &options).unwrap();
    assert!(tree.node(tree.root()).orphan_comments().is_empty());
    let stmts = find(&tree, |kind| matches!(kind, NodeKind::ExpressionStmt { .. }));
    assert_eq!(
        tree.node(stmts[0]).comment().map(|c| c.content().trim()),
        Some("doc")
    );
}

#[test]
fn blank_line_toggle_on_a_parsed_statement() {
    let source = "// doc\n\nfoo();";

    let tree =
        parse_with_comments(source, EntryPoint::Statement, &MergeOptions::default()).unwrap();
    let stmt = tree.node(tree.root());
    assert!(matches!(stmt.kind(), NodeKind::ExpressionStmt { .. }));
    assert!(stmt.comment().is_none());
    assert_eq!(stmt.orphan_comments()[0].content().trim(), "doc");

    let options = MergeOptions {
        assign_across_blank_lines: true,
        ..MergeOptions::default()
    };
    let tree = parse_with_comments(source, EntryPoint::Statement, &options).unwrap();
    let stmt = tree.node(tree.root());
    assert_eq!(stmt.comment().map(|c| c.content().trim()), Some("doc"));
    assert!(stmt.orphan_comments().is_empty());
    assert_eq!(tree.comments().count(), 1);
}

#[test]
fn schema_reuses_attribute_instances() {
    let schema = compile(DEFINITION).unwrap();
    let size = schema.attribute("size").unwrap();
    for tag in ["box", "crate"] {
        let attr = schema.element(tag).unwrap().attribute("size").unwrap();
        assert!(Arc::ptr_eq(size, attr), "<{tag}> should share the schema's size");
    }
}

#[test]
fn schema_conflict_names_attribute_and_element() {
    let source = DEFINITION.replacen(
        r#"name="crate" attributes={ size: <int required=true/>"#,
        r#"name="crate" attributes={ size: <int required=false/>"#,
        1,
    );
    let err = compile(&source).unwrap_err();
    assert!(matches!(err.kind, SchemaErrorKind::ConflictingRequired(_)));
    let message = err.to_string();
    assert!(message.contains("'size'"), "{message}");
    assert!(message.contains("'crate'"), "{message}");
}

#[test]
fn unknown_root_tag_fails_compilation() {
    let source = DEFINITION.replacen(r#"rootTag="box""#, r#"rootTag="shelf""#, 1);
    let err = compile(&source).unwrap_err();
    assert_eq!(
        err.kind,
        SchemaErrorKind::UnknownRootTag {
            root_tag: "shelf".into(),
            defined: vec!["box".into(), "crate".into()],
        }
    );
}

#[test]
fn parsing_and_compiling_are_deterministic() {
    let options = MergeOptions::default();
    let first = parse_with_comments(JAVA, EntryPoint::CompilationUnit, &options).unwrap();
    let second = parse_with_comments(JAVA, EntryPoint::CompilationUnit, &options).unwrap();
    assert_eq!(first, second);

    assert_eq!(compile(DEFINITION).unwrap(), compile(DEFINITION).unwrap());
}
