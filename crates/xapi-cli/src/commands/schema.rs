// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `xapi schema`: Compile a definition document and print the schema.

use std::fmt::Write as _;

use camino::Utf8Path;
use miette::Result;
use serde_json::{Value, json};
use xapi_lang::ast::SyntaxTree;
use xapi_lang::schema::{DslModel, DslSchemaAttribute, Schema, compile_schema};
use xapi_lang::source_analysis::parse_tag_container;

use super::{OutputFormat, read_source};
use crate::diagnostic::with_source;

pub fn run(path: &Utf8Path, format: OutputFormat) -> Result<()> {
    let source = read_source(path)?;
    let tree = parse_tag_container(&source).map_err(|err| with_source(err, path, &source))?;
    let schema = DslModel::new(&tree)
        .and_then(|model| compile_schema(&model))
        .map_err(|err| with_source(err, path, &source))?;

    match format {
        OutputFormat::Text => print!("{}", schema_text(&schema, &tree)),
        OutputFormat::Json => println!("{}", schema_json(&schema, &tree)),
    }
    Ok(())
}

fn attribute_text(attr: &DslSchemaAttribute, tree: &SyntaxTree) -> String {
    let mut line = format!("{}: {}", attr.name(), attr.ty());
    if attr.is_required() {
        line.push_str(" required");
    }
    if let Some(default) = attr.default_value() {
        let _ = write!(line, " default={}", tree.source_text(default));
    }
    line
}

fn schema_text(schema: &Schema, tree: &SyntaxTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "schema {}", schema.name());
    if !schema.package_name().is_empty() {
        let _ = writeln!(out, "package {}", schema.package_name());
    }
    let _ = writeln!(out, "root <{}>", schema.root_tag());
    let _ = writeln!(out, "attributes:");
    for attr in schema.attributes() {
        let _ = writeln!(out, "  {}", attribute_text(attr, tree));
    }
    for element in schema.elements() {
        let _ = writeln!(out, "element <{}>", element.tag());
        for attr in element.attributes() {
            let _ = writeln!(out, "  @{}", attribute_text(attr, tree));
        }
        for (child, ty) in element.children() {
            let _ = writeln!(out, "  <{child}>: {ty}");
        }
    }
    out
}

fn attribute_json(attr: &DslSchemaAttribute, tree: &SyntaxTree) -> Value {
    json!({
        "name": attr.name(),
        "type": attr.ty().to_string(),
        "category": attr.ty().category(),
        "required": attr.is_required(),
        "default": attr.default_value().map(|id| tree.source_text(id)),
    })
}

fn schema_json(schema: &Schema, tree: &SyntaxTree) -> Value {
    let elements: Vec<Value> = schema
        .elements()
        .iter()
        .map(|element| {
            json!({
                "tag": element.tag(),
                "attributes": element
                    .attributes()
                    .iter()
                    .map(|attr| attr.name())
                    .collect::<Vec<_>>(),
                "children": element
                    .children()
                    .iter()
                    .map(|(tag, ty)| json!({ "tag": tag.as_str(), "type": ty.to_string() }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "name": schema.name(),
        "package": schema.package_name(),
        "rootTag": schema.root_tag(),
        "attributes": schema
            .attributes()
            .iter()
            .map(|attr| attribute_json(attr, tree))
            .collect::<Vec<_>>(),
        "elements": elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = r#"<xapi-dsl name="Ui" package="com.acme" rootTag="app"
        elements=[
            <element-def name="app"
                attributes={ title: <string required=true/>, width: <int default=100/> }
                elements={ item: many(<element-ref name="item"/>) } />,
            <element-def name="item" attributes={ title: <string required=true/> } />,
        ]
    />"#;

    fn compiled() -> (SyntaxTree, Schema) {
        let tree = parse_tag_container(DEFINITION).unwrap();
        let schema = compile_schema(&DslModel::new(&tree).unwrap()).unwrap();
        (tree, schema)
    }

    #[test]
    fn test_schema_text() {
        let (tree, schema) = compiled();
        let text = schema_text(&schema, &tree);
        assert_eq!(
            text,
            "schema Ui\n\
             package com.acme\n\
             root <app>\n\
             attributes:\n\
             \x20 title: string required\n\
             \x20 width: integer default=100\n\
             element <app>\n\
             \x20 @title: string required\n\
             \x20 @width: integer default=100\n\
             \x20 <item>: many(element(\"item\"))\n\
             element <item>\n\
             \x20 @title: string required\n"
        );
    }

    #[test]
    fn test_schema_json() {
        let (tree, schema) = compiled();
        let value = schema_json(&schema, &tree);
        assert_eq!(value["rootTag"], "app");
        assert_eq!(value["attributes"][1]["default"], "100");
        assert_eq!(value["attributes"][1]["category"], "integer");
        assert_eq!(value["elements"][1]["attributes"][0], "title");
        assert_eq!(value["elements"][0]["children"][0]["type"], "many(element(\"item\"))");
    }
}
