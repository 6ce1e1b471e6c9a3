// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Value-shape descriptors and the parser that reads them from the tree.
//!
//! A descriptor is written either as a name (`string`), a call
//! (`many(string, int)`) or a tag (`<list element=<string/>/>`). All three
//! forms produce the same [`DslType`].

use std::fmt;

use ecow::EcoString;

use super::{SchemaCompilationError, SchemaErrorKind};
use crate::ast::{NodeId, NodeKind, SyntaxTree};

/// The shape of an attribute value or child element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslType {
    String,
    Name,
    QualifiedName,
    Boolean,
    Integer,
    NamePair,
    Json,
    /// Exactly one value of any of the listed types.
    One(Vec<DslType>),
    /// Any number of values of the listed types.
    Many(Vec<DslType>),
    Map {
        key: Box<DslType>,
        values: Vec<DslType>,
    },
    /// A map with a fixed set of typed keys.
    TypedMap(Vec<(EcoString, DslType)>),
    TypeRef(EcoString),
    Element(EcoString),
    NamedElement(EcoString),
    ListOrMap {
        list: Box<DslType>,
        map: Box<DslType>,
    },
    Enum(Vec<EcoString>),
}

impl DslType {
    /// The descriptor's category, ignoring any type arguments.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Name => "name",
            Self::QualifiedName => "qualifiedName",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::NamePair => "namePair",
            Self::Json => "json",
            Self::One(_) => "one",
            Self::Many(_) => "many",
            Self::Map { .. } => "map",
            Self::TypedMap(_) => "typedMap",
            Self::TypeRef(_) => "typeRef",
            Self::Element(_) => "element",
            Self::NamedElement(_) => "namedElement",
            Self::ListOrMap { .. } => "listOrMap",
            Self::Enum(_) => "enum",
        }
    }

    /// The simple type a bare name stands for.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => Self::String,
            "name" => Self::Name,
            "qualifiedName" => Self::QualifiedName,
            "bool" | "boolean" => Self::Boolean,
            "int" | "integer" => Self::Integer,
            "namePair" => Self::NamePair,
            "json" => Self::Json,
            _ => return None,
        })
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[DslType]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

/// Renders the call form of the descriptor.
impl fmt::Display for DslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(types) | Self::Many(types) => {
                write!(f, "{}(", self.category())?;
                write_list(f, types)?;
                f.write_str(")")
            }
            Self::Map { key, values } => {
                write!(f, "map({key}, ")?;
                write_list(f, values)?;
                f.write_str(")")
            }
            Self::TypedMap(fields) => {
                f.write_str("typedMap({")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_str("})")
            }
            Self::TypeRef(name) | Self::Element(name) | Self::NamedElement(name) => {
                write!(f, "{}(\"{name}\")", self.category())
            }
            Self::ListOrMap { list, map } => write!(f, "listOrMap({list}, {map})"),
            Self::Enum(values) => {
                f.write_str("enum([")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{value}\"")?;
                }
                f.write_str("])")
            }
            _ => f.write_str(self.category()),
        }
    }
}

// ============================================================================
// Descriptor parsing
// ============================================================================

/// Reads the descriptor rooted at `id`.
pub fn parse_type_expr(
    tree: &SyntaxTree,
    id: NodeId,
) -> Result<DslType, SchemaCompilationError> {
    match tree.kind(id) {
        NodeKind::UiContainer { name, .. } => parse_type_tag(tree, id, name),
        NodeKind::MethodCall {
            scope: None,
            name,
            arguments,
            ..
        } => parse_type_call(tree, id, name, arguments),
        NodeKind::Name(name) => parse_type_name(tree, id, name),
        NodeKind::Enclosed { inner } => parse_type_expr(tree, *inner),
        _ => Err(SchemaCompilationError::at(
            tree,
            id,
            SchemaErrorKind::UnsupportedTypeExpression(tree.source_text(id).into()),
        )),
    }
}

fn parse_type_name(
    tree: &SyntaxTree,
    id: NodeId,
    name: &str,
) -> Result<DslType, SchemaCompilationError> {
    DslType::from_name(name).ok_or_else(|| {
        SchemaCompilationError::at(tree, id, SchemaErrorKind::UnknownType(name.into()))
    })
}

fn parse_all(
    tree: &SyntaxTree,
    ids: &[NodeId],
) -> Result<Vec<DslType>, SchemaCompilationError> {
    ids.iter().map(|&id| parse_type_expr(tree, id)).collect()
}

fn parse_type_tag(
    tree: &SyntaxTree,
    id: NodeId,
    tag: &str,
) -> Result<DslType, SchemaCompilationError> {
    if let Some(simple) = DslType::from_name(tag) {
        return Ok(simple);
    }
    match tag {
        "one" => Ok(DslType::One(parse_all(tree, tree.body_children(id))?)),
        "many" => Ok(DslType::Many(parse_all(tree, tree.body_children(id))?)),
        "typedMap" => {
            let object = match tree.body_children(id) {
                [only] if tree.is_json_object(*only) => *only,
                _ => {
                    return Err(bad_arguments(
                        tree,
                        id,
                        "typedMap expects a single json object argument",
                    ));
                }
            };
            let mut fields = Vec::new();
            for &pair in tree.json_pairs(object).unwrap_or_default() {
                let (key, value) = pair_parts(tree, pair)?;
                fields.push((key, parse_type_expr(tree, value)?));
            }
            Ok(DslType::TypedMap(fields))
        }
        "element" | "element-ref" => {
            Ok(DslType::Element(required_string(tree, id, tag, "name")?))
        }
        "namedElement" => Ok(DslType::NamedElement(required_string(
            tree, id, tag, "name",
        )?)),
        "typeRef" => Ok(DslType::TypeRef(required_string(tree, id, tag, "name")?)),
        "list" => {
            let element = required_value(tree, id, tag, "element")?;
            Ok(DslType::Many(vec![parse_type_expr(tree, element)?]))
        }
        "map" => {
            let key = required_string(tree, id, tag, "keyType")?;
            let value = required_string(tree, id, tag, "valueType")?;
            Ok(DslType::Map {
                key: Box::new(parse_type_name(tree, id, &key)?),
                values: vec![parse_type_name(tree, id, &value)?],
            })
        }
        "list-or-map" => {
            let list = required_value(tree, id, tag, "listElement")?;
            let map = required_value(tree, id, tag, "mapValue")?;
            Ok(DslType::ListOrMap {
                list: Box::new(parse_type_expr(tree, list)?),
                map: Box::new(parse_type_expr(tree, map)?),
            })
        }
        "enum" => parse_enum(tree, id, required_value(tree, id, tag, "values")?),
        _ => Err(SchemaCompilationError::at(
            tree,
            id,
            SchemaErrorKind::UnknownTypeTag(tag.into()),
        )),
    }
}

fn parse_enum(
    tree: &SyntaxTree,
    id: NodeId,
    values: NodeId,
) -> Result<DslType, SchemaCompilationError> {
    if !tree.is_json_array(values) {
        return Err(SchemaCompilationError::at(
            tree,
            values,
            SchemaErrorKind::WrongShape {
                context: "<enum> values=".into(),
                expected: "array of strings",
                found: tree.source_text(values).into(),
            },
        ));
    }
    let mut out = Vec::new();
    for item in tree.json_values(values).unwrap_or_default() {
        match tree.string_value(item) {
            Some(value) if !value.is_empty() => out.push(value),
            _ => {
                return Err(bad_arguments(
                    tree,
                    item,
                    &format!(
                        "<enum> values must be non-empty strings; got: {}",
                        tree.source_text(item)
                    ),
                ));
            }
        }
    }
    if out.is_empty() {
        return Err(bad_arguments(tree, id, "<enum> needs at least one value"));
    }
    Ok(DslType::Enum(out))
}

fn parse_type_call(
    tree: &SyntaxTree,
    id: NodeId,
    name: &str,
    arguments: &[NodeId],
) -> Result<DslType, SchemaCompilationError> {
    match name {
        "one" => Ok(DslType::One(parse_all(tree, arguments)?)),
        "many" => Ok(DslType::Many(parse_all(tree, arguments)?)),
        "map" => {
            let mut types = parse_all(tree, arguments)?;
            if types.len() < 2 {
                return Err(bad_arguments(
                    tree,
                    id,
                    "map(keyType, valueType...) expects at least 2 arguments",
                ));
            }
            let values = types.split_off(1);
            let key = types.remove(0);
            Ok(DslType::Map {
                key: Box::new(key),
                values,
            })
        }
        "typeRef" => match arguments {
            [alias] => tree
                .string_value(*alias)
                .filter(|alias| !alias.is_empty())
                .map(DslType::TypeRef)
                .ok_or_else(|| bad_arguments(tree, *alias, "typeRef(...) expects a type name")),
            _ => Err(bad_arguments(
                tree,
                id,
                &format!(
                    "typeRef(...) expects exactly 1 argument; got {}",
                    arguments.len()
                ),
            )),
        },
        _ if arguments.is_empty() => parse_type_name(tree, id, name),
        _ => Err(SchemaCompilationError::at(
            tree,
            id,
            SchemaErrorKind::UnsupportedTypeExpression(tree.source_text(id).into()),
        )),
    }
}

// ── Attribute helpers ──

fn bad_arguments(tree: &SyntaxTree, id: NodeId, message: &str) -> SchemaCompilationError {
    SchemaCompilationError::at(tree, id, SchemaErrorKind::BadTypeArguments(message.into()))
}

fn missing(tree: &SyntaxTree, id: NodeId, tag: &str, attribute: &str) -> SchemaCompilationError {
    SchemaCompilationError::at(
        tree,
        id,
        SchemaErrorKind::MissingAttribute {
            tag: tag.into(),
            attribute: attribute.into(),
        },
    )
}

/// The string value of attribute `name`, which must be present and non-empty.
pub(super) fn required_string(
    tree: &SyntaxTree,
    id: NodeId,
    tag: &str,
    name: &str,
) -> Result<EcoString, SchemaCompilationError> {
    if !tree.has_attribute(id, name) {
        return Err(missing(tree, id, tag, name));
    }
    match tree.attribute_string(id, name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SchemaCompilationError::at(
            tree,
            tree.attribute(id, name).unwrap_or(id),
            SchemaErrorKind::EmptyAttribute {
                tag: tag.into(),
                attribute: name.into(),
            },
        )),
    }
}

/// The value expression of attribute `name`. A bare attribute has none.
fn required_value(
    tree: &SyntaxTree,
    id: NodeId,
    tag: &str,
    name: &str,
) -> Result<NodeId, SchemaCompilationError> {
    tree.attribute_value(id, name)
        .ok_or_else(|| missing(tree, id, tag, name))
}

/// The key string and value node of an object pair.
pub(super) fn pair_parts(
    tree: &SyntaxTree,
    pair: NodeId,
) -> Result<(EcoString, NodeId), SchemaCompilationError> {
    match (tree.json_key_string(pair), tree.json_pair_value(pair)) {
        (Some(key), Some(value)) => Ok((key, value)),
        _ => Err(SchemaCompilationError::at(
            tree,
            pair,
            SchemaErrorKind::InvalidDocument("expected a key: value pair".into()),
        )),
    }
}
