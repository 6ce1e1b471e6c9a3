// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Definition document to [`Schema`] compilation.
//!
//! Compilation is a single top-down pass:
//!
//! 1. The root's optional `attributes={...}` seeds the attribute registry.
//! 2. Each `<element-def>` in `elements=[...]` is compiled in document order.
//!    Its attributes reuse a registry entry of the same name when the two are
//!    compatible, and are promoted into the registry otherwise.
//! 3. `rootTag` (default `"root"`) must name a compiled element.
//!
//! Any violation aborts the whole compilation.

use std::sync::Arc;

use ecow::EcoString;
use tracing::{debug, trace};

use super::types::{pair_parts, required_string};
use super::{
    DslModel, DslSchemaAttribute, DslSchemaElement, DslType, Schema, SchemaCompilationError,
    SchemaErrorKind, parse_type_expr,
};
use crate::ast::{NodeId, NodeKind, SyntaxTree};

const ELEMENT_DEF: &str = "element-def";
const DEFAULT_ROOT_TAG: &str = "root";

/// Compiles a definition document into a [`Schema`].
pub fn compile_schema(model: &DslModel<'_>) -> Result<Schema, SchemaCompilationError> {
    let mut compiler = Compiler {
        tree: model.tree(),
        attributes: Vec::new(),
        elements: Vec::new(),
    };
    let root = model.root();
    let root_name = model.tag_name();

    let context = format!("{root_name} attributes=");
    if let Some(attrs) = compiler.object_attribute(root, "attributes", &context)? {
        for &pair in compiler.pairs(attrs) {
            let (name, value) = pair_parts(compiler.tree, pair)?;
            let attribute = compiler.compile_attribute(name, value)?;
            compiler.register(attribute, pair)?;
        }
    }

    let elements = compiler.array_attribute(root, root_name, "elements")?;
    for def in compiler.tree.json_values(elements).unwrap_or_default() {
        if compiler.tree.tag_name(def) != Some(ELEMENT_DEF) {
            debug!(
                entry = compiler.tree.source_text(def),
                "ignoring non element-def entry"
            );
            continue;
        }
        let element = compiler.compile_element(def)?;
        compiler.elements.push(element);
    }

    let root_tag = compiler
        .tree
        .attribute_string(root, "rootTag")
        .unwrap_or_else(|| DEFAULT_ROOT_TAG.into());
    let schema = Schema::new(
        compiler.tree,
        model.name(),
        model.package_name(),
        root_tag,
        compiler.attributes,
        compiler.elements,
        root,
    )?;
    debug!(
        root_tag = schema.root_tag(),
        attributes = schema.attributes().len(),
        elements = schema.elements().len(),
        "compiled schema"
    );
    Ok(schema)
}

struct Compiler<'tree> {
    tree: &'tree SyntaxTree,
    attributes: Vec<Arc<DslSchemaAttribute>>,
    elements: Vec<DslSchemaElement>,
}

impl<'tree> Compiler<'tree> {
    fn compile_element(&mut self, def: NodeId) -> Result<DslSchemaElement, SchemaCompilationError> {
        let tag = required_string(self.tree, def, ELEMENT_DEF, "name")?;

        let mut attributes: Vec<Arc<DslSchemaAttribute>> = Vec::new();
        let context = format!("attributes= for element-def '{tag}'");
        if let Some(attrs) = self.object_attribute(def, "attributes", &context)? {
            for &pair in self.pairs(attrs) {
                let (name, value) = pair_parts(self.tree, pair)?;
                let incoming = self.compile_attribute(name, value)?;
                let shared = match self.registered(&incoming.name) {
                    Some(existing) => {
                        let context = format!("attribute '{}' on element '{tag}'", incoming.name);
                        self.require_compatible(&existing, &incoming, &context, pair)?;
                        trace!(attribute = %incoming.name, element = %tag, "reusing attribute");
                        existing
                    }
                    None => {
                        trace!(attribute = %incoming.name, element = %tag, "promoting attribute");
                        let promoted = Arc::new(incoming);
                        self.attributes.push(Arc::clone(&promoted));
                        promoted
                    }
                };
                attributes.push(shared);
            }
        }

        let mut children: Vec<(EcoString, DslType)> = Vec::new();
        let context = format!("elements= for element-def '{tag}'");
        if let Some(kids) = self.object_attribute(def, "elements", &context)? {
            for &pair in self.pairs(kids) {
                let (child, value) = pair_parts(self.tree, pair)?;
                children.push((child, parse_type_expr(self.tree, value)?));
            }
        }

        DslSchemaElement::new(self.tree, tag, attributes, children, def)
    }

    /// Compiles `name: value`. A tag-form value may carry `required` and
    /// `default` next to the type.
    fn compile_attribute(
        &self,
        name: EcoString,
        value: NodeId,
    ) -> Result<DslSchemaAttribute, SchemaCompilationError> {
        let ty = parse_type_expr(self.tree, value)?;
        let (required, default_value) = match self.tree.kind(value) {
            NodeKind::UiContainer { .. } => (
                self.tree
                    .attribute_string(value, "required")
                    .is_some_and(|req| req.eq_ignore_ascii_case("true")),
                self.tree.attribute_value(value, "default"),
            ),
            _ => (false, None),
        };
        DslSchemaAttribute::new(self.tree, name, ty, required, default_value, value)
    }

    /// Adds a top-level attribute. A repeat must be compatible and the first
    /// instance stays canonical.
    fn register(
        &mut self,
        attribute: DslSchemaAttribute,
        at: NodeId,
    ) -> Result<(), SchemaCompilationError> {
        if let Some(existing) = self.registered(&attribute.name) {
            let context = format!("schema attribute '{}'", attribute.name);
            return self.require_compatible(&existing, &attribute, &context, at);
        }
        self.attributes.push(Arc::new(attribute));
        Ok(())
    }

    fn registered(&self, name: &str) -> Option<Arc<DslSchemaAttribute>> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(Arc::clone)
    }

    fn require_compatible(
        &self,
        existing: &DslSchemaAttribute,
        incoming: &DslSchemaAttribute,
        context: &str,
        at: NodeId,
    ) -> Result<(), SchemaCompilationError> {
        let kind = if existing.required != incoming.required {
            SchemaErrorKind::ConflictingRequired(context.into())
        } else if existing.default_value.is_some() != incoming.default_value.is_some() {
            SchemaErrorKind::ConflictingDefault(context.into())
        } else if existing.ty.category() != incoming.ty.category() {
            SchemaErrorKind::ConflictingType {
                context: context.into(),
                existing: existing.ty.category(),
                incoming: incoming.ty.category(),
            }
        } else {
            return Ok(());
        };
        Err(SchemaCompilationError::at(self.tree, at, kind))
    }

    // ── Literal shapes ──

    fn pairs(&self, container: NodeId) -> &'tree [NodeId] {
        self.tree.json_pairs(container).unwrap_or_default()
    }

    /// The value of an optional attribute that must be a json object.
    fn object_attribute(
        &self,
        container: NodeId,
        name: &str,
        context: &str,
    ) -> Result<Option<NodeId>, SchemaCompilationError> {
        let Some(attr) = self.tree.attribute(container, name) else {
            return Ok(None);
        };
        match self.tree.attribute_value(container, name) {
            Some(value) if self.tree.is_json_object(value) => Ok(Some(value)),
            value => Err(self.wrong_shape(value.unwrap_or(attr), context, "object/map")),
        }
    }

    /// The value of a required attribute that must be a json array.
    fn array_attribute(
        &self,
        container: NodeId,
        tag: &str,
        name: &str,
    ) -> Result<NodeId, SchemaCompilationError> {
        let Some(attr) = self.tree.attribute(container, name) else {
            return Err(SchemaCompilationError::at(
                self.tree,
                container,
                SchemaErrorKind::MissingAttribute {
                    tag: tag.into(),
                    attribute: name.into(),
                },
            ));
        };
        match self.tree.attribute_value(container, name) {
            Some(value) if self.tree.is_json_array(value) => Ok(value),
            value => Err(self.wrong_shape(
                value.unwrap_or(attr),
                &format!("{tag} {name}="),
                "array",
            )),
        }
    }

    fn wrong_shape(
        &self,
        at: NodeId,
        context: &str,
        expected: &'static str,
    ) -> SchemaCompilationError {
        SchemaCompilationError::at(
            self.tree,
            at,
            SchemaErrorKind::WrongShape {
                context: context.into(),
                expected,
                found: self.tree.source_text(at).into(),
            },
        )
    }
}
