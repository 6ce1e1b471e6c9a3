// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Definition-document schemas.
//!
//! A definition document is an ordinary tag container that follows a fixed
//! attribute vocabulary:
//!
//! ```text
//! <xapi-dsl name="Ui" rootTag="app"
//!     attributes={ id: <string required=true/> }
//!     elements=[
//!         <element-def name="app"
//!             attributes={ id: <string required=true/>, title: string }
//!             elements={ item: <element-ref name="item"/> }
//!         />,
//!         <element-def name="item" attributes={ id: <string required=true/> } />,
//!     ]
//! />
//! ```
//!
//! [`compile_schema`] turns it into an immutable [`Schema`]. Attributes are
//! shared by name: every element that declares a compatible `id` holds the
//! same [`Arc`] as the schema's registry.
//!
//! ```
//! use std::sync::Arc;
//! use xapi_lang::schema::{compile_schema, DslModel};
//! use xapi_lang::source_analysis::parse_tag_container;
//!
//! let tree = parse_tag_container(r#"<xapi-dsl rootTag="app"
//!     attributes={ id: <string required=true/> }
//!     elements=[ <element-def name="app" attributes={ id: <string required=true/> }/> ]
//! />"#).unwrap();
//! let schema = compile_schema(&DslModel::new(&tree).unwrap()).unwrap();
//! let shared = schema.attribute("id").unwrap();
//! assert!(Arc::ptr_eq(shared, schema.element("app").unwrap().attribute("id").unwrap()));
//! ```

mod compiler;
mod error;
mod model;
mod types;

use std::sync::Arc;

use ecow::{EcoString, eco_format};

use crate::ast::{NodeId, SyntaxTree};

pub use compiler::compile_schema;
pub use error::{SchemaCompilationError, SchemaErrorKind};
pub use model::DslModel;
pub use types::{DslType, parse_type_expr};

/// A compiled attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslSchemaAttribute {
    name: EcoString,
    ty: DslType,
    required: bool,
    /// The `default=` expression, kept unevaluated.
    default_value: Option<NodeId>,
    source: NodeId,
}

impl DslSchemaAttribute {
    pub(crate) fn new(
        tree: &SyntaxTree,
        name: EcoString,
        ty: DslType,
        required: bool,
        default_value: Option<NodeId>,
        source: NodeId,
    ) -> Result<Self, SchemaCompilationError> {
        if name.is_empty() {
            return Err(SchemaCompilationError::at(
                tree,
                source,
                SchemaErrorKind::EmptyName("attribute"),
            ));
        }
        Ok(Self {
            name,
            ty,
            required,
            default_value,
            source,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> &DslType {
        &self.ty
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The node holding the default value expression, in the tree the schema
    /// was compiled from.
    #[must_use]
    pub const fn default_value(&self) -> Option<NodeId> {
        self.default_value
    }

    /// The type expression this attribute was compiled from.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }
}

/// A compiled `element-def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslSchemaElement {
    tag: EcoString,
    attributes: Vec<Arc<DslSchemaAttribute>>,
    children: Vec<(EcoString, DslType)>,
    source: NodeId,
}

impl DslSchemaElement {
    /// Fails on an empty tag or a repeated attribute or child tag.
    pub(crate) fn new(
        tree: &SyntaxTree,
        tag: EcoString,
        attributes: Vec<Arc<DslSchemaAttribute>>,
        children: Vec<(EcoString, DslType)>,
        source: NodeId,
    ) -> Result<Self, SchemaCompilationError> {
        let fail = |kind| Err(SchemaCompilationError::at(tree, source, kind));
        if tag.is_empty() {
            return fail(SchemaErrorKind::EmptyName("element"));
        }
        if let Some(attribute) = first_repeat(attributes.iter().map(|attr| &attr.name)) {
            return fail(SchemaErrorKind::DuplicateAttribute {
                attribute,
                owner: eco_format!("element-def '{tag}'"),
            });
        }
        if let Some(child) = first_repeat(children.iter().map(|(child, _)| child)) {
            return fail(SchemaErrorKind::DuplicateChildTag {
                child,
                element: tag,
            });
        }
        Ok(Self {
            tag,
            attributes,
            children,
            source,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Arc<DslSchemaAttribute>> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[Arc<DslSchemaAttribute>] {
        &self.attributes
    }

    /// The type allowed for child tag `tag`.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&DslType> {
        self.children
            .iter()
            .find_map(|(name, ty)| (name == tag).then_some(ty))
    }

    /// Child tags and their types in declaration order.
    #[must_use]
    pub fn children(&self) -> &[(EcoString, DslType)] {
        &self.children
    }

    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }
}

/// A compiled definition document.
///
/// Registries keep document order and their keys are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: EcoString,
    package_name: EcoString,
    root_tag: EcoString,
    attributes: Vec<Arc<DslSchemaAttribute>>,
    elements: Vec<DslSchemaElement>,
    source: NodeId,
}

impl Schema {
    /// Fails on a repeated registry key or a root tag that names no
    /// element. `source` is the root of the definition document.
    pub(crate) fn new(
        tree: &SyntaxTree,
        name: EcoString,
        package_name: EcoString,
        root_tag: EcoString,
        attributes: Vec<Arc<DslSchemaAttribute>>,
        elements: Vec<DslSchemaElement>,
        source: NodeId,
    ) -> Result<Self, SchemaCompilationError> {
        if let Some(attribute) = first_repeat(attributes.iter().map(|attr| &attr.name)) {
            return Err(SchemaCompilationError::at(
                tree,
                source,
                SchemaErrorKind::DuplicateAttribute {
                    attribute,
                    owner: "the schema attribute registry".into(),
                },
            ));
        }
        for (i, element) in elements.iter().enumerate() {
            if elements[..i].iter().any(|earlier| earlier.tag == element.tag) {
                return Err(SchemaCompilationError::at(
                    tree,
                    element.source,
                    SchemaErrorKind::DuplicateElement(element.tag.clone()),
                ));
            }
        }
        if !elements.iter().any(|element| element.tag == root_tag) {
            let at = tree.attribute(source, "rootTag").unwrap_or(source);
            return Err(SchemaCompilationError::at(
                tree,
                at,
                SchemaErrorKind::UnknownRootTag {
                    root_tag,
                    defined: elements.iter().map(|element| element.tag.clone()).collect(),
                },
            ));
        }
        Ok(Self {
            name,
            package_name,
            root_tag,
            attributes,
            elements,
            source,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The tag of the element a document of this schema starts with.
    #[must_use]
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Arc<DslSchemaAttribute>> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    #[must_use]
    pub fn attributes(&self) -> &[Arc<DslSchemaAttribute>] {
        &self.attributes
    }

    #[must_use]
    pub fn element(&self, tag: &str) -> Option<&DslSchemaElement> {
        self.elements.iter().find(|element| element.tag == tag)
    }

    #[must_use]
    pub fn elements(&self) -> &[DslSchemaElement] {
        &self.elements
    }

    #[must_use]
    pub fn root_element(&self) -> Option<&DslSchemaElement> {
        self.element(&self.root_tag)
    }

    /// The root node of the definition document.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }
}

/// The first key that occurs twice.
fn first_repeat<'a>(keys: impl Iterator<Item = &'a EcoString>) -> Option<EcoString> {
    let mut seen: Vec<&EcoString> = Vec::new();
    for key in keys {
        if seen.contains(&key) {
            return Some(key.clone());
        }
        seen.push(key);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse_tag_container;

    fn attribute(tree: &SyntaxTree, name: &str) -> Arc<DslSchemaAttribute> {
        Arc::new(
            DslSchemaAttribute::new(tree, name.into(), DslType::String, false, None, tree.root())
                .unwrap(),
        )
    }

    fn element(tree: &SyntaxTree, tag: &str) -> DslSchemaElement {
        DslSchemaElement::new(tree, tag.into(), Vec::new(), Vec::new(), tree.root()).unwrap()
    }

    #[test]
    fn attribute_name_must_not_be_empty() {
        let tree = parse_tag_container("<d/>").unwrap();
        let err = DslSchemaAttribute::new(&tree, "".into(), DslType::Json, true, None, tree.root())
            .unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::EmptyName("attribute"));
    }

    #[test]
    fn element_rejects_empty_tag_and_repeated_keys() {
        let tree = parse_tag_container("<d/>").unwrap();
        let root = tree.root();

        let err = DslSchemaElement::new(&tree, "".into(), Vec::new(), Vec::new(), root).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::EmptyName("element"));

        let attrs = vec![attribute(&tree, "a"), attribute(&tree, "a")];
        let err = DslSchemaElement::new(&tree, "box".into(), attrs, Vec::new(), root).unwrap_err();
        assert_eq!(
            err.kind,
            SchemaErrorKind::DuplicateAttribute {
                attribute: "a".into(),
                owner: "element-def 'box'".into(),
            }
        );

        let children = vec![
            ("item".into(), DslType::String),
            ("item".into(), DslType::Integer),
        ];
        let err = DslSchemaElement::new(&tree, "box".into(), Vec::new(), children, root).unwrap_err();
        assert_eq!(
            err.kind,
            SchemaErrorKind::DuplicateChildTag {
                child: "item".into(),
                element: "box".into(),
            }
        );
    }

    #[test]
    fn schema_rejects_repeated_keys_and_unknown_root() {
        let tree = parse_tag_container("<d/>").unwrap();
        let root = tree.root();
        let new = |attributes, elements, root_tag: &str| {
            Schema::new(&tree, "S".into(), "".into(), root_tag.into(), attributes, elements, root)
        };

        let err = new(
            vec![attribute(&tree, "a"), attribute(&tree, "a")],
            vec![element(&tree, "root")],
            "root",
        )
        .unwrap_err();
        assert!(matches!(err.kind, SchemaErrorKind::DuplicateAttribute { .. }));

        let err = new(Vec::new(), vec![element(&tree, "x"), element(&tree, "x")], "x").unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::DuplicateElement("x".into()));

        let err = new(Vec::new(), vec![element(&tree, "x")], "y").unwrap_err();
        assert_eq!(
            err.kind,
            SchemaErrorKind::UnknownRootTag {
                root_tag: "y".into(),
                defined: vec!["x".into()],
            }
        );

        let schema = new(vec![attribute(&tree, "a")], vec![element(&tree, "x")], "x").unwrap();
        assert_eq!(schema.root_element().map(DslSchemaElement::tag), Some("x"));
    }
}
