// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Node variants of the syntax tree.
//!
//! [`NodeKind`] is a closed sum type with one variant per syntactic form.
//! Child links are [`NodeId`]s into the owning [`SyntaxTree`](super::SyntaxTree)
//! arena; there are no parent links.

use std::fmt;

use ecow::EcoString;

use super::{AssignOp, BinaryOp, Comment, UnaryOp};
use crate::source_analysis::{Keyword, Position, Range, Span};

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A literal value, spelled as in the source (escapes and suffixes kept).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Integer(EcoString),
    Long(EcoString),
    Double(EcoString),
    Char(EcoString),
    String(EcoString),
    Boolean(bool),
    Null,
}

/// Broad families of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Declaration,
    Type,
    Statement,
    Expression,
    Annotation,
    /// Tag containers, json containers and templates.
    Markup,
}

/// One syntactic form. Fields named `*_type`/`ty` hold type nodes, everything
/// else named after its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    // === Compilation unit and declarations ===
    CompilationUnit {
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        types: Vec<NodeId>,
    },
    PackageDeclaration {
        annotations: Vec<NodeId>,
        name: NodeId,
    },
    ImportDeclaration {
        name: NodeId,
        is_static: bool,
        is_asterisk: bool,
    },
    ClassOrInterfaceDeclaration {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        is_interface: bool,
        name: EcoString,
        type_parameters: Vec<NodeId>,
        extends: Vec<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    EnumDeclaration {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        name: EcoString,
        implements: Vec<NodeId>,
        entries: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    EnumConstantDeclaration {
        annotations: Vec<NodeId>,
        name: EcoString,
        arguments: Vec<NodeId>,
        /// `None` for `X`, `Some` for `X { ... }` even when empty.
        body: Option<Vec<NodeId>>,
    },
    FieldDeclaration {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        ty: NodeId,
        variables: Vec<NodeId>,
    },
    MethodDeclaration {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        type_parameters: Vec<NodeId>,
        return_type: NodeId,
        name: EcoString,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    },
    ConstructorDeclaration {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        type_parameters: Vec<NodeId>,
        name: EcoString,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: NodeId,
    },
    InitializerDeclaration {
        is_static: bool,
        body: NodeId,
    },
    /// A method, constructor, catch or lambda parameter. Lambda parameters
    /// may omit the type.
    Parameter {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        ty: Option<NodeId>,
        is_varargs: bool,
        name: EcoString,
    },
    TypeParameter {
        name: EcoString,
        bounds: Vec<NodeId>,
    },
    VariableDeclarator {
        name: EcoString,
        array_dims: u32,
        init: Option<NodeId>,
    },

    // === Types ===
    PrimitiveType(Keyword),
    VoidType,
    ClassOrInterfaceType {
        scope: Option<NodeId>,
        name: EcoString,
        /// `None` without `<...>`, `Some(empty)` for the diamond `<>`.
        type_arguments: Option<Vec<NodeId>>,
    },
    ArrayType {
        component: NodeId,
    },
    WildcardType {
        extends: Option<NodeId>,
        super_bound: Option<NodeId>,
    },
    /// `A | B` in a multi-catch clause.
    UnionType {
        elements: Vec<NodeId>,
    },

    // === Statements ===
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStmt {
        expression: NodeId,
    },
    If {
        condition: NodeId,
        then_stmt: NodeId,
        else_stmt: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Do {
        body: NodeId,
        condition: NodeId,
    },
    For {
        init: Vec<NodeId>,
        compare: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        variable: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    Return {
        expression: Option<NodeId>,
    },
    Break {
        label: Option<EcoString>,
    },
    Continue {
        label: Option<EcoString>,
    },
    Throw {
        expression: NodeId,
    },
    Try {
        resources: Vec<NodeId>,
        try_block: NodeId,
        catch_clauses: Vec<NodeId>,
        finally_block: Option<NodeId>,
    },
    CatchClause {
        parameter: NodeId,
        body: NodeId,
    },
    Switch {
        selector: NodeId,
        entries: Vec<NodeId>,
    },
    /// `case label:` or `default:` (label `None`) with its statements.
    SwitchEntry {
        label: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    Synchronized {
        lock: NodeId,
        body: NodeId,
    },
    Labeled {
        label: EcoString,
        statement: NodeId,
    },
    Assert {
        check: NodeId,
        message: Option<NodeId>,
    },
    /// `this(...)` or `super(...)` as the first statement of a constructor.
    ExplicitConstructorInvocation {
        is_this: bool,
        arguments: Vec<NodeId>,
    },
    TypeDeclarationStmt {
        declaration: NodeId,
    },
    Empty,

    // === Expressions ===
    Name(EcoString),
    /// A dotted name such as `a.b.c`, as used by package, import and
    /// annotation names.
    QualifiedName {
        qualifier: NodeId,
        name: EcoString,
    },
    FieldAccess {
        scope: NodeId,
        field: EcoString,
    },
    MethodCall {
        scope: Option<NodeId>,
        type_arguments: Vec<NodeId>,
        name: EcoString,
        arguments: Vec<NodeId>,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    ArrayCreation {
        element_type: NodeId,
        dimensions: Vec<NodeId>,
        extra_dims: u32,
        initializer: Option<NodeId>,
    },
    ArrayInitializer {
        values: Vec<NodeId>,
    },
    ObjectCreation {
        scope: Option<NodeId>,
        ty: NodeId,
        arguments: Vec<NodeId>,
        /// Members of an anonymous class body, if one is present.
        body: Option<Vec<NodeId>>,
    },
    Assign {
        target: NodeId,
        op: AssignOp,
        value: NodeId,
    },
    Binary {
        left: NodeId,
        op: BinaryOp,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Conditional {
        condition: NodeId,
        then_expr: NodeId,
        else_expr: NodeId,
    },
    Cast {
        ty: NodeId,
        expression: NodeId,
    },
    InstanceOf {
        expression: NodeId,
        ty: NodeId,
    },
    /// A parenthesized expression.
    Enclosed {
        inner: NodeId,
    },
    /// `Type.class`
    ClassExpr {
        ty: NodeId,
    },
    This {
        qualifier: Option<NodeId>,
    },
    Super {
        qualifier: Option<NodeId>,
    },
    Lambda {
        parameters: Vec<NodeId>,
        body: NodeId,
        parenthesized: bool,
    },
    MethodReference {
        scope: NodeId,
        identifier: EcoString,
    },
    Literal(Literal),
    /// Local variable declaration, also used in `for` headers and resources.
    VariableDeclarationExpr {
        annotations: Vec<NodeId>,
        modifiers: Vec<Keyword>,
        ty: NodeId,
        variables: Vec<NodeId>,
    },

    // === Annotations ===
    /// `@Name`, `@Name(value)` or `@Name(key = value, ...)`.
    Annotation {
        name: NodeId,
        value: Option<NodeId>,
        pairs: Vec<NodeId>,
    },
    MemberValuePair {
        name: EcoString,
        value: NodeId,
    },

    // === Markup extensions ===
    /// `<name attr=value ...>body</name>` or `<name ... />`.
    UiContainer {
        name: EcoString,
        attributes: Vec<NodeId>,
        body: Option<NodeId>,
    },
    /// `name=value`. A bare `name` has no value and reads as `true`.
    UiAttribute {
        name: EcoString,
        value: Option<NodeId>,
    },
    UiBody {
        children: Vec<NodeId>,
    },
    /// `{ key: value, ... }` or `[ value, ... ]`.
    JsonContainer {
        is_array: bool,
        pairs: Vec<NodeId>,
    },
    /// An entry of a json container. Array entries have no key.
    JsonPair {
        key: Option<NodeId>,
        value: NodeId,
    },
    /// Backtick text with `${expr}` interpolations.
    TemplateLiteral {
        raw: EcoString,
        interpolations: Vec<NodeId>,
    },
}

/// Pushes every id in `ids`.
fn extend(out: &mut Vec<NodeId>, ids: &[NodeId]) {
    out.extend_from_slice(ids);
}

impl NodeKind {
    /// Direct children in source order.
    #[must_use]
    #[expect(
        clippy::too_many_lines,
        reason = "one arm per variant keeps child order next to the variant shape"
    )]
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            Self::CompilationUnit {
                package,
                imports,
                types,
            } => {
                out.extend(*package);
                extend(&mut out, imports);
                extend(&mut out, types);
            }
            Self::PackageDeclaration { annotations, name } => {
                extend(&mut out, annotations);
                out.push(*name);
            }
            Self::ImportDeclaration { name, .. } => out.push(*name),
            Self::ClassOrInterfaceDeclaration {
                annotations,
                type_parameters,
                extends,
                implements,
                members,
                ..
            } => {
                extend(&mut out, annotations);
                extend(&mut out, type_parameters);
                extend(&mut out, extends);
                extend(&mut out, implements);
                extend(&mut out, members);
            }
            Self::EnumDeclaration {
                annotations,
                implements,
                entries,
                members,
                ..
            } => {
                extend(&mut out, annotations);
                extend(&mut out, implements);
                extend(&mut out, entries);
                extend(&mut out, members);
            }
            Self::EnumConstantDeclaration {
                annotations,
                arguments,
                body,
                ..
            } => {
                extend(&mut out, annotations);
                extend(&mut out, arguments);
                if let Some(members) = body {
                    extend(&mut out, members);
                }
            }
            Self::FieldDeclaration {
                annotations,
                ty,
                variables,
                ..
            }
            | Self::VariableDeclarationExpr {
                annotations,
                ty,
                variables,
                ..
            } => {
                extend(&mut out, annotations);
                out.push(*ty);
                extend(&mut out, variables);
            }
            Self::MethodDeclaration {
                annotations,
                type_parameters,
                return_type,
                parameters,
                throws,
                body,
                ..
            } => {
                extend(&mut out, annotations);
                extend(&mut out, type_parameters);
                out.push(*return_type);
                extend(&mut out, parameters);
                extend(&mut out, throws);
                out.extend(*body);
            }
            Self::ConstructorDeclaration {
                annotations,
                type_parameters,
                parameters,
                throws,
                body,
                ..
            } => {
                extend(&mut out, annotations);
                extend(&mut out, type_parameters);
                extend(&mut out, parameters);
                extend(&mut out, throws);
                out.push(*body);
            }
            Self::InitializerDeclaration { body, .. } => out.push(*body),
            Self::Parameter {
                annotations, ty, ..
            } => {
                extend(&mut out, annotations);
                out.extend(*ty);
            }
            Self::TypeParameter { bounds, .. } => extend(&mut out, bounds),
            Self::VariableDeclarator { init, .. } => out.extend(*init),

            Self::PrimitiveType(_)
            | Self::VoidType
            | Self::Empty
            | Self::Name(_)
            | Self::Literal(_)
            | Self::Break { .. }
            | Self::Continue { .. } => {}
            Self::ClassOrInterfaceType {
                scope,
                type_arguments,
                ..
            } => {
                out.extend(*scope);
                if let Some(args) = type_arguments {
                    extend(&mut out, args);
                }
            }
            Self::ArrayType { component } => out.push(*component),
            Self::WildcardType {
                extends,
                super_bound,
            } => {
                out.extend(*extends);
                out.extend(*super_bound);
            }
            Self::UnionType { elements } => extend(&mut out, elements),

            Self::Block { statements } => extend(&mut out, statements),
            Self::ExpressionStmt { expression }
            | Self::Throw { expression }
            | Self::Enclosed { inner: expression } => out.push(*expression),
            Self::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                out.push(*condition);
                out.push(*then_stmt);
                out.extend(*else_stmt);
            }
            Self::While { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            Self::Do { body, condition } => {
                out.push(*body);
                out.push(*condition);
            }
            Self::For {
                init,
                compare,
                update,
                body,
            } => {
                extend(&mut out, init);
                out.extend(*compare);
                extend(&mut out, update);
                out.push(*body);
            }
            Self::ForEach {
                variable,
                iterable,
                body,
            } => {
                out.push(*variable);
                out.push(*iterable);
                out.push(*body);
            }
            Self::Return { expression } => out.extend(*expression),
            Self::Try {
                resources,
                try_block,
                catch_clauses,
                finally_block,
            } => {
                extend(&mut out, resources);
                out.push(*try_block);
                extend(&mut out, catch_clauses);
                out.extend(*finally_block);
            }
            Self::CatchClause { parameter, body } => {
                out.push(*parameter);
                out.push(*body);
            }
            Self::Switch { selector, entries } => {
                out.push(*selector);
                extend(&mut out, entries);
            }
            Self::SwitchEntry { label, statements } => {
                out.extend(*label);
                extend(&mut out, statements);
            }
            Self::Synchronized { lock, body } => {
                out.push(*lock);
                out.push(*body);
            }
            Self::Labeled { statement, .. } => out.push(*statement),
            Self::Assert { check, message } => {
                out.push(*check);
                out.extend(*message);
            }
            Self::ExplicitConstructorInvocation { arguments, .. }
            | Self::ArrayInitializer { values: arguments } => extend(&mut out, arguments),
            Self::TypeDeclarationStmt { declaration } => out.push(*declaration),

            Self::QualifiedName { qualifier, .. } => out.push(*qualifier),
            Self::FieldAccess { scope, .. } | Self::MethodReference { scope, .. } => {
                out.push(*scope);
            }
            Self::MethodCall {
                scope,
                type_arguments,
                arguments,
                ..
            } => {
                out.extend(*scope);
                extend(&mut out, type_arguments);
                extend(&mut out, arguments);
            }
            Self::ArrayAccess { array, index } => {
                out.push(*array);
                out.push(*index);
            }
            Self::ArrayCreation {
                element_type,
                dimensions,
                initializer,
                ..
            } => {
                out.push(*element_type);
                extend(&mut out, dimensions);
                out.extend(*initializer);
            }
            Self::ObjectCreation {
                scope,
                ty,
                arguments,
                body,
            } => {
                out.extend(*scope);
                out.push(*ty);
                extend(&mut out, arguments);
                if let Some(members) = body {
                    extend(&mut out, members);
                }
            }
            Self::Assign { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            Self::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            Self::Unary { operand, .. } => out.push(*operand),
            Self::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                out.push(*condition);
                out.push(*then_expr);
                out.push(*else_expr);
            }
            Self::Cast { ty, expression } => {
                out.push(*ty);
                out.push(*expression);
            }
            Self::InstanceOf { expression, ty } => {
                out.push(*expression);
                out.push(*ty);
            }
            Self::ClassExpr { ty } => out.push(*ty),
            Self::This { qualifier } | Self::Super { qualifier } => out.extend(*qualifier),
            Self::Lambda {
                parameters, body, ..
            } => {
                extend(&mut out, parameters);
                out.push(*body);
            }

            Self::Annotation { name, value, pairs } => {
                out.push(*name);
                out.extend(*value);
                extend(&mut out, pairs);
            }
            Self::MemberValuePair { value, .. } => out.push(*value),

            Self::UiContainer {
                attributes, body, ..
            } => {
                extend(&mut out, attributes);
                out.extend(*body);
            }
            Self::UiAttribute { value, .. } => out.extend(*value),
            Self::UiBody { children } => extend(&mut out, children),
            Self::JsonContainer { pairs, .. } => extend(&mut out, pairs),
            Self::JsonPair { key, value } => {
                out.extend(*key);
                out.push(*value);
            }
            Self::TemplateLiteral { interpolations, .. } => extend(&mut out, interpolations),
        }
        out
    }

    /// Annotations written before the construct, if it can carry any.
    #[must_use]
    pub fn annotations(&self) -> &[NodeId] {
        match self {
            Self::PackageDeclaration { annotations, .. }
            | Self::ClassOrInterfaceDeclaration { annotations, .. }
            | Self::EnumDeclaration { annotations, .. }
            | Self::EnumConstantDeclaration { annotations, .. }
            | Self::FieldDeclaration { annotations, .. }
            | Self::MethodDeclaration { annotations, .. }
            | Self::ConstructorDeclaration { annotations, .. }
            | Self::Parameter { annotations, .. }
            | Self::VariableDeclarationExpr { annotations, .. } => annotations,
            _ => &[],
        }
    }

    /// The variant name, as shown in tree dumps.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::CompilationUnit { .. } => "CompilationUnit",
            Self::PackageDeclaration { .. } => "PackageDeclaration",
            Self::ImportDeclaration { .. } => "ImportDeclaration",
            Self::ClassOrInterfaceDeclaration { .. } => "ClassOrInterfaceDeclaration",
            Self::EnumDeclaration { .. } => "EnumDeclaration",
            Self::EnumConstantDeclaration { .. } => "EnumConstantDeclaration",
            Self::FieldDeclaration { .. } => "FieldDeclaration",
            Self::MethodDeclaration { .. } => "MethodDeclaration",
            Self::ConstructorDeclaration { .. } => "ConstructorDeclaration",
            Self::InitializerDeclaration { .. } => "InitializerDeclaration",
            Self::Parameter { .. } => "Parameter",
            Self::TypeParameter { .. } => "TypeParameter",
            Self::VariableDeclarator { .. } => "VariableDeclarator",
            Self::PrimitiveType(_) => "PrimitiveType",
            Self::VoidType => "VoidType",
            Self::ClassOrInterfaceType { .. } => "ClassOrInterfaceType",
            Self::ArrayType { .. } => "ArrayType",
            Self::WildcardType { .. } => "WildcardType",
            Self::UnionType { .. } => "UnionType",
            Self::Block { .. } => "Block",
            Self::ExpressionStmt { .. } => "ExpressionStmt",
            Self::If { .. } => "If",
            Self::While { .. } => "While",
            Self::Do { .. } => "Do",
            Self::For { .. } => "For",
            Self::ForEach { .. } => "ForEach",
            Self::Return { .. } => "Return",
            Self::Break { .. } => "Break",
            Self::Continue { .. } => "Continue",
            Self::Throw { .. } => "Throw",
            Self::Try { .. } => "Try",
            Self::CatchClause { .. } => "CatchClause",
            Self::Switch { .. } => "Switch",
            Self::SwitchEntry { .. } => "SwitchEntry",
            Self::Synchronized { .. } => "Synchronized",
            Self::Labeled { .. } => "Labeled",
            Self::Assert { .. } => "Assert",
            Self::ExplicitConstructorInvocation { .. } => "ExplicitConstructorInvocation",
            Self::TypeDeclarationStmt { .. } => "TypeDeclarationStmt",
            Self::Empty => "Empty",
            Self::Name(_) => "Name",
            Self::QualifiedName { .. } => "QualifiedName",
            Self::FieldAccess { .. } => "FieldAccess",
            Self::MethodCall { .. } => "MethodCall",
            Self::ArrayAccess { .. } => "ArrayAccess",
            Self::ArrayCreation { .. } => "ArrayCreation",
            Self::ArrayInitializer { .. } => "ArrayInitializer",
            Self::ObjectCreation { .. } => "ObjectCreation",
            Self::Assign { .. } => "Assign",
            Self::Binary { .. } => "Binary",
            Self::Unary { .. } => "Unary",
            Self::Conditional { .. } => "Conditional",
            Self::Cast { .. } => "Cast",
            Self::InstanceOf { .. } => "InstanceOf",
            Self::Enclosed { .. } => "Enclosed",
            Self::ClassExpr { .. } => "ClassExpr",
            Self::This { .. } => "This",
            Self::Super { .. } => "Super",
            Self::Lambda { .. } => "Lambda",
            Self::MethodReference { .. } => "MethodReference",
            Self::Literal(_) => "Literal",
            Self::VariableDeclarationExpr { .. } => "VariableDeclarationExpr",
            Self::Annotation { .. } => "Annotation",
            Self::MemberValuePair { .. } => "MemberValuePair",
            Self::UiContainer { .. } => "UiContainer",
            Self::UiAttribute { .. } => "UiAttribute",
            Self::UiBody { .. } => "UiBody",
            Self::JsonContainer { .. } => "JsonContainer",
            Self::JsonPair { .. } => "JsonPair",
            Self::TemplateLiteral { .. } => "TemplateLiteral",
        }
    }

    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        match self {
            Self::CompilationUnit { .. }
            | Self::PackageDeclaration { .. }
            | Self::ImportDeclaration { .. }
            | Self::ClassOrInterfaceDeclaration { .. }
            | Self::EnumDeclaration { .. }
            | Self::EnumConstantDeclaration { .. }
            | Self::FieldDeclaration { .. }
            | Self::MethodDeclaration { .. }
            | Self::ConstructorDeclaration { .. }
            | Self::InitializerDeclaration { .. }
            | Self::Parameter { .. }
            | Self::TypeParameter { .. }
            | Self::VariableDeclarator { .. } => NodeCategory::Declaration,
            Self::PrimitiveType(_)
            | Self::VoidType
            | Self::ClassOrInterfaceType { .. }
            | Self::ArrayType { .. }
            | Self::WildcardType { .. }
            | Self::UnionType { .. } => NodeCategory::Type,
            Self::Block { .. }
            | Self::ExpressionStmt { .. }
            | Self::If { .. }
            | Self::While { .. }
            | Self::Do { .. }
            | Self::For { .. }
            | Self::ForEach { .. }
            | Self::Return { .. }
            | Self::Break { .. }
            | Self::Continue { .. }
            | Self::Throw { .. }
            | Self::Try { .. }
            | Self::CatchClause { .. }
            | Self::Switch { .. }
            | Self::SwitchEntry { .. }
            | Self::Synchronized { .. }
            | Self::Labeled { .. }
            | Self::Assert { .. }
            | Self::ExplicitConstructorInvocation { .. }
            | Self::TypeDeclarationStmt { .. }
            | Self::Empty => NodeCategory::Statement,
            Self::Name(_)
            | Self::QualifiedName { .. }
            | Self::FieldAccess { .. }
            | Self::MethodCall { .. }
            | Self::ArrayAccess { .. }
            | Self::ArrayCreation { .. }
            | Self::ArrayInitializer { .. }
            | Self::ObjectCreation { .. }
            | Self::Assign { .. }
            | Self::Binary { .. }
            | Self::Unary { .. }
            | Self::Conditional { .. }
            | Self::Cast { .. }
            | Self::InstanceOf { .. }
            | Self::Enclosed { .. }
            | Self::ClassExpr { .. }
            | Self::This { .. }
            | Self::Super { .. }
            | Self::Lambda { .. }
            | Self::MethodReference { .. }
            | Self::Literal(_)
            | Self::VariableDeclarationExpr { .. } => NodeCategory::Expression,
            Self::Annotation { .. } | Self::MemberValuePair { .. } => NodeCategory::Annotation,
            Self::UiContainer { .. }
            | Self::UiAttribute { .. }
            | Self::UiBody { .. }
            | Self::JsonContainer { .. }
            | Self::JsonPair { .. }
            | Self::TemplateLiteral { .. } => NodeCategory::Markup,
        }
    }
}

/// An arena slot: a node variant plus its location and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) range: Range,
    /// Start of the first token after the leading annotations, for nodes that
    /// have any.
    pub(crate) unannotated_begin: Option<Position>,
    pub(crate) comment: Option<Comment>,
    pub(crate) orphan_comments: Vec<Comment>,
}

impl Node {
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub const fn begin(&self) -> Position {
        self.range.begin
    }

    #[must_use]
    pub const fn end(&self) -> Position {
        self.range.end
    }

    /// Begin position with leading annotations stripped off. Equals
    /// [`Self::begin`] for nodes without annotations.
    #[must_use]
    pub fn begin_without_annotations(&self) -> Position {
        self.unannotated_begin.unwrap_or(self.range.begin)
    }

    #[must_use]
    pub const fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    #[must_use]
    pub fn orphan_comments(&self) -> &[Comment] {
        &self.orphan_comments
    }

    #[must_use]
    pub const fn has_comment(&self) -> bool {
        self.comment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn children_follow_source_order() {
        let kind = NodeKind::If {
            condition: id(0),
            then_stmt: id(1),
            else_stmt: Some(id(2)),
        };
        assert_eq!(kind.children(), vec![id(0), id(1), id(2)]);

        let kind = NodeKind::MethodDeclaration {
            annotations: vec![id(0)],
            modifiers: vec![Keyword::Public],
            type_parameters: vec![],
            return_type: id(1),
            name: "run".into(),
            parameters: vec![id(2), id(3)],
            throws: vec![],
            body: Some(id(4)),
        };
        assert_eq!(kind.children(), vec![id(0), id(1), id(2), id(3), id(4)]);
    }

    #[test]
    fn leaves_have_no_children() {
        assert!(NodeKind::Name("x".into()).children().is_empty());
        assert!(NodeKind::Literal(Literal::Null).children().is_empty());
        assert!(NodeKind::Break { label: None }.children().is_empty());
    }

    #[test]
    fn json_array_pair_has_only_value() {
        let kind = NodeKind::JsonPair {
            key: None,
            value: id(7),
        };
        assert_eq!(kind.children(), vec![id(7)]);
    }

    #[test]
    fn annotations_only_on_annotatable_nodes() {
        let field = NodeKind::FieldDeclaration {
            annotations: vec![id(0)],
            modifiers: vec![],
            ty: id(1),
            variables: vec![id(2)],
        };
        assert_eq!(field.annotations(), &[id(0)]);
        assert!(NodeKind::Empty.annotations().is_empty());
    }

    #[test]
    fn categories() {
        assert_eq!(NodeKind::VoidType.category(), NodeCategory::Type);
        assert_eq!(NodeKind::Empty.category(), NodeCategory::Statement);
        assert_eq!(
            NodeKind::UiBody { children: vec![] }.category(),
            NodeCategory::Markup
        );
    }
}
