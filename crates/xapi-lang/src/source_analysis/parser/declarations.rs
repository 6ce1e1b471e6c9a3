// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: compilation units, imports, type declarations,
//! members, parameters and annotations.

use ecow::EcoString;

use crate::ast::{NodeId, NodeKind};
use crate::source_analysis::{Keyword, ParseError, TokenKind};

use super::Parser;

/// Leading annotations and modifier keywords of a declaration.
#[derive(Debug)]
pub(super) struct Modifiers {
    pub(super) annotations: Vec<NodeId>,
    pub(super) keywords: Vec<Keyword>,
    /// Where the declaration starts, annotations included.
    pub(super) start: u32,
    /// Where the declaration starts once annotations are ignored. `None`
    /// when there are no annotations.
    pub(super) unannotated_start: Option<u32>,
}

impl Parser<'_> {
    // ========================================================================
    // Compilation unit
    // ========================================================================

    /// Parses `[package a.b;] import...* type-declaration*`.
    pub(super) fn parse_compilation_unit(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();

        if self.at_package_declaration() {
            package = Some(self.parse_package_declaration()?);
        }
        while self.check_keyword(Keyword::Import) {
            imports.push(self.parse_import()?);
        }
        while !self.is_at_end() {
            if self.match_token(&TokenKind::Semicolon) {
                continue;
            }
            let modifiers = self.parse_modifiers()?;
            types.push(self.parse_type_declaration(modifiers)?);
        }

        Ok(self.push_from(
            NodeKind::CompilationUnit {
                package,
                imports,
                types,
            },
            start,
        ))
    }

    /// `package` possibly preceded by annotations.
    fn at_package_declaration(&self) -> bool {
        let mut i = self.current;
        while matches!(self.kind_at(i), TokenKind::At) {
            i += 1;
            while self.kind_at(i).is_identifier() || matches!(self.kind_at(i), TokenKind::Dot) {
                i += 1;
            }
            if matches!(self.kind_at(i), TokenKind::LeftParen) {
                match self.matching_paren(i) {
                    Some(close) => i = close + 1,
                    None => return false,
                }
            }
        }
        self.kind_at(i).is_keyword(Keyword::Package)
    }

    fn parse_package_declaration(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut annotations = Vec::new();
        while self.check(&TokenKind::At) {
            annotations.push(self.parse_annotation()?);
        }
        let unannotated_start = (!annotations.is_empty()).then(|| self.current_start());
        self.expect_keyword(Keyword::Package)?;
        let name = self.parse_qualified_name()?;
        self.expect(&TokenKind::Semicolon, "';'")?;
        let span = self.span_from(start);
        Ok(self.builder.push_annotated(
            NodeKind::PackageDeclaration { annotations, name },
            span,
            unannotated_start,
        ))
    }

    /// Parses `import [static] a.b.C[.*];`.
    pub(super) fn parse_import(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        self.expect_keyword(Keyword::Import)?;
        let is_static = self.match_keyword(Keyword::Static);
        let name = self.parse_qualified_name()?;
        let is_asterisk = if self.check(&TokenKind::Dot) && self.peek_kind(1).is_operator("*") {
            self.advance_by(2);
            true
        } else {
            false
        };
        self.expect(&TokenKind::Semicolon, "';'")?;
        Ok(self.push_from(
            NodeKind::ImportDeclaration {
                name,
                is_static,
                is_asterisk,
            },
            start,
        ))
    }

    /// Parses `a.b.c` as a [`NodeKind::Name`] followed by a chain of
    /// [`NodeKind::QualifiedName`]s.
    pub(super) fn parse_qualified_name(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let first = self.expect_identifier("name")?;
        let mut name = self.push_from(NodeKind::Name(first), start);
        while self.check(&TokenKind::Dot) && self.peek_kind(1).is_identifier() {
            self.advance();
            let segment = self.expect_identifier("name")?;
            name = self.push_from(
                NodeKind::QualifiedName {
                    qualifier: name,
                    name: segment,
                },
                start,
            );
        }
        Ok(name)
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Parses leading annotations and modifier keywords in any order.
    /// `@interface` is left for the caller.
    pub(super) fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let start = self.current_start();
        let mut annotations = Vec::new();
        let mut keywords = Vec::new();
        let mut unannotated_start = None;
        loop {
            match self.current_kind() {
                TokenKind::At if !self.peek_kind(1).is_keyword(Keyword::Interface) => {
                    annotations.push(self.parse_annotation()?);
                    unannotated_start = None;
                }
                TokenKind::Keyword(keyword) if keyword.is_modifier() => {
                    let keyword = *keyword;
                    if unannotated_start.is_none() && !annotations.is_empty() {
                        unannotated_start = Some(self.current_start());
                    }
                    keywords.push(keyword);
                    self.advance();
                }
                _ => break,
            }
        }
        if !annotations.is_empty() && unannotated_start.is_none() {
            unannotated_start = Some(self.current_start());
        }
        Ok(Modifiers {
            annotations,
            keywords,
            start,
            unannotated_start,
        })
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    /// Parses a class, interface or enum declaration after its modifiers.
    pub(super) fn parse_type_declaration(
        &mut self,
        modifiers: Modifiers,
    ) -> Result<NodeId, ParseError> {
        self.nested(|p| match p.current_kind() {
            TokenKind::Keyword(Keyword::Class) => p.parse_class_declaration(modifiers, false),
            TokenKind::Keyword(Keyword::Interface) => p.parse_class_declaration(modifiers, true),
            TokenKind::Keyword(Keyword::Enum) => p.parse_enum_declaration(modifiers),
            _ => Err(p.unexpected("'class', 'interface' or 'enum'")),
        })
    }

    fn parse_class_declaration(
        &mut self,
        modifiers: Modifiers,
        is_interface: bool,
    ) -> Result<NodeId, ParseError> {
        self.advance();
        let name = self.expect_identifier("type name")?;
        let type_parameters = if self.check_operator("<") {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };
        let mut extends = Vec::new();
        if self.match_keyword(Keyword::Extends) {
            extends = self.parse_type_list()?;
        }
        let mut implements = Vec::new();
        if self.match_keyword(Keyword::Implements) {
            implements = self.parse_type_list()?;
        }
        let members = self.parse_class_body()?;
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::ClassOrInterfaceDeclaration {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                is_interface,
                name,
                type_parameters,
                extends,
                implements,
                members,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    fn parse_type_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut types = vec![self.parse_type()?];
        while self.match_token(&TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    fn parse_enum_declaration(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::Enum)?;
        let name = self.expect_identifier("enum name")?;
        let mut implements = Vec::new();
        if self.match_keyword(Keyword::Implements) {
            implements = self.parse_type_list()?;
        }
        self.expect(&TokenKind::LeftBrace, "'{'")?;

        let mut entries = Vec::new();
        while !self.check(&TokenKind::Semicolon) && !self.check(&TokenKind::RightBrace) {
            entries.push(self.parse_enum_constant()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        let mut members = Vec::new();
        if self.match_token(&TokenKind::Semicolon) {
            self.parse_members_until_brace(&mut members)?;
        }
        self.expect(&TokenKind::RightBrace, "'}'")?;

        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::EnumDeclaration {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                name,
                implements,
                entries,
                members,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    fn parse_enum_constant(&mut self) -> Result<NodeId, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let name = self.expect_identifier("enum constant")?;
        let arguments = if self.check(&TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let body = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_class_body()?)
        } else {
            None
        };
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::EnumConstantDeclaration {
                annotations: modifiers.annotations,
                name,
                arguments,
                body,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    /// Parses `{ member* }`.
    pub(super) fn parse_class_body(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.guarded(|p| {
            p.expect(&TokenKind::LeftBrace, "'{'")?;
            let mut members = Vec::new();
            p.parse_members_until_brace(&mut members)?;
            p.expect(&TokenKind::RightBrace, "'}'")?;
            Ok(members)
        })
    }

    fn parse_members_until_brace(&mut self, members: &mut Vec<NodeId>) -> Result<(), ParseError> {
        while !self.check(&TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(self.unexpected("'}'"));
            }
            if self.match_token(&TokenKind::Semicolon) {
                continue;
            }
            members.push(self.parse_body_declaration()?);
        }
        Ok(())
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Parses one member of a class body: an initializer, a nested type, a
    /// constructor, a method or a field.
    pub(super) fn parse_body_declaration(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        if self.check(&TokenKind::LeftBrace) {
            let body = self.parse_block()?;
            return Ok(self.push_from(
                NodeKind::InitializerDeclaration {
                    is_static: false,
                    body,
                },
                start,
            ));
        }
        if self.check_keyword(Keyword::Static) && matches!(self.peek_kind(1), TokenKind::LeftBrace) {
            self.advance();
            let body = self.parse_block()?;
            return Ok(self.push_from(
                NodeKind::InitializerDeclaration {
                    is_static: true,
                    body,
                },
                start,
            ));
        }

        let modifiers = self.parse_modifiers()?;
        if matches!(
            self.current_kind(),
            TokenKind::Keyword(Keyword::Class | Keyword::Interface | Keyword::Enum)
        ) {
            return self.parse_type_declaration(modifiers);
        }

        let type_parameters = if self.check_operator("<") {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        // `Name(` is a constructor
        if self.current_kind().is_identifier() && matches!(self.peek_kind(1), TokenKind::LeftParen) {
            return self.parse_constructor(modifiers, type_parameters);
        }

        let return_type = self.parse_type_or_void()?;
        let name_start = self.current_start();
        let name = self.expect_identifier("member name")?;
        if self.check(&TokenKind::LeftParen) {
            return self.parse_method(modifiers, type_parameters, return_type, name);
        }
        if !type_parameters.is_empty() {
            return Err(self.unexpected("'('"));
        }
        if self.tree_kind_is_void(return_type) {
            return Err(self.unexpected("'('"));
        }

        let mut variables = vec![self.parse_variable_declarator_rest(name, name_start)?];
        while self.match_token(&TokenKind::Comma) {
            let start = self.current_start();
            let name = self.expect_identifier("variable name")?;
            variables.push(self.parse_variable_declarator_rest(name, start)?);
        }
        self.expect(&TokenKind::Semicolon, "';'")?;
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::FieldDeclaration {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                ty: return_type,
                variables,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    fn tree_kind_is_void(&self, id: NodeId) -> bool {
        matches!(self.builder.kind(id), NodeKind::VoidType)
    }

    fn parse_constructor(
        &mut self,
        modifiers: Modifiers,
        type_parameters: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        let name = self.expect_identifier("constructor name")?;
        let parameters = self.parse_parameters()?;
        let throws = self.parse_throws()?;
        let body = self.parse_block()?;
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::ConstructorDeclaration {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                type_parameters,
                name,
                parameters,
                throws,
                body,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    fn parse_method(
        &mut self,
        modifiers: Modifiers,
        type_parameters: Vec<NodeId>,
        return_type: NodeId,
        name: EcoString,
    ) -> Result<NodeId, ParseError> {
        let parameters = self.parse_parameters()?;
        // legacy `int f()[]` array return types
        let return_start = self.node_span(return_type).start();
        let return_type = self.parse_array_dims(return_type, return_start)?;
        let throws = self.parse_throws()?;
        let body = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.check_keyword(Keyword::Default) {
            // annotation member default: `String value() default "";`
            self.advance();
            self.parse_element_value()?;
            self.expect(&TokenKind::Semicolon, "';'")?;
            None
        } else {
            Some(self.parse_block()?)
        };
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::MethodDeclaration {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                type_parameters,
                return_type,
                name,
                parameters,
                throws,
                body,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    fn parse_parameters(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut parameters = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            parameters.push(self.parse_parameter()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(parameters)
    }

    fn parse_throws(&mut self) -> Result<Vec<NodeId>, ParseError> {
        if self.match_keyword(Keyword::Throws) {
            self.parse_type_list()
        } else {
            Ok(Vec::new())
        }
    }

    /// Parses `final @A Type... name[]`.
    pub(super) fn parse_parameter(&mut self) -> Result<NodeId, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let type_start = self.current_start();
        let mut ty = self.parse_type()?;
        let is_varargs = self.match_token(&TokenKind::Ellipsis);
        let name = self.expect_identifier("parameter name")?;
        while self.check(&TokenKind::LeftBracket) && matches!(self.peek_kind(1), TokenKind::RightBracket)
        {
            self.advance_by(2);
            ty = self.push_from(NodeKind::ArrayType { component: ty }, type_start);
        }
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::Parameter {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                ty: Some(ty),
                is_varargs,
                name,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Parses `@Name`, `@Name(value)` or `@Name(k = v, ...)`.
    pub(super) fn parse_annotation(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::At, "'@'")?;
            let name = p.parse_qualified_name()?;
            let mut value = None;
            let mut pairs = Vec::new();
            if p.match_token(&TokenKind::LeftParen) {
                let is_pairs =
                    p.current_kind().is_identifier() && p.peek_kind(1).is_operator("=");
                if is_pairs {
                    loop {
                        let pair_start = p.current_start();
                        let key = p.expect_identifier("annotation member")?;
                        p.expect_operator("=")?;
                        let member_value = p.parse_element_value()?;
                        pairs.push(p.push_from(
                            NodeKind::MemberValuePair {
                                name: key,
                                value: member_value,
                            },
                            pair_start,
                        ));
                        if !p.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                } else if !p.check(&TokenKind::RightParen) {
                    value = Some(p.parse_element_value()?);
                }
                p.expect(&TokenKind::RightParen, "')'")?;
            }
            Ok(p.push_from(NodeKind::Annotation { name, value, pairs }, start))
        })
    }

    /// An annotation member value: a nested annotation, an array of values
    /// or a conditional expression.
    fn parse_element_value(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::At => self.parse_annotation(),
            TokenKind::LeftBrace => self.parse_element_value_array(),
            _ => self.parse_conditional(),
        }
    }

    fn parse_element_value_array(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::LeftBrace, "'{'")?;
            let mut values = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                values.push(p.parse_element_value()?);
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBrace, "'}'")?;
            Ok(p.push_from(NodeKind::ArrayInitializer { values }, start))
        })
    }
}
