// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Handles:
//!
//! - Assignment (all compound operators) and the conditional operator
//! - Binary operators via Pratt binding powers, plus `instanceof`
//! - Prefix and postfix unary operators and casts
//! - Literals, names, field access, method calls, array access
//! - `new` for objects (with anonymous bodies) and arrays
//! - `this`, `super`, class literals, lambdas and method references
//!
//! Tag containers, json containers and templates start in [`Parser::parse_primary`]
//! and continue in the markup module.

use crate::ast::{AssignOp, BinaryOp, Literal, NodeId, NodeKind, UnaryOp};
use crate::source_analysis::{Keyword, ParseError, TokenKind};

use super::{INSTANCEOF_POWER, Parser, binary_binding_power};

impl Parser<'_> {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    pub(super) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        if self.at_lambda() {
            return self.parse_lambda();
        }
        let start = self.current_start();
        let target = self.parse_conditional()?;
        let Some((symbol, count)) = self.current_operator() else {
            return Ok(target);
        };
        let Some(op) = AssignOp::from_symbol(&symbol) else {
            return Ok(target);
        };
        self.advance_by(count);
        let value = self.parse_expression()?;
        Ok(self.push_from(NodeKind::Assign { target, op, value }, start))
    }

    /// Parses `a ? b : c` or anything tighter.
    pub(super) fn parse_conditional(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let condition = self.parse_binary(0)?;
        if !self.match_token(&TokenKind::Question) {
            return Ok(condition);
        }
        let then_expr = self.parse_expression()?;
        self.expect(&TokenKind::Colon, "':'")?;
        let else_expr = if self.at_lambda() {
            self.parse_lambda()?
        } else {
            self.nested(Self::parse_conditional)?
        };
        Ok(self.push_from(
            NodeKind::Conditional {
                condition,
                then_expr,
                else_expr,
            },
            start,
        ))
    }

    /// Parses a binary expression using Pratt parsing.
    ///
    /// `min_power` is the minimum binding power an operator needs to be
    /// consumed at this level.
    fn parse_binary(&mut self, min_power: u8) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut left = self.parse_unary()?;
        loop {
            if self.check_keyword(Keyword::Instanceof) {
                if INSTANCEOF_POWER.left < min_power {
                    break;
                }
                self.advance();
                let ty = self.parse_type()?;
                left = self.push_from(NodeKind::InstanceOf { expression: left, ty }, start);
                continue;
            }
            let Some((symbol, count)) = self.current_operator() else {
                break;
            };
            if symbol == "<" && self.ends_markup_operand(left) {
                break;
            }
            let (Some(op), Some(power)) = (BinaryOp::from_symbol(&symbol), binary_binding_power(&symbol))
            else {
                break;
            };
            if power.left < min_power {
                break;
            }
            self.advance_by(count);
            // Each recursion binds tighter, so the depth is bounded by the
            // precedence table.
            let right = self.guarded(|p| p.parse_binary(power.right))?;
            left = self.push_from(NodeKind::Binary { left, op, right }, start);
        }
        Ok(left)
    }

    /// A `<` that opens a closing tag (`</`) or follows a tag container is
    /// markup, not a comparison.
    fn ends_markup_operand(&self, left: NodeId) -> bool {
        let closes_tag =
            self.peek_kind(1).is_operator("/") && self.is_adjacent(self.current + 1);
        closes_tag || matches!(self.builder.kind(left), NodeKind::UiContainer { .. })
    }

    /// Parses prefix operators and casts, then a postfix expression.
    pub(super) fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let prefix = match self.current_kind() {
            TokenKind::Operator(symbol) => UnaryOp::prefix(symbol),
            _ => None,
        };
        if let Some(op) = prefix {
            self.advance();
            let operand = self.nested(Self::parse_unary)?;
            return Ok(self.push_from(NodeKind::Unary { op, operand }, start));
        }
        if self.at_cast() {
            self.advance();
            let ty = self.parse_type()?;
            self.expect(&TokenKind::RightParen, "')'")?;
            let expression = self.nested(Self::parse_unary)?;
            return Ok(self.push_from(NodeKind::Cast { ty, expression }, start));
        }
        self.parse_postfix()
    }

    /// `(Type) operand`: primitive casts may precede any unary expression,
    /// reference casts only operands that cannot continue a binary expression.
    fn at_cast(&self) -> bool {
        if !self.check(&TokenKind::LeftParen) {
            return false;
        }
        let Some(close) = self.scan_type(self.current + 1) else {
            return false;
        };
        if !matches!(self.kind_at(close), TokenKind::RightParen) {
            return false;
        }
        if matches!(self.peek_kind(1), TokenKind::Keyword(k) if k.is_primitive_type()) {
            return true;
        }
        match self.kind_at(close + 1) {
            TokenKind::Identifier(_)
            | TokenKind::LeftParen
            | TokenKind::Integer(_)
            | TokenKind::Long(_)
            | TokenKind::Floating(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Template(_) => true,
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::This
                    | Keyword::Super
                    | Keyword::New
                    | Keyword::True
                    | Keyword::False
                    | Keyword::Null
            ),
            TokenKind::Operator(op) => op == "!" || op == "~",
            _ => false,
        }
    }

    /// Parses a primary expression followed by member access, calls, indexing,
    /// method references and postfix `++`/`--`.
    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    expr = self.parse_member_suffix(expr, start)?;
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RightBracket, "']'")?;
                    expr = self.push_from(NodeKind::ArrayAccess { array: expr, index }, start);
                }
                TokenKind::DoubleColon => {
                    self.advance();
                    let identifier = self.parse_method_reference_name()?;
                    expr = self.push_from(
                        NodeKind::MethodReference {
                            scope: expr,
                            identifier,
                        },
                        start,
                    );
                }
                TokenKind::Operator(op) if op == "++" || op == "--" => {
                    let op = if op == "++" {
                        UnaryOp::PostIncrement
                    } else {
                        UnaryOp::PostDecrement
                    };
                    self.advance();
                    expr = self.push_from(NodeKind::Unary { op, operand: expr }, start);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Parses what follows `scope.`.
    fn parse_member_suffix(&mut self, scope: NodeId, start: u32) -> Result<NodeId, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Operator(op) if op == "<" => {
                let type_arguments = self.parse_type_arguments()?;
                let name = self.expect_identifier("method name")?;
                let arguments = self.parse_arguments()?;
                Ok(self.push_from(
                    NodeKind::MethodCall {
                        scope: Some(scope),
                        type_arguments,
                        name,
                        arguments,
                    },
                    start,
                ))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(self.push_from(
                        NodeKind::MethodCall {
                            scope: Some(scope),
                            type_arguments: Vec::new(),
                            name,
                            arguments,
                        },
                        start,
                    ));
                }
                Ok(self.push_from(NodeKind::FieldAccess { scope, field: name }, start))
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                Ok(self.push_from(
                    NodeKind::This {
                        qualifier: Some(scope),
                    },
                    start,
                ))
            }
            TokenKind::Keyword(Keyword::Super) => {
                self.advance();
                Ok(self.push_from(
                    NodeKind::Super {
                        qualifier: Some(scope),
                    },
                    start,
                ))
            }
            TokenKind::Keyword(Keyword::New) => self.parse_creation(Some(scope), start),
            _ => Err(self.unexpected("member name")),
        }
    }

    fn parse_method_reference_name(&mut self) -> Result<ecow::EcoString, ParseError> {
        if self.match_keyword(Keyword::New) {
            return Ok("new".into());
        }
        self.expect_identifier("method name")
    }

    /// Parses `(a, b, ...)`.
    pub(super) fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut arguments = Vec::new();
        if self.match_token(&TokenKind::RightParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(arguments)
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    /// Parses a primary expression.
    pub(super) fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let literal = match self.current_kind().clone() {
            TokenKind::Integer(text) => Literal::Integer(text),
            TokenKind::Long(text) => Literal::Long(text),
            TokenKind::Floating(text) => Literal::Double(text),
            TokenKind::Char(text) => Literal::Char(text),
            TokenKind::String(text) => Literal::String(text),
            TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            TokenKind::Template(raw) => return self.parse_template_literal(raw),
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                return Ok(self.push_from(NodeKind::This { qualifier: None }, start));
            }
            TokenKind::Keyword(Keyword::Super) => {
                self.advance();
                return Ok(self.push_from(NodeKind::Super { qualifier: None }, start));
            }
            TokenKind::Keyword(Keyword::New) => return self.parse_creation(None, start),
            TokenKind::Keyword(Keyword::Void) => return self.parse_void_class_literal(),
            TokenKind::Keyword(keyword) if keyword.is_primitive_type() => {
                return self.parse_primitive_primary(keyword);
            }
            TokenKind::Identifier(name) => return self.parse_name_primary(name),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                return Ok(self.push_from(NodeKind::Enclosed { inner }, start));
            }
            TokenKind::LeftBrace => return self.parse_json_object(),
            TokenKind::LeftBracket => return self.parse_json_array(),
            TokenKind::Operator(op) if op == "<" => return self.parse_tag_container(),
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(self.push_from(NodeKind::Literal(literal), start))
    }

    /// An identifier: a class literal, a generic method reference, an
    /// unscoped method call or a plain name.
    fn parse_name_primary(&mut self, name: ecow::EcoString) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        if let Some(end) = self.scan_type(self.current) {
            let after = self.kind_at(end);
            if matches!(after, TokenKind::Dot) && self.kind_at(end + 1).is_keyword(Keyword::Class) {
                return self.parse_class_literal();
            }
            // `List<String>::size` and `int[]::clone` need a type scope; a
            // plain `a::b` stays a name
            let is_type_scope = end > self.current + 1
                && !matches!(self.peek_kind(1), TokenKind::Dot);
            if matches!(after, TokenKind::DoubleColon) && is_type_scope {
                return self.parse_type();
            }
        }
        self.advance();
        if self.check(&TokenKind::LeftParen) {
            let arguments = self.parse_arguments()?;
            return Ok(self.push_from(
                NodeKind::MethodCall {
                    scope: None,
                    type_arguments: Vec::new(),
                    name,
                    arguments,
                },
                start,
            ));
        }
        Ok(self.push_from(NodeKind::Name(name), start))
    }

    /// A primitive keyword in expression position: `int.class`, `int[]::new`,
    /// or a bare name (`int` as a type descriptor in markup).
    fn parse_primitive_primary(&mut self, keyword: Keyword) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        if let Some(end) = self.scan_type(self.current) {
            let after = self.kind_at(end);
            if matches!(after, TokenKind::Dot) && self.kind_at(end + 1).is_keyword(Keyword::Class) {
                return self.parse_class_literal();
            }
            if matches!(after, TokenKind::DoubleColon) {
                return self.parse_type();
            }
        }
        self.advance();
        Ok(self.push_from(NodeKind::Name(keyword.as_str().into()), start))
    }

    /// `Type.class`
    fn parse_class_literal(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Dot, "'.'")?;
        self.expect_keyword(Keyword::Class)?;
        Ok(self.push_from(NodeKind::ClassExpr { ty }, start))
    }

    /// `void.class`
    fn parse_void_class_literal(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let ty = self.parse_type_or_void()?;
        self.expect(&TokenKind::Dot, "'.'")?;
        self.expect_keyword(Keyword::Class)?;
        Ok(self.push_from(NodeKind::ClassExpr { ty }, start))
    }

    /// Parses `new T(args) [{ body }]` or `new T[n][]... [{ init }]`. The
    /// `new` keyword is the current token; `start` covers any scope.
    fn parse_creation(&mut self, scope: Option<NodeId>, start: u32) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::New)?;
        let element_type = self.parse_non_array_type()?;
        if self.check(&TokenKind::LeftBracket) {
            let mut dimensions = Vec::new();
            let mut extra_dims = 0;
            while self.check(&TokenKind::LeftBracket) {
                self.advance();
                if self.match_token(&TokenKind::RightBracket) {
                    extra_dims += 1;
                    continue;
                }
                if extra_dims > 0 {
                    return Err(self.unexpected("']'"));
                }
                dimensions.push(self.parse_expression()?);
                self.expect(&TokenKind::RightBracket, "']'")?;
            }
            let initializer = if self.check(&TokenKind::LeftBrace) {
                Some(self.parse_array_initializer()?)
            } else {
                None
            };
            if dimensions.is_empty() && initializer.is_none() {
                return Err(self.unexpected("array dimension or initializer"));
            }
            return Ok(self.push_from(
                NodeKind::ArrayCreation {
                    element_type,
                    dimensions,
                    extra_dims,
                    initializer,
                },
                start,
            ));
        }
        let arguments = self.parse_arguments()?;
        let body = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_class_body()?)
        } else {
            None
        };
        Ok(self.push_from(
            NodeKind::ObjectCreation {
                scope,
                ty: element_type,
                arguments,
                body,
            },
            start,
        ))
    }

    /// Parses `{ a, { b }, }` as used by array creation and variable
    /// initializers.
    pub(super) fn parse_array_initializer(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::LeftBrace, "'{'")?;
            let mut values = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                let value = if p.check(&TokenKind::LeftBrace) {
                    p.parse_array_initializer()?
                } else {
                    p.parse_expression()?
                };
                values.push(value);
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBrace, "'}'")?;
            Ok(p.push_from(NodeKind::ArrayInitializer { values }, start))
        })
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    /// Returns true at `x ->` or `( ... ) ->`.
    fn at_lambda(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier(_) => matches!(self.peek_kind(1), TokenKind::Arrow),
            TokenKind::LeftParen => self
                .matching_paren(self.current)
                .is_some_and(|close| matches!(self.kind_at(close + 1), TokenKind::Arrow)),
            _ => false,
        }
    }

    /// Index of the `)` matching the `(` at `open`.
    pub(super) fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        loop {
            match self.kind_at(i) {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_lambda(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut parameters = Vec::new();
        let parenthesized = self.match_token(&TokenKind::LeftParen);
        if parenthesized {
            while !self.check(&TokenKind::RightParen) {
                parameters.push(self.parse_lambda_parameter()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen, "')'")?;
        } else {
            parameters.push(self.parse_lambda_parameter()?);
        }
        self.expect(&TokenKind::Arrow, "'->'")?;
        let body = if self.check(&TokenKind::LeftBrace) {
            self.parse_block()?
        } else {
            self.parse_expression()?
        };
        Ok(self.push_from(
            NodeKind::Lambda {
                parameters,
                body,
                parenthesized,
            },
            start,
        ))
    }

    /// A bare name or a typed parameter.
    fn parse_lambda_parameter(&mut self) -> Result<NodeId, ParseError> {
        let untyped = self.current_kind().is_identifier()
            && matches!(
                self.peek_kind(1),
                TokenKind::Comma | TokenKind::RightParen | TokenKind::Arrow
            );
        if !untyped {
            return self.parse_parameter();
        }
        let start = self.current_start();
        let name = self.expect_identifier("parameter name")?;
        Ok(self.push_from(
            NodeKind::Parameter {
                annotations: Vec::new(),
                modifiers: Vec::new(),
                ty: None,
                is_varargs: false,
                name,
            },
            start,
        ))
    }
}
