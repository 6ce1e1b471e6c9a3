// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.

use crate::ast::{NodeId, NodeKind};
use crate::source_analysis::{Keyword, ParseError, TokenKind};

use super::Parser;

impl Parser<'_> {
    /// Parses `{ statements }`.
    pub(super) fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        self.guarded(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::LeftBrace, "'{'")?;
            let mut statements = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                if p.is_at_end() {
                    return Err(p.unexpected("'}'"));
                }
                statements.push(p.parse_statement()?);
            }
            p.advance();
            Ok(p.push_from(NodeKind::Block { statements }, start))
        })
    }

    /// Parses one statement, including local variable and local class
    /// declarations.
    pub(super) fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        match self.current_kind().clone() {
            TokenKind::LeftBrace => return self.parse_block(),
            TokenKind::Semicolon => {
                self.advance();
                return Ok(self.push_from(NodeKind::Empty, start));
            }
            TokenKind::Identifier(_) if matches!(self.peek_kind(1), TokenKind::Colon) => {
                let label = self.expect_identifier("label")?;
                self.advance();
                let statement = self.parse_statement()?;
                return Ok(self.push_from(NodeKind::Labeled { label, statement }, start));
            }
            TokenKind::Keyword(keyword) => {
                if let Some(statement) = self.parse_keyword_statement(keyword, start)? {
                    return Ok(statement);
                }
            }
            _ => {}
        }

        if self.at_local_type_declaration() {
            let modifiers = self.parse_modifiers()?;
            let declaration = self.parse_type_declaration(modifiers)?;
            return Ok(self.push_from(NodeKind::TypeDeclarationStmt { declaration }, start));
        }
        let expression = if self.at_local_variable_declaration() {
            self.parse_variable_declaration_expr()?
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::Semicolon, "';'")?;
        Ok(self.push_from(NodeKind::ExpressionStmt { expression }, start))
    }

    /// Parses statements introduced by a keyword. Returns `None` for keywords
    /// that start an expression or declaration instead.
    fn parse_keyword_statement(
        &mut self,
        keyword: Keyword,
        start: u32,
    ) -> Result<Option<NodeId>, ParseError> {
        let kind = match keyword {
            Keyword::If => self.parse_if()?,
            Keyword::While => {
                self.advance();
                let condition = self.parse_parenthesized()?;
                let body = self.parse_statement()?;
                NodeKind::While { condition, body }
            }
            Keyword::Do => {
                self.advance();
                let body = self.parse_statement()?;
                self.expect_keyword(Keyword::While)?;
                let condition = self.parse_parenthesized()?;
                self.expect(&TokenKind::Semicolon, "';'")?;
                NodeKind::Do { body, condition }
            }
            Keyword::For => self.parse_for()?,
            Keyword::Return => {
                self.advance();
                let expression = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(&TokenKind::Semicolon, "';'")?;
                NodeKind::Return { expression }
            }
            Keyword::Break | Keyword::Continue => {
                self.advance();
                let label = match self.current_kind() {
                    TokenKind::Identifier(name) => {
                        let name = name.clone();
                        self.advance();
                        Some(name)
                    }
                    _ => None,
                };
                self.expect(&TokenKind::Semicolon, "';'")?;
                if keyword == Keyword::Break {
                    NodeKind::Break { label }
                } else {
                    NodeKind::Continue { label }
                }
            }
            Keyword::Throw => {
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon, "';'")?;
                NodeKind::Throw { expression }
            }
            Keyword::Try => self.parse_try()?,
            Keyword::Switch => self.parse_switch()?,
            Keyword::Synchronized if matches!(self.peek_kind(1), TokenKind::LeftParen) => {
                self.advance();
                let lock = self.parse_parenthesized()?;
                let body = self.parse_block()?;
                NodeKind::Synchronized { lock, body }
            }
            Keyword::Assert => {
                self.advance();
                let check = self.parse_expression()?;
                let message = if self.match_token(&TokenKind::Colon) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                self.expect(&TokenKind::Semicolon, "';'")?;
                NodeKind::Assert { check, message }
            }
            Keyword::This | Keyword::Super if self.at_constructor_invocation() => {
                self.advance();
                let arguments = self.parse_arguments()?;
                self.expect(&TokenKind::Semicolon, "';'")?;
                NodeKind::ExplicitConstructorInvocation {
                    is_this: keyword == Keyword::This,
                    arguments,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(self.push_from(kind, start)))
    }

    /// `this(...);` or `super(...);` as opposed to `this(...)` inside an
    /// expression.
    fn at_constructor_invocation(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::LeftParen)
    }

    /// Parses `( expression )`.
    fn parse_parenthesized(&mut self) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let expression = self.parse_expression()?;
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(expression)
    }

    fn parse_if(&mut self) -> Result<NodeKind, ParseError> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_parenthesized()?;
        let then_stmt = self.parse_statement()?;
        let else_stmt = if self.match_keyword(Keyword::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(NodeKind::If {
            condition,
            then_stmt,
            else_stmt,
        })
    }

    /// Parses classic `for (init; compare; update)` and enhanced
    /// `for (T x : iterable)` loops.
    fn parse_for(&mut self) -> Result<NodeKind, ParseError> {
        self.expect_keyword(Keyword::For)?;
        self.expect(&TokenKind::LeftParen, "'('")?;

        let mut init = Vec::new();
        if self.at_local_variable_declaration() {
            let variable = self.parse_variable_declaration_expr()?;
            if self.match_token(&TokenKind::Colon) {
                let iterable = self.parse_expression()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                let body = self.parse_statement()?;
                return Ok(NodeKind::ForEach {
                    variable,
                    iterable,
                    body,
                });
            }
            init.push(variable);
        } else if !self.check(&TokenKind::Semicolon) {
            init = self.parse_expression_list()?;
        }
        self.expect(&TokenKind::Semicolon, "';'")?;

        let compare = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "';'")?;

        let update = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen, "')'")?;
        let body = self.parse_statement()?;
        Ok(NodeKind::For {
            init,
            compare,
            update,
            body,
        })
    }

    fn parse_expression_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut expressions = vec![self.parse_expression()?];
        while self.match_token(&TokenKind::Comma) {
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    fn parse_try(&mut self) -> Result<NodeKind, ParseError> {
        self.expect_keyword(Keyword::Try)?;
        let mut resources = Vec::new();
        if self.match_token(&TokenKind::LeftParen) {
            while !self.check(&TokenKind::RightParen) {
                let resource = if self.at_local_variable_declaration() {
                    self.parse_variable_declaration_expr()?
                } else {
                    self.parse_expression()?
                };
                resources.push(resource);
                if !self.match_token(&TokenKind::Semicolon) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen, "')'")?;
        }
        let try_block = self.parse_block()?;

        let mut catch_clauses = Vec::new();
        while self.check_keyword(Keyword::Catch) {
            let start = self.current_start();
            self.advance();
            self.expect(&TokenKind::LeftParen, "'('")?;
            let parameter = self.parse_catch_parameter()?;
            self.expect(&TokenKind::RightParen, "')'")?;
            let body = self.parse_block()?;
            catch_clauses.push(self.push_from(NodeKind::CatchClause { parameter, body }, start));
        }
        let finally_block = if self.match_keyword(Keyword::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if resources.is_empty() && catch_clauses.is_empty() && finally_block.is_none() {
            return Err(self.unexpected("'catch' or 'finally'"));
        }
        Ok(NodeKind::Try {
            resources,
            try_block,
            catch_clauses,
            finally_block,
        })
    }

    /// `final IOException | RuntimeException e`
    fn parse_catch_parameter(&mut self) -> Result<NodeId, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let type_start = self.current_start();
        let first = self.parse_type()?;
        let ty = if self.check_operator("|") {
            let mut elements = vec![first];
            while self.match_operator("|") {
                elements.push(self.parse_type()?);
            }
            self.push_from(NodeKind::UnionType { elements }, type_start)
        } else {
            first
        };
        let name = self.expect_identifier("parameter name")?;
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::Parameter {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                ty: Some(ty),
                is_varargs: false,
                name,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    /// Parses `switch (e) { case a: ... default: ... }`.
    fn parse_switch(&mut self) -> Result<NodeKind, ParseError> {
        self.expect_keyword(Keyword::Switch)?;
        let selector = self.parse_parenthesized()?;
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            let start = self.current_start();
            let label = if self.match_keyword(Keyword::Case) {
                Some(self.parse_expression()?)
            } else if self.match_keyword(Keyword::Default) {
                None
            } else {
                return Err(self.unexpected("'case', 'default' or '}'"));
            };
            self.expect(&TokenKind::Colon, "':'")?;
            let mut statements = Vec::new();
            while !self.check(&TokenKind::RightBrace)
                && !self.check_keyword(Keyword::Case)
                && !self.check_keyword(Keyword::Default)
            {
                if self.is_at_end() {
                    return Err(self.unexpected("'}'"));
                }
                statements.push(self.parse_statement()?);
            }
            entries.push(self.push_from(NodeKind::SwitchEntry { label, statements }, start));
        }
        self.expect(&TokenKind::RightBrace, "'}'")?;
        Ok(NodeKind::Switch { selector, entries })
    }

    // ========================================================================
    // Local declarations
    // ========================================================================

    /// Index of the first token after leading `final` modifiers and
    /// annotations, without consuming anything.
    fn skip_local_modifiers(&self) -> usize {
        let mut i = self.current;
        loop {
            match self.kind_at(i) {
                TokenKind::Keyword(keyword) if keyword.is_modifier() => i += 1,
                TokenKind::At if !self.kind_at(i + 1).is_keyword(Keyword::Interface) => {
                    i += 1;
                    while self.kind_at(i).is_identifier()
                        || matches!(self.kind_at(i), TokenKind::Dot)
                    {
                        i += 1;
                    }
                    if matches!(self.kind_at(i), TokenKind::LeftParen) {
                        match self.matching_paren(i) {
                            Some(close) => i = close + 1,
                            None => return i,
                        }
                    }
                }
                _ => return i,
            }
        }
    }

    /// `Type name` ahead, possibly after `final` and annotations.
    pub(super) fn at_local_variable_declaration(&self) -> bool {
        let i = self.skip_local_modifiers();
        self.scan_type(i)
            .is_some_and(|end| self.kind_at(end).is_identifier())
    }

    /// `class`, `interface` or `enum` ahead, possibly after modifiers.
    fn at_local_type_declaration(&self) -> bool {
        let i = self.skip_local_modifiers();
        matches!(
            self.kind_at(i),
            TokenKind::Keyword(Keyword::Class | Keyword::Interface | Keyword::Enum)
        )
    }

    /// Parses `final int a = 1, b[] = {2}` without the trailing `;`.
    pub(super) fn parse_variable_declaration_expr(&mut self) -> Result<NodeId, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let ty = self.parse_type()?;
        let variables = self.parse_variable_declarators()?;
        let span = self.span_from(modifiers.start);
        Ok(self.builder.push_annotated(
            NodeKind::VariableDeclarationExpr {
                annotations: modifiers.annotations,
                modifiers: modifiers.keywords,
                ty,
                variables,
            },
            span,
            modifiers.unannotated_start,
        ))
    }

    /// Parses `a = 1, b[] = { 2 }`.
    pub(super) fn parse_variable_declarators(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut variables = Vec::new();
        loop {
            let start = self.current_start();
            let name = self.expect_identifier("variable name")?;
            variables.push(self.parse_variable_declarator_rest(name, start)?);
            if !self.match_token(&TokenKind::Comma) {
                return Ok(variables);
            }
        }
    }

    /// Parses the `[] = init` part of a declarator whose name is consumed.
    pub(super) fn parse_variable_declarator_rest(
        &mut self,
        name: ecow::EcoString,
        start: u32,
    ) -> Result<NodeId, ParseError> {
        let mut array_dims = 0;
        while self.check(&TokenKind::LeftBracket) && matches!(self.peek_kind(1), TokenKind::RightBracket)
        {
            self.advance_by(2);
            array_dims += 1;
        }
        let init = if self.match_operator("=") {
            if self.check(&TokenKind::LeftBrace) {
                Some(self.parse_array_initializer()?)
            } else {
                Some(self.parse_expression()?)
            }
        } else {
            None
        };
        Ok(self.push_from(
            NodeKind::VariableDeclarator {
                name,
                array_dims,
                init,
            },
            start,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{NodeKind, SyntaxTree};
    use crate::source_analysis::Keyword;
    use crate::source_analysis::parser::EntryPoint;
    use crate::source_analysis::parser::tests::{parse_err, parse_ok};

    fn stmt(source: &str) -> SyntaxTree {
        parse_ok(source, EntryPoint::Statement)
    }

    fn root_kind(tree: &SyntaxTree) -> &NodeKind {
        tree.kind(tree.root())
    }

    #[test]
    fn parse_local_variable_declaration() {
        let tree = stmt("final List<String> a = f(), b;");
        let NodeKind::ExpressionStmt { expression } = root_kind(&tree) else {
            panic!("expected expression statement");
        };
        let NodeKind::VariableDeclarationExpr {
            modifiers,
            variables,
            ..
        } = tree.kind(*expression)
        else {
            panic!("expected declaration");
        };
        assert_eq!(modifiers, &[Keyword::Final]);
        assert_eq!(variables.len(), 2);
    }

    #[test]
    fn comparison_statement_is_not_a_declaration() {
        let tree = stmt("a < b;");
        let NodeKind::ExpressionStmt { expression } = root_kind(&tree) else {
            panic!("expected expression statement");
        };
        assert!(matches!(tree.kind(*expression), NodeKind::Binary { .. }));
    }

    #[test]
    fn parse_if_else_chain() {
        let tree = stmt("if (a) b(); else if (c) d(); else { e(); }");
        let NodeKind::If {
            else_stmt: Some(else_stmt),
            ..
        } = root_kind(&tree)
        else {
            panic!("expected if");
        };
        assert!(matches!(tree.kind(*else_stmt), NodeKind::If { .. }));
    }

    #[test]
    fn parse_loops() {
        assert!(matches!(
            root_kind(&stmt("for (int i = 0, j = 1; i < n; i++, j--) {}")),
            NodeKind::For { init, update, compare: Some(_), .. } if init.len() == 1 && update.len() == 2
        ));
        assert!(matches!(root_kind(&stmt("for (;;) ;")), NodeKind::For { compare: None, .. }));
        assert!(matches!(
            root_kind(&stmt("for (String s : items) use(s);")),
            NodeKind::ForEach { .. }
        ));
        assert!(matches!(root_kind(&stmt("while (x) x--;")), NodeKind::While { .. }));
        assert!(matches!(root_kind(&stmt("do { x++; } while (x < 3);")), NodeKind::Do { .. }));
    }

    #[test]
    fn parse_try_forms() {
        let tree = stmt(
            "try (InputStream in = open(); out) { run(); } \
             catch (IOException | RuntimeException e) {} finally { close(); }",
        );
        let NodeKind::Try {
            resources,
            catch_clauses,
            finally_block,
            ..
        } = root_kind(&tree)
        else {
            panic!("expected try");
        };
        assert_eq!(resources.len(), 2);
        assert_eq!(catch_clauses.len(), 1);
        assert!(finally_block.is_some());
        let NodeKind::CatchClause { parameter, .. } = tree.kind(catch_clauses[0]) else {
            panic!("expected catch");
        };
        let NodeKind::Parameter { ty: Some(ty), .. } = tree.kind(*parameter) else {
            panic!("expected parameter");
        };
        assert!(matches!(tree.kind(*ty), NodeKind::UnionType { elements } if elements.len() == 2));

        parse_err("try {}", EntryPoint::Statement);
    }

    #[test]
    fn parse_switch() {
        let tree = stmt("switch (x) { case 1: case 2: a(); break; default: b(); }");
        let NodeKind::Switch { entries, .. } = root_kind(&tree) else {
            panic!("expected switch");
        };
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            tree.kind(entries[2]),
            NodeKind::SwitchEntry { label: None, statements } if statements.len() == 1
        ));
    }

    #[test]
    fn parse_simple_statements() {
        assert!(matches!(root_kind(&stmt("return;")), NodeKind::Return { expression: None }));
        assert!(matches!(root_kind(&stmt("break outer;")), NodeKind::Break { label: Some(_) }));
        assert!(matches!(root_kind(&stmt("continue;")), NodeKind::Continue { label: None }));
        assert!(matches!(root_kind(&stmt("throw e;")), NodeKind::Throw { .. }));
        assert!(matches!(root_kind(&stmt(";")), NodeKind::Empty));
        assert!(matches!(
            root_kind(&stmt("assert x : \"msg\";")),
            NodeKind::Assert { message: Some(_), .. }
        ));
        assert!(matches!(
            root_kind(&stmt("synchronized (lock) { x++; }")),
            NodeKind::Synchronized { .. }
        ));
        assert!(matches!(
            root_kind(&stmt("outer: for (;;) {}")),
            NodeKind::Labeled { label, .. } if label == "outer"
        ));
    }

    #[test]
    fn parse_constructor_invocations() {
        assert!(matches!(
            root_kind(&stmt("this(1, 2);")),
            NodeKind::ExplicitConstructorInvocation { is_this: true, arguments } if arguments.len() == 2
        ));
        assert!(matches!(
            root_kind(&stmt("super();")),
            NodeKind::ExplicitConstructorInvocation { is_this: false, .. }
        ));
    }

    #[test]
    fn parse_local_class() {
        assert!(matches!(
            root_kind(&stmt("final class Local { }")),
            NodeKind::TypeDeclarationStmt { .. }
        ));
    }

    #[test]
    fn missing_semicolon_is_an_error() {
        parse_err("x = 1", EntryPoint::Statement);
        parse_err("{ a(); ", EntryPoint::Block);
    }
}
