// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type parsing.
//!
//! Also provides [`Parser::scan_type`], a non-allocating lookahead used to
//! tell declarations, casts and class literals apart from expressions.

use crate::ast::{NodeId, NodeKind};
use crate::source_analysis::{Keyword, ParseError, TokenKind};

use super::{MAX_NESTING_DEPTH, Parser};

impl Parser<'_> {
    /// Parses a type, or `void`.
    pub(super) fn parse_type_or_void(&mut self) -> Result<NodeId, ParseError> {
        if self.check_keyword(Keyword::Void) {
            let start = self.current_start();
            self.advance();
            return Ok(self.push_from(NodeKind::VoidType, start));
        }
        self.parse_type()
    }

    /// Parses a primitive or class type with any `[]` suffixes.
    pub(super) fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            let base = p.parse_non_array_type()?;
            p.parse_array_dims(base, start)
        })
    }

    /// Wraps `ty` in one [`NodeKind::ArrayType`] per `[]` pair.
    pub(super) fn parse_array_dims(&mut self, ty: NodeId, start: u32) -> Result<NodeId, ParseError> {
        let mut ty = ty;
        while self.check(&TokenKind::LeftBracket) && matches!(self.peek_kind(1), TokenKind::RightBracket)
        {
            self.advance_by(2);
            ty = self.push_from(NodeKind::ArrayType { component: ty }, start);
        }
        Ok(ty)
    }

    pub(super) fn parse_non_array_type(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Keyword(keyword) if keyword.is_primitive_type() => {
                let keyword = *keyword;
                let start = self.current_start();
                self.advance();
                Ok(self.push_from(NodeKind::PrimitiveType(keyword), start))
            }
            TokenKind::Identifier(_) => self.parse_class_type(),
            _ => Err(self.unexpected("type")),
        }
    }

    /// Parses `a.b.C<T>.D`, each segment scoped by the one before it.
    fn parse_class_type(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let mut scope = None;
        loop {
            let name = self.expect_identifier("type name")?;
            let type_arguments = if self.check_operator("<") {
                Some(self.parse_type_arguments()?)
            } else {
                None
            };
            let id = self.push_from(
                NodeKind::ClassOrInterfaceType {
                    scope,
                    name,
                    type_arguments,
                },
                start,
            );
            if self.check(&TokenKind::Dot) && self.peek_kind(1).is_identifier() {
                self.advance();
                scope = Some(id);
            } else {
                return Ok(id);
            }
        }
    }

    /// Parses `<A, ? extends B>` or the diamond `<>`.
    pub(super) fn parse_type_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_operator("<")?;
        let mut arguments = Vec::new();
        if self.match_operator(">") {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_type_argument()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_operator(">")?;
        Ok(arguments)
    }

    fn parse_type_argument(&mut self) -> Result<NodeId, ParseError> {
        if !self.check(&TokenKind::Question) {
            return self.parse_type();
        }
        let start = self.current_start();
        self.advance();
        let mut extends = None;
        let mut super_bound = None;
        if self.match_keyword(Keyword::Extends) {
            extends = Some(self.parse_type()?);
        } else if self.match_keyword(Keyword::Super) {
            super_bound = Some(self.parse_type()?);
        }
        Ok(self.push_from(
            NodeKind::WildcardType {
                extends,
                super_bound,
            },
            start,
        ))
    }

    /// Parses `<T extends A & B, U>`.
    pub(super) fn parse_type_parameters(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_operator("<")?;
        let mut parameters = Vec::new();
        loop {
            let start = self.current_start();
            let name = self.expect_identifier("type parameter")?;
            let mut bounds = Vec::new();
            if self.match_keyword(Keyword::Extends) {
                bounds.push(self.parse_type()?);
                while self.match_operator("&") {
                    bounds.push(self.parse_type()?);
                }
            }
            parameters.push(self.push_from(NodeKind::TypeParameter { name, bounds }, start));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_operator(">")?;
        Ok(parameters)
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Returns the index just past a type starting at token `at`, without
    /// consuming or allocating anything.
    pub(super) fn scan_type(&self, at: usize) -> Option<usize> {
        self.scan_type_at_depth(at, 0)
    }

    fn scan_type_at_depth(&self, at: usize, depth: usize) -> Option<usize> {
        if depth > MAX_NESTING_DEPTH {
            return None;
        }
        let mut i = match self.kind_at(at) {
            TokenKind::Keyword(keyword) if keyword.is_primitive_type() => at + 1,
            TokenKind::Identifier(_) => self.scan_class_type(at, depth)?,
            _ => return None,
        };
        while matches!(self.kind_at(i), TokenKind::LeftBracket)
            && matches!(self.kind_at(i + 1), TokenKind::RightBracket)
        {
            i += 2;
        }
        Some(i)
    }

    fn scan_class_type(&self, at: usize, depth: usize) -> Option<usize> {
        let mut i = at;
        loop {
            if !self.kind_at(i).is_identifier() {
                return None;
            }
            i += 1;
            if self.kind_at(i).is_operator("<") {
                i = self.scan_type_arguments(i, depth + 1)?;
            }
            if matches!(self.kind_at(i), TokenKind::Dot) && self.kind_at(i + 1).is_identifier() {
                i += 1;
            } else {
                return Some(i);
            }
        }
    }

    fn scan_type_arguments(&self, at: usize, depth: usize) -> Option<usize> {
        let mut i = at + 1;
        if self.kind_at(i).is_operator(">") {
            return Some(i + 1);
        }
        loop {
            if matches!(self.kind_at(i), TokenKind::Question) {
                i += 1;
                let kind = self.kind_at(i);
                if kind.is_keyword(Keyword::Extends) || kind.is_keyword(Keyword::Super) {
                    i = self.scan_type_at_depth(i + 1, depth)?;
                }
            } else {
                i = self.scan_type_at_depth(i, depth)?;
            }
            match self.kind_at(i) {
                TokenKind::Comma => i += 1,
                kind if kind.is_operator(">") => return Some(i + 1),
                _ => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::source_analysis::parser::EntryPoint;
    use crate::source_analysis::parser::tests::{parse_err, parse_ok};
    use crate::source_analysis::{Keyword, lex};

    use super::super::Parser;

    fn scan(source: &str) -> Option<usize> {
        let tokens = lex(source).unwrap();
        Parser::new(source, tokens).scan_type(0)
    }

    #[test]
    fn parse_primitive_and_array() {
        let tree = parse_ok("int[][]", EntryPoint::Type);
        let NodeKind::ArrayType { component } = tree.kind(tree.root()) else {
            panic!("expected array type");
        };
        let NodeKind::ArrayType { component } = tree.kind(*component) else {
            panic!("expected nested array type");
        };
        assert_eq!(tree.kind(*component), &NodeKind::PrimitiveType(Keyword::Int));
    }

    #[test]
    fn parse_nested_generics_close_with_single_tokens() {
        let tree = parse_ok("Map<String, List<List<Integer>>>", EntryPoint::Type);
        let NodeKind::ClassOrInterfaceType {
            name,
            type_arguments: Some(args),
            ..
        } = tree.kind(tree.root())
        else {
            panic!("expected class type");
        };
        assert_eq!(name, "Map");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn parse_scoped_type() {
        let tree = parse_ok("java.util.Map.Entry<K, V>", EntryPoint::Type);
        let NodeKind::ClassOrInterfaceType {
            scope: Some(scope),
            name,
            ..
        } = tree.kind(tree.root())
        else {
            panic!("expected scoped type");
        };
        assert_eq!(name, "Entry");
        assert!(matches!(
            tree.kind(*scope),
            NodeKind::ClassOrInterfaceType { name, .. } if name == "Map"
        ));
    }

    #[test]
    fn parse_wildcards_and_diamond() {
        let tree = parse_ok("Foo<? extends A, ?, ? super B>", EntryPoint::Type);
        assert_eq!(tree.children(tree.root()).len(), 3);
        let tree = parse_ok("Foo<>", EntryPoint::Type);
        assert!(matches!(
            tree.kind(tree.root()),
            NodeKind::ClassOrInterfaceType { type_arguments: Some(args), .. } if args.is_empty()
        ));
    }

    #[test]
    fn parse_void_only_at_type_entry() {
        let tree = parse_ok("void", EntryPoint::Type);
        assert_eq!(tree.kind(tree.root()), &NodeKind::VoidType);
        parse_err("void[]", EntryPoint::Type);
    }

    #[test]
    fn scan_recognises_types() {
        assert_eq!(scan("List<String> x"), Some(4));
        assert_eq!(scan("a.b.C[] x"), Some(7));
        assert_eq!(scan("int x"), Some(1));
    }

    #[test]
    fn scan_rejects_comparisons() {
        assert_eq!(scan("a < b;"), None);
        assert_eq!(scan("1 + 2"), None);
    }

    #[test]
    fn scan_bails_out_on_deep_nesting() {
        let source = format!("{}x", "a<".repeat(500));
        assert_eq!(scan(&source), None);
    }
}
