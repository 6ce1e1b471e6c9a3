// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Markup extensions: tag containers, json containers and template literals.
//!
//! ```text
//! <element-def name="box" attributes={ size: <int required/> }/>
//! { key: value, "other": [1, 2,] }
//! `Hello ${user.name}!`
//! ```

use std::mem;

use ecow::EcoString;

use crate::ast::{Literal, NodeId, NodeKind};
use crate::source_analysis::{ParseError, ParseErrorKind, Span, TokenKind, lex_range};

use super::Parser;

impl Parser<'_> {
    // ========================================================================
    // Tag containers
    // ========================================================================

    /// Parses `<name attr=value ...>body</name>` or `<name attr ... />`.
    pub(super) fn parse_tag_container(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect_operator("<")?;
            let name = p.parse_markup_name("tag name")?;

            let mut attributes = Vec::new();
            loop {
                if p.check_operator("/") && p.peek_kind(1).is_operator(">") {
                    p.advance_by(2);
                    return Ok(p.push_from(
                        NodeKind::UiContainer {
                            name,
                            attributes,
                            body: None,
                        },
                        start,
                    ));
                }
                if p.match_operator(">") {
                    break;
                }
                attributes.push(p.parse_markup_attribute()?);
            }

            let body_start = p.current_start();
            let mut children = Vec::new();
            while !p.at_closing_tag() {
                if p.is_at_end() {
                    return Err(p.unexpected(&format!("'</{name}>'")));
                }
                children.push(p.parse_expression()?);
                p.match_token(&TokenKind::Comma);
            }
            let body = p.push_from(NodeKind::UiBody { children }, body_start);

            p.advance_by(2);
            let close_start = p.current_start();
            let closing = p.parse_markup_name("closing tag name")?;
            if closing != name {
                return Err(p.error(
                    ParseErrorKind::MismatchedClosingTag {
                        expected: name,
                        found: closing,
                    },
                    p.span_from(close_start),
                ));
            }
            p.expect_operator(">")?;
            Ok(p.push_from(
                NodeKind::UiContainer {
                    name,
                    attributes,
                    body: Some(body),
                },
                start,
            ))
        })
    }

    /// `</` with nothing between the two characters.
    fn at_closing_tag(&self) -> bool {
        self.check_operator("<")
            && self.peek_kind(1).is_operator("/")
            && self.is_adjacent(self.current + 1)
    }

    /// Parses a markup name: words joined by adjacent `-`, as in
    /// `element-def` or `list-or-map`. Keywords count as words.
    fn parse_markup_name(&mut self, expected: &str) -> Result<EcoString, ParseError> {
        let Some(first) = self.current_kind().word() else {
            return Err(self.unexpected(expected));
        };
        let mut name = EcoString::from(first);
        self.advance();
        while self.check_operator("-")
            && self.is_adjacent(self.current)
            && self.is_adjacent(self.current + 1)
        {
            let Some(word) = self.peek_kind(1).word() else {
                break;
            };
            name.push('-');
            name.push_str(word);
            self.advance_by(2);
        }
        Ok(name)
    }

    /// Parses `name=value` or a bare `name`.
    fn parse_markup_attribute(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_start();
        let name = self.parse_markup_name("attribute name or '>'")?;
        let value = if self.match_operator("=") {
            Some(self.parse_unary()?)
        } else {
            None
        };
        Ok(self.push_from(NodeKind::UiAttribute { name, value }, start))
    }

    // ========================================================================
    // Json containers
    // ========================================================================

    /// Parses a json container as a whole document.
    pub(super) fn parse_json_document(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::LeftBrace => self.parse_json_object(),
            TokenKind::LeftBracket => self.parse_json_array(),
            _ => Err(self.unexpected("'{' or '['")),
        }
    }

    /// Parses `{ key: value, ... }`. Keys must be unique.
    pub(super) fn parse_json_object(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::LeftBrace, "'{'")?;
            let mut pairs = Vec::new();
            let mut keys: Vec<EcoString> = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                let pair_start = p.current_start();
                let (key, text) = p.parse_json_key()?;
                if keys.contains(&text) {
                    let span = p.node_span(key);
                    return Err(p.error(ParseErrorKind::DuplicateJsonKey(text), span));
                }
                keys.push(text);
                p.expect(&TokenKind::Colon, "':'")?;
                let value = p.parse_expression()?;
                pairs.push(p.push_from(
                    NodeKind::JsonPair {
                        key: Some(key),
                        value,
                    },
                    pair_start,
                ));
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBrace, "'}'")?;
            Ok(p.push_from(
                NodeKind::JsonContainer {
                    is_array: false,
                    pairs,
                },
                start,
            ))
        })
    }

    /// A key node and its text: a markup name, a string or a number.
    fn parse_json_key(&mut self) -> Result<(NodeId, EcoString), ParseError> {
        let start = self.current_start();
        let literal = match self.current_kind().clone() {
            TokenKind::String(text) => Literal::String(text),
            TokenKind::Integer(text) => Literal::Integer(text),
            TokenKind::Long(text) => Literal::Long(text),
            TokenKind::Floating(text) => Literal::Double(text),
            _ => {
                let name = self.parse_markup_name("json key")?;
                let key = self.push_from(NodeKind::Name(name.clone()), start);
                return Ok((key, name));
            }
        };
        self.advance();
        let text = match &literal {
            Literal::String(text)
            | Literal::Integer(text)
            | Literal::Long(text)
            | Literal::Double(text) => text.clone(),
            _ => EcoString::new(),
        };
        Ok((self.push_from(NodeKind::Literal(literal), start), text))
    }

    /// Parses `[ value, ... ]`.
    pub(super) fn parse_json_array(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let start = p.current_start();
            p.expect(&TokenKind::LeftBracket, "'['")?;
            let mut pairs = Vec::new();
            while !p.check(&TokenKind::RightBracket) {
                let value_start = p.current_start();
                let value = p.parse_expression()?;
                pairs.push(p.push_from(NodeKind::JsonPair { key: None, value }, value_start));
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBracket, "']'")?;
            Ok(p.push_from(
                NodeKind::JsonContainer {
                    is_array: true,
                    pairs,
                },
                start,
            ))
        })
    }

    // ========================================================================
    // Template literals
    // ========================================================================

    /// Parses the current template token. Each `${...}` segment of `raw` is
    /// lexed and parsed in place as an expression.
    pub(super) fn parse_template_literal(&mut self, raw: EcoString) -> Result<NodeId, ParseError> {
        let token = self.advance();
        // skip the opening backtick
        let content_start = token.span().start() + 1;

        let mut interpolations = Vec::new();
        for segment in interpolation_ranges(&raw) {
            let Some((from, to)) = segment else {
                return Err(self.error(ParseErrorKind::UnterminatedInterpolation, token.span()));
            };
            let range = Span::from(content_start as usize + from..content_start as usize + to);
            interpolations.push(self.parse_interpolation(range)?);
        }

        Ok(self.push(
            NodeKind::TemplateLiteral {
                raw,
                interpolations,
            },
            token.span(),
        ))
    }

    /// Parses the expression at `range` with a token stream of its own.
    fn parse_interpolation(&mut self, range: Span) -> Result<NodeId, ParseError> {
        let tokens = lex_range(self.builder.source(), range)?;
        let saved_tokens = mem::replace(&mut self.tokens, tokens);
        let saved_current = mem::replace(&mut self.current, 0);
        let result = self.parse_expression().and_then(|expression| {
            self.expect_end()?;
            Ok(expression)
        });
        self.tokens = saved_tokens;
        self.current = saved_current;
        result
    }
}

/// Byte ranges (relative to `raw`) of the expressions inside each `${...}`.
/// An unterminated segment yields `None` and ends the scan.
fn interpolation_ranges(raw: &str) -> Vec<Option<(usize, usize)>> {
    let bytes = raw.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let from = i + 2;
                let mut depth = 1usize;
                let mut j = from;
                while j < bytes.len() && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                if depth > 0 {
                    ranges.push(None);
                    return ranges;
                }
                ranges.push(Some((from, j - 1)));
                i = j;
            }
            _ => i += 1,
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::interpolation_ranges;
    use crate::ast::{Literal, NodeKind, SyntaxTree};
    use crate::source_analysis::ParseErrorKind;
    use crate::source_analysis::parser::EntryPoint;
    use crate::source_analysis::parser::tests::{parse_err, parse_ok};

    fn tag(source: &str) -> SyntaxTree {
        parse_ok(source, EntryPoint::TagContainer)
    }

    #[test]
    fn self_closing_tag_with_attributes() {
        let tree = tag("<element-def name=\"box\" required size=3/>");
        let root = tree.root();
        assert_eq!(tree.tag_name(root), Some("element-def"));
        assert_eq!(tree.attribute_string(root, "name").as_deref(), Some("box"));
        assert_eq!(tree.attribute_string(root, "required").as_deref(), Some("true"));
        assert_eq!(tree.attribute_string(root, "size").as_deref(), Some("3"));
        assert!(tree.body_children(root).is_empty());
    }

    #[test]
    fn keyword_words_are_valid_names() {
        let tree = tag("<enum default=1 list-or-map/>");
        let root = tree.root();
        assert_eq!(tree.tag_name(root), Some("enum"));
        assert!(tree.has_attribute(root, "default"));
        assert!(tree.has_attribute(root, "list-or-map"));
    }

    #[test]
    fn body_holds_expressions() {
        let tree = tag("<many><string/>, <int/> x.y `t`</many>");
        let children = tree.body_children(tree.root());
        assert_eq!(children.len(), 4);
        assert_eq!(tree.tag_name(children[0]), Some("string"));
        assert_eq!(tree.tag_name(children[1]), Some("int"));
        assert_eq!(tree.dotted_name(children[2]).as_deref(), Some("x.y"));
        assert!(matches!(tree.kind(children[3]), NodeKind::TemplateLiteral { .. }));
    }

    #[test]
    fn body_may_contain_comparisons() {
        let tree = tag("<a>(b < c)</a>");
        assert_eq!(tree.body_children(tree.root()).len(), 1);
        let tree = tag("<a>b < c</a>");
        assert!(matches!(
            tree.kind(tree.body_children(tree.root())[0]),
            NodeKind::Binary { .. }
        ));
    }

    #[test]
    fn empty_body_is_present() {
        let tree = tag("<a></a>");
        assert!(matches!(
            tree.kind(tree.root()),
            NodeKind::UiContainer { body: Some(_), .. }
        ));
    }

    #[test]
    fn attribute_values_are_postfix_expressions() {
        let tree = tag("<a v=-1 w=f(x).y z={k: [1]} t=<b/>/>");
        let root = tree.root();
        assert!(matches!(
            tree.kind(tree.attribute_value(root, "v").unwrap()),
            NodeKind::Unary { .. }
        ));
        assert!(matches!(
            tree.kind(tree.attribute_value(root, "w").unwrap()),
            NodeKind::FieldAccess { .. }
        ));
        assert!(tree.is_json_object(tree.attribute_value(root, "z").unwrap()));
        assert_eq!(tree.tag_name(tree.attribute_value(root, "t").unwrap()), Some("b"));
    }

    #[test]
    fn mismatched_closing_tag() {
        let err = parse_err("<a>x</b>", EntryPoint::TagContainer);
        assert_eq!(
            err.kind,
            ParseErrorKind::MismatchedClosingTag {
                expected: "a".into(),
                found: "b".into()
            }
        );
    }

    #[test]
    fn unclosed_tag_is_an_error() {
        parse_err("<a>x", EntryPoint::TagContainer);
        parse_err("<a b=1", EntryPoint::TagContainer);
    }

    #[test]
    fn json_object_keys() {
        let tree = parse_ok("{ a: 1, \"b\": true, 3: null, list-or-map: x, }", EntryPoint::JsonContainer);
        let pairs = tree.json_pairs(tree.root()).unwrap();
        let keys: Vec<_> = pairs
            .iter()
            .map(|&pair| tree.json_key_string(pair).unwrap())
            .collect();
        assert_eq!(keys, ["a", "b", "3", "list-or-map"]);
    }

    #[test]
    fn duplicate_json_key_is_rejected() {
        let err = parse_err("{ size: 1, \"size\": 2 }", EntryPoint::JsonContainer);
        assert_eq!(err.kind, ParseErrorKind::DuplicateJsonKey("size".into()));
        assert_eq!(err.position.column, 12);
    }

    #[test]
    fn json_array_values() {
        let tree = parse_ok("[1, [2], {a: 3},]", EntryPoint::JsonContainer);
        let values = tree.json_values(tree.root()).unwrap();
        assert_eq!(values.len(), 3);
        assert!(tree.is_json_array(values[1]));
        assert!(tree.is_json_object(values[2]));
        parse_err("a", EntryPoint::JsonContainer);
    }

    #[test]
    fn template_interpolations_are_parsed() {
        let tree = parse_ok("`Hi ${user.name}, you have ${ n + 1 } items`", EntryPoint::Expression);
        let NodeKind::TemplateLiteral {
            raw,
            interpolations,
        } = tree.kind(tree.root())
        else {
            panic!("expected template");
        };
        assert_eq!(raw, "Hi ${user.name}, you have ${ n + 1 } items");
        assert_eq!(interpolations.len(), 2);
        assert_eq!(tree.source_text(interpolations[0]), "user.name");
        assert!(matches!(tree.kind(interpolations[1]), NodeKind::Binary { .. }));
    }

    #[test]
    fn template_interpolation_positions_are_absolute() {
        let tree = parse_ok("x = `a\n${ b }`", EntryPoint::Expression);
        let name = tree
            .ids()
            .find(|&id| tree.kind(id) == &NodeKind::Name("b".into()))
            .unwrap();
        assert_eq!(tree.node(name).begin().line, 2);
        assert_eq!(tree.node(name).begin().column, 4);
    }

    #[test]
    fn escaped_interpolation_is_text() {
        let tree = parse_ok(r"`\${not} ${1}`", EntryPoint::Expression);
        let NodeKind::TemplateLiteral { interpolations, .. } = tree.kind(tree.root()) else {
            panic!("expected template");
        };
        assert_eq!(interpolations.len(), 1);
        assert_eq!(
            tree.kind(interpolations[0]),
            &NodeKind::Literal(Literal::Integer("1".into()))
        );
    }

    #[test]
    fn bad_interpolation_is_an_error() {
        parse_err("`${}`", EntryPoint::Expression);
        parse_err("`${a b}`", EntryPoint::Expression);
    }

    #[test]
    fn interpolation_ranges_track_braces() {
        assert_eq!(interpolation_ranges("a${ {x} }b"), vec![Some((3, 8))]);
        assert_eq!(interpolation_ranges("${"), vec![None]);
        assert!(interpolation_ranges("plain").is_empty());
    }
}
