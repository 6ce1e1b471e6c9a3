// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for the grammar parser.
//!
//! The lexer is hand-written and strict: the first malformed token aborts
//! with a [`ParseError`]. Comments and whitespace are skipped; the
//! [`CommentLexer`](super::CommentLexer) recovers comments independently.
//!
//! # Example
//!
//! ```
//! use xapi_lang::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("x = 1; // done").unwrap();
//! assert_eq!(tokens.len(), 5); // x, =, 1, ;, EOF
//! assert!(tokens.last().unwrap().kind().is_eof());
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Keyword, ParseError, ParseErrorKind, Span, Token, TokenKind};

/// Operators recognised by longest match, longest spellings first within a
/// shared prefix. `>` forms are absent on purpose: see [`TokenKind`].
const OPERATORS: &[&str] = &[
    "<<=", "<<", "<=", "<", "==", "=", "!=", "!", "&&", "&=", "&", "||", "|=", "|", "^=", "^",
    "++", "+=", "+", "--", "-=", "-", "*=", "*", "/=", "/", "%=", "%", "~",
];

/// A strict tokenizer over a (sub)range of source text.
pub struct Lexer<'src> {
    /// The full source, used for error positions.
    source: &'src str,
    /// The text being lexed, a slice of `source` starting at `base`.
    text: &'src str,
    /// Byte offset of `text` within `source`.
    base: u32,
    /// Character iterator over `text` with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position within `text`.
    position: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.current_position())
            .field("remaining", &self.text.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over the whole of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::for_range(source, Span::from(0..source.len()))
    }

    /// Creates a lexer over `range` of `source`. Token spans stay relative to
    /// the full source, which is how template interpolations are lexed.
    #[must_use]
    pub fn for_range(source: &'src str, range: Span) -> Self {
        let text = &source[range.as_range()];
        Self {
            source,
            text,
            base: range.start(),
            chars: text.char_indices().peekable(),
            position: 0,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead (`n = 0` is [`Self::peek_char`]).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Current byte position relative to the full source.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.base + self.position as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, span, self.source)
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => self.advance_while(char::is_whitespace),
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| c != '\n');
                }
                Some('/') if self.peek_char_n(1) == Some('*') => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.advance() {
                None => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedComment,
                        self.span_from(start),
                    ));
                }
                Some('*') if self.peek_char() == Some('/') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    /// Lexes the next token, returning [`TokenKind::Eof`] at the end.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c, start)?,
        };
        Ok(Token::new(kind, self.span_from(start)))
    }

    fn lex_token_kind(&mut self, c: char, start: u32) -> Result<TokenKind, ParseError> {
        let kind = match c {
            c if is_identifier_start(c) => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(start)?,
            '.' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number(start)?
            }
            '"' => self.lex_string(start)?,
            '\'' => self.lex_char(start)?,
            '`' => self.lex_template(start)?,
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '@' => self.single(TokenKind::At),
            '?' => self.single(TokenKind::Question),
            '>' => self.single(TokenKind::Operator(">".into())),
            '.' => {
                if self.peek_char_n(1) == Some('.') && self.peek_char_n(2) == Some('.') {
                    self.advance();
                    self.advance();
                    self.single(TokenKind::Ellipsis)
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            ':' => {
                if self.peek_char_n(1) == Some(':') {
                    self.advance();
                    self.single(TokenKind::DoubleColon)
                } else {
                    self.single(TokenKind::Colon)
                }
            }
            '-' if self.peek_char_n(1) == Some('>') => {
                self.advance();
                self.single(TokenKind::Arrow)
            }
            _ => self.lex_operator(c, start)?,
        };
        Ok(kind)
    }

    /// Consumes one character and returns `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(is_identifier_part);
        let text = self.text_for(self.span_from(start));
        match Keyword::from_text(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(EcoString::from(text)),
        }
    }

    /// Lexes decimal, hex, octal and binary literals with `_` separators,
    /// fractions, exponents and `L`/`f`/`d` suffixes.
    fn lex_number(&mut self, start: u32) -> Result<TokenKind, ParseError> {
        let mut is_floating = false;
        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X' | 'b' | 'B'))
        {
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_floating = true;
                self.advance();
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
            } else if self.peek_char() == Some('.')
                && !self.peek_char_n(1).is_some_and(is_identifier_start)
                && self.peek_char_n(1) != Some('.')
            {
                // `1.` is a floating literal, `1.toString` is not
                is_floating = true;
                self.advance();
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                is_floating = true;
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                let digits_start = self.current_position();
                self.advance_while(|c| c.is_ascii_digit());
                if self.current_position() == digits_start {
                    let span = self.span_from(start);
                    return Err(self.error(
                        ParseErrorKind::InvalidNumber(self.text_for(span).into()),
                        span,
                    ));
                }
            }
        }

        let kind = match self.peek_char() {
            Some('l' | 'L') if !is_floating => {
                self.advance();
                TokenKind::Long(self.text_for(self.span_from(start)).into())
            }
            Some('f' | 'F' | 'd' | 'D') => {
                self.advance();
                TokenKind::Floating(self.text_for(self.span_from(start)).into())
            }
            _ if is_floating => TokenKind::Floating(self.text_for(self.span_from(start)).into()),
            _ => TokenKind::Integer(self.text_for(self.span_from(start)).into()),
        };

        if self.peek_char().is_some_and(is_identifier_part) {
            self.advance_while(is_identifier_part);
            let span = self.span_from(start);
            return Err(self.error(
                ParseErrorKind::InvalidNumber(self.text_for(span).into()),
                span,
            ));
        }
        Ok(kind)
    }

    /// Lexes `"..."`, keeping escapes verbatim. Strings may not span lines.
    fn lex_string(&mut self, start: u32) -> Result<TokenKind, ParseError> {
        self.advance(); // opening quote
        let content_start = self.current_position();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedString,
                        self.span_from(start),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content = self.text_for(self.span_from(content_start));
        self.advance(); // closing quote
        Ok(TokenKind::String(content.into()))
    }

    fn lex_char(&mut self, start: u32) -> Result<TokenKind, ParseError> {
        self.advance(); // opening quote
        let content_start = self.current_position();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedChar,
                        self.span_from(start),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('\'') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content = self.text_for(self.span_from(content_start));
        self.advance(); // closing quote
        Ok(TokenKind::Char(content.into()))
    }

    /// Lexes a backtick template. `\`` escapes a backtick and backticks
    /// inside `${...}` do not close the literal.
    fn lex_template(&mut self, start: u32) -> Result<TokenKind, ParseError> {
        self.advance(); // opening backtick
        let content_start = self.current_position();
        let mut interpolation_depth = 0usize;
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedTemplate,
                        self.span_from(start),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('$') if self.peek_char_n(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    interpolation_depth += 1;
                }
                Some('{') if interpolation_depth > 0 => {
                    self.advance();
                    interpolation_depth += 1;
                }
                Some('}') if interpolation_depth > 0 => {
                    self.advance();
                    interpolation_depth -= 1;
                }
                Some('`') if interpolation_depth == 0 => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content = self.text_for(self.span_from(content_start));
        self.advance(); // closing backtick
        Ok(TokenKind::Template(content.into()))
    }

    fn lex_operator(&mut self, c: char, start: u32) -> Result<TokenKind, ParseError> {
        let rest = &self.text[self.position..];
        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            self.advance();
            return Err(self.error(
                ParseErrorKind::UnexpectedCharacter(c),
                self.span_from(start),
            ));
        };
        for _ in 0..op.len() {
            self.advance();
        }
        Ok(TokenKind::Operator(EcoString::from(*op)))
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    /// Yields tokens up to, but excluding, EOF. An error ends the iteration
    /// after it is yielded.
    fn next(&mut self) -> Option<Self::Item> {
        if self.position > self.text.len() {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind().is_eof() => None,
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.position = self.text.len() + 1;
                Some(Err(err))
            }
        }
    }
}

/// Lexes `source` into tokens, including the trailing EOF token.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    lex_range(source, Span::from(0..source.len()))
}

/// Lexes `range` of `source`, including a trailing EOF token positioned at
/// the end of the range.
pub fn lex_range(source: &str, range: Span) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::for_range(source, range);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tokens_cover_input_in_order(source in "\\PC{0,120}") {
            let Ok(tokens) = lex(&source) else { return Ok(()) };
            let mut last_end = 0;
            for token in &tokens {
                prop_assert!(token.span().start() >= last_end);
                prop_assert!(token.span().start() <= token.span().end());
                last_end = token.span().end();
            }
            prop_assert!(last_end as usize <= source.len());
            prop_assert_eq!(tokens.last().map(Token::kind), Some(&TokenKind::Eof));
        }
    }
}
