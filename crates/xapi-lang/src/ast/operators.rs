// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Operator enums for binary, unary and assignment expressions.

use std::fmt;

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    Xor,
    BitAnd,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    LeftShift,
    SignedRightShift,
    UnsignedRightShift,
    Plus,
    Minus,
    Times,
    Divide,
    Remainder,
}

impl BinaryOp {
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "||" => Self::Or,
            "&&" => Self::And,
            "|" => Self::BitOr,
            "^" => Self::Xor,
            "&" => Self::BitAnd,
            "==" => Self::Equals,
            "!=" => Self::NotEquals,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEquals,
            ">=" => Self::GreaterEquals,
            "<<" => Self::LeftShift,
            ">>" => Self::SignedRightShift,
            ">>>" => Self::UnsignedRightShift,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Times,
            "/" => Self::Divide,
            "%" => Self::Remainder,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::BitOr => "|",
            Self::Xor => "^",
            Self::BitAnd => "&",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEquals => "<=",
            Self::GreaterEquals => ">=",
            Self::LeftShift => "<<",
            Self::SignedRightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
        }
    }
}

/// Prefix and postfix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Inverse,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// Prefix operator spelled `symbol`.
    #[must_use]
    pub fn prefix(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "!" => Self::Not,
            "~" => Self::Inverse,
            "++" => Self::PreIncrement,
            "--" => Self::PreDecrement,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::Inverse => "~",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }
}

/// Plain and compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Plus,
    Minus,
    Times,
    Divide,
    Remainder,
    And,
    Or,
    Xor,
    LeftShift,
    SignedRightShift,
    UnsignedRightShift,
}

impl AssignOp {
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => Self::Assign,
            "+=" => Self::Plus,
            "-=" => Self::Minus,
            "*=" => Self::Times,
            "/=" => Self::Divide,
            "%=" => Self::Remainder,
            "&=" => Self::And,
            "|=" => Self::Or,
            "^=" => Self::Xor,
            "<<=" => Self::LeftShift,
            ">>=" => Self::SignedRightShift,
            ">>>=" => Self::UnsignedRightShift,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Plus => "+=",
            Self::Minus => "-=",
            Self::Times => "*=",
            Self::Divide => "/=",
            Self::Remainder => "%=",
            Self::And => "&=",
            Self::Or => "|=",
            Self::Xor => "^=",
            Self::LeftShift => "<<=",
            Self::SignedRightShift => ">>=",
            Self::UnsignedRightShift => ">>>=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_symbols_round_trip() {
        for symbol in ["||", "&&", "==", ">>>", "%", "<="] {
            assert_eq!(BinaryOp::from_symbol(symbol).unwrap().symbol(), symbol);
        }
        assert_eq!(BinaryOp::from_symbol("="), None);
    }

    #[test]
    fn postfix_shares_symbol_with_prefix() {
        assert_eq!(UnaryOp::PostIncrement.symbol(), UnaryOp::PreIncrement.symbol());
        assert!(UnaryOp::PostDecrement.is_postfix());
        assert!(!UnaryOp::Minus.is_postfix());
    }

    #[test]
    fn compound_assignment_lookup() {
        assert_eq!(AssignOp::from_symbol(">>>="), Some(AssignOp::UnsignedRightShift));
        assert_eq!(AssignOp::from_symbol("=="), None);
    }
}
