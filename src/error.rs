use thiserror::Error;

use crate::expr::{InfixOperator, PrefixOperator};
use crate::object::ObjectType;
use crate::token::TokenKind;

/// A malformed construct found while parsing. Parsing continues past it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected '{expected}', got '{found}' at line {line}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
    },

    #[error("no prefix parse function for '{kind}' found at line {line}")]
    NoPrefixHandler { kind: TokenKind, line: usize },

    #[error("could not parse '{text}' as integer at line {line}")]
    InvalidInteger { text: String, line: usize },
}

/// A runtime fault. Carried as data inside `Object::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("type mismatch: {left}{operator}{right}")]
    TypeMismatch {
        left: ObjectType,
        operator: InfixOperator,
        right: ObjectType,
    },

    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        operand: ObjectType,
    },

    #[error("unknown operator: {left}{operator}{right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: InfixOperator,
        right: ObjectType,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    IntegerOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_reported_format() {
        let err = ParseError::ExpectedToken {
            expected: TokenKind::Identifier,
            found: TokenKind::Assign,
            line: 1,
        };
        assert_eq!(err.to_string(), "expected 'IDENT', got '=' at line 1");

        let err = RuntimeError::TypeMismatch {
            left: ObjectType::Integer,
            operator: InfixOperator::Plus,
            right: ObjectType::Boolean,
        };
        assert_eq!(err.to_string(), "type mismatch: INTEGER+BOOLEAN");
    }
}
