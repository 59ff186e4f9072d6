use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind, ValueType};

/// A typed runtime value
///
/// Expressions and variables carry their values as canonical text inside
/// tokens; `Value` is the typed form the evaluator parses that text into for
/// arithmetic and comparison, and renders back out of. The rendering is
/// deliberately lossy for doubles (fixed six fractional digits) because
/// equality and printing are defined over the rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating-point number
    Double(f64),
    /// Boolean
    Bool(bool),
    /// Single character
    Char(char),
    /// String
    Str(String),
}

impl Value {
    /// Parses a value literal token into a typed value
    pub fn from_token(token: &Token) -> Result<Value> {
        let ty = token
            .kind
            .value_type()
            .ok_or_else(|| Error::IncorrectToken {
                token: token.clone(),
            })?;
        match ty {
            ValueType::Int => parse_int(&token.lexeme, token).map(Value::Int),
            ValueType::Double => parse_double(&token.lexeme, token).map(Value::Double),
            ValueType::Bool => match token.lexeme.as_str() {
                "t" => Ok(Value::Bool(true)),
                "nil" => Ok(Value::Bool(false)),
                _ => Err(Error::IncorrectToken {
                    token: token.clone(),
                }),
            },
            ValueType::Char => token
                .lexeme
                .chars()
                .next()
                .map(Value::Char)
                .ok_or_else(|| Error::IncorrectToken {
                    token: token.clone(),
                }),
            ValueType::Str => Ok(Value::Str(token.lexeme.clone())),
        }
    }

    /// Returns the type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Char,
            Value::Str(_) => ValueType::Str,
        }
    }

    /// Renders the canonical textual representation
    ///
    /// Doubles render with exactly six fractional digits (`5.000000`); this
    /// is the representation equality and printing operate on.
    pub fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Double(d) => format!("{:.6}", d),
            Value::Bool(true) => "t".to_string(),
            Value::Bool(false) => "nil".to_string(),
            Value::Char(c) => c.to_string(),
            Value::Str(s) => s.clone(),
        }
    }

    /// Converts a token carrying this value into a fresh token
    pub fn to_token(&self, file: impl Into<String>, line: usize) -> Token {
        Token::new(self.value_type().token_kind(), self.render(), file, line)
    }

    /// Numeric view of an `Int` or `Double` value
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

/// Default lexeme a freshly declared variable of the given type holds.
///
/// These are the literal declaration defaults (`0.0`, not the canonical
/// `0.000000` a computed double would render as).
pub fn default_lexeme(ty: ValueType) -> &'static str {
    match ty {
        ValueType::Int => "0",
        ValueType::Double => "0.0",
        ValueType::Bool => "nil",
        ValueType::Char => " ",
        ValueType::Str => "",
    }
}

/// Parses an integer lexeme, attributing failures to the given token
pub(crate) fn parse_int(text: &str, at: &Token) -> Result<i64> {
    text.parse().map_err(|_| Error::IncorrectToken { token: at.clone() })
}

/// Parses a double lexeme, attributing failures to the given token
pub(crate) fn parse_double(text: &str, at: &Token) -> Result<f64> {
    text.parse().map_err(|_| Error::IncorrectToken { token: at.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, "test.lisp", 1)
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            Value::from_token(&token(TokenKind::Int, "-42")).unwrap(),
            Value::Int(-42)
        );
        assert_eq!(
            Value::from_token(&token(TokenKind::Double, "2.5")).unwrap(),
            Value::Double(2.5)
        );
        assert_eq!(
            Value::from_token(&token(TokenKind::Bool, "t")).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::from_token(&token(TokenKind::Char, "x")).unwrap(),
            Value::Char('x')
        );
    }

    #[test]
    fn test_parse_trailing_decimal_point() {
        // `3.` lexes as a double and must parse as one
        assert_eq!(
            Value::from_token(&token(TokenKind::Double, "3.")).unwrap(),
            Value::Double(3.0)
        );
    }

    #[test]
    fn test_render_double_fixed_digits() {
        assert_eq!(Value::Double(5.0).render(), "5.000000");
        assert_eq!(Value::Double(0.5).render(), "0.500000");
        assert_eq!(Value::Double(-1.25).render(), "-1.250000");
    }

    #[test]
    fn test_render_bool() {
        assert_eq!(Value::Bool(true).render(), "t");
        assert_eq!(Value::Bool(false).render(), "nil");
    }

    #[test]
    fn test_default_lexemes() {
        assert_eq!(default_lexeme(ValueType::Int), "0");
        assert_eq!(default_lexeme(ValueType::Double), "0.0");
        assert_eq!(default_lexeme(ValueType::Bool), "nil");
        assert_eq!(default_lexeme(ValueType::Char), " ");
        assert_eq!(default_lexeme(ValueType::Str), "");
    }

    #[test]
    fn test_parse_invalid_lexeme() {
        let result = Value::from_token(&token(TokenKind::Int, "abc"));
        assert!(matches!(result, Err(Error::IncorrectToken { .. })));
    }
}
