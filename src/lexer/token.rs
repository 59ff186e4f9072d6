use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Name of the file the token originates from
    pub file: String,
    /// Line number where the token appears (1-indexed)
    pub line: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            file: file.into(),
            line,
        }
    }

    /// Returns true if this token is a typed value literal
    pub fn is_value(&self) -> bool {
        self.kind.value_type().is_some()
    }
}

/// All possible token types in tylisp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Opening parenthesis (
    ParenOpen,
    /// Closing parenthesis )
    ParenClose,
    /// Integer literal
    Int,
    /// Floating-point literal
    Double,
    /// Boolean literal (`t` or `nil`)
    Bool,
    /// Character literal
    Char,
    /// String literal
    Str,
    /// Identifier (variable or function name)
    Identifier,
    /// Reserved keyword
    Keyword,
    /// Arithmetic operator (+, -, *, /)
    ArithOp,
    /// Relational operator (=, !, >, <, >=, <=)
    RelOp,
    /// Boolean operator (&, |)
    BoolOp,
    /// Synthetic grouping node produced by the reader, never by the lexer
    Branch,
}

impl TokenKind {
    /// Maps a value-literal token kind to its value type
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            TokenKind::Int => Some(ValueType::Int),
            TokenKind::Double => Some(ValueType::Double),
            TokenKind::Bool => Some(ValueType::Bool),
            TokenKind::Char => Some(ValueType::Char),
            TokenKind::Str => Some(ValueType::Str),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::ParenOpen => "opening parenthesis",
            TokenKind::ParenClose => "closing parenthesis",
            TokenKind::Int => "integer",
            TokenKind::Double => "double",
            TokenKind::Bool => "boolean",
            TokenKind::Char => "character",
            TokenKind::Str => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::ArithOp => "arithmetic operator",
            TokenKind::RelOp => "relational operator",
            TokenKind::BoolOp => "boolean operator",
            TokenKind::Branch => "branch",
        };
        write!(f, "{}", name)
    }
}

/// The five value types a variable, parameter or expression can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// 64-bit integer
    Int,
    /// 64-bit floating-point number
    Double,
    /// Boolean (`t` / `nil`)
    Bool,
    /// Single character
    Char,
    /// String
    Str,
}

impl ValueType {
    /// The token kind a literal of this type carries
    pub fn token_kind(&self) -> TokenKind {
        match self {
            ValueType::Int => TokenKind::Int,
            ValueType::Double => TokenKind::Double,
            ValueType::Bool => TokenKind::Bool,
            ValueType::Char => TokenKind::Char,
            ValueType::Str => TokenKind::Str,
        }
    }

    /// Parses a type keyword lexeme (`int`, `double`, ...) into a value type
    pub fn from_keyword(lexeme: &str) -> Option<ValueType> {
        match lexeme {
            "int" => Some(ValueType::Int),
            "double" => Some(ValueType::Double),
            "bool" => Some(ValueType::Bool),
            "char" => Some(ValueType::Char),
            "string" => Some(ValueType::Str),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueType::Int => "int",
            ValueType::Double => "double",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::Str => "string",
        };
        write!(f, "{}", name)
    }
}

/// The fixed keyword set of the language
pub const KEYWORDS: &[&str] = &[
    "int", "double", "bool", "char", "string", "void", "set", "defun", "if", "while", "print",
    "println", "return",
];
