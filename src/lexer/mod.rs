//! Lexical analysis: source text to token stream

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind, ValueType, KEYWORDS};
