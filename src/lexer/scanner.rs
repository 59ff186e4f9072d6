use tracing::debug;

use super::token::{Token, TokenKind, KEYWORDS};
use crate::error::{Error, Result};

/// Scanner for tylisp source code
///
/// Consumes a source string and produces the ordered token sequence the
/// reader operates on. The scanner is line-aware; every token records the
/// file and line it originates from for diagnostics.
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Name of the file the source originates from
    file: String,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
}

impl Scanner {
    /// Creates a new scanner from source code and its originating filename
    pub fn new(source: &str, file: impl Into<String>) -> Self {
        Scanner {
            source: source.chars().collect(),
            file: file.into(),
            tokens: Vec::new(),
            current: 0,
            line: 1,
        }
    }

    /// Scans all tokens from the source code and returns them as a vector
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        debug!(file = %self.file, "begin lexical analysis");
        while !self.is_at_end() {
            self.scan_token()?;
        }
        debug!(tokens = self.tokens.len(), "end lexical analysis");
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<()> {
        match self.peek() {
            ' ' | '\t' => {
                self.advance();
            }
            '\n' => {
                self.advance();
                self.line += 1;
            }
            ';' => self.skip_line_comment(),
            '(' => {
                self.advance();
                self.add_token(TokenKind::ParenOpen, "(");
            }
            ')' => {
                self.advance();
                self.add_token(TokenKind::ParenClose, ")");
            }
            '-' | '+' | '/' | '*' | '!' | '=' | '<' | '>' | '&' | '|' => self.scan_operator()?,
            c if c.is_ascii_digit() => self.scan_number()?,
            '"' => self.scan_string()?,
            '\'' => self.scan_character()?,
            _ => self.scan_identifier_or_keyword()?,
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        // The newline itself is left for the main loop so the line counter
        // advances exactly once.
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn scan_operator(&mut self) -> Result<()> {
        let c = self.advance();
        match c {
            '+' | '*' | '/' => self.add_token(TokenKind::ArithOp, c.to_string()),
            '-' => {
                if self.peek().is_ascii_digit() {
                    // Minus sign belongs to a negative number
                    return self.scan_number_from(String::from("-"));
                }
                self.add_token(TokenKind::ArithOp, "-");
            }
            '>' | '<' => {
                if self.peek() == '=' {
                    self.advance();
                    self.add_token(TokenKind::RelOp, format!("{}=", c));
                } else {
                    self.add_token(TokenKind::RelOp, c.to_string());
                }
            }
            '=' | '!' => self.add_token(TokenKind::RelOp, c.to_string()),
            '&' | '|' => self.add_token(TokenKind::BoolOp, c.to_string()),
            _ => unreachable!("scan_operator called on non-operator character"),
        }
        Ok(())
    }

    fn scan_number(&mut self) -> Result<()> {
        self.scan_number_from(String::new())
    }

    /// Scans the digits of a numeric atom; `lexeme` may already hold a
    /// leading minus sign. At most one decimal point is allowed.
    fn scan_number_from(&mut self, mut lexeme: String) -> Result<()> {
        let mut has_decimal_point = false;
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_digit() {
                lexeme.push(self.advance());
            } else if c == '.' {
                if has_decimal_point {
                    lexeme.push(self.advance());
                    return Err(Error::TooManyDecimals {
                        token: self.marker_token(TokenKind::Double, lexeme),
                    });
                }
                has_decimal_point = true;
                lexeme.push(self.advance());
            } else {
                break;
            }
        }
        if has_decimal_point {
            self.add_token(TokenKind::Double, lexeme);
        } else {
            self.add_token(TokenKind::Int, lexeme);
        }
        Ok(())
    }

    /// Scans a string literal. No escape processing is performed; an
    /// unterminated string consumes the remainder of the input.
    fn scan_string(&mut self) -> Result<()> {
        let start_line = self.line;
        self.advance(); // opening "
        let mut value = String::new();
        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
        }
        if !self.is_at_end() {
            self.advance(); // closing "
        }
        self.tokens
            .push(Token::new(TokenKind::Str, value, self.file.clone(), start_line));
        Ok(())
    }

    /// Scans a character literal: exactly one character between single quotes
    fn scan_character(&mut self) -> Result<()> {
        self.advance(); // opening '
        if self.is_at_end() {
            return Err(Error::SourceTooShort {
                token: self.marker_token(TokenKind::Char, String::new()),
            });
        }
        if self.peek() == '\'' {
            return Err(Error::EmptyCharacter {
                token: self.marker_token(TokenKind::Char, String::new()),
            });
        }
        let c = self.advance();
        if self.is_at_end() || self.peek() != '\'' {
            return Err(Error::NoExitQuotationMark {
                token: self.marker_token(TokenKind::Char, c.to_string()),
            });
        }
        self.advance(); // closing '
        self.add_token(TokenKind::Char, c.to_string());
        Ok(())
    }

    /// Scans a maximal run of non-delimiter characters and classifies it as
    /// keyword, boolean literal or identifier.
    fn scan_identifier_or_keyword(&mut self) -> Result<()> {
        let mut lexeme = String::new();
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\n' | '(' | ')' | ';' => break,
                _ => lexeme.push(self.advance()),
            }
        }
        if KEYWORDS.contains(&lexeme.as_str()) {
            self.add_token(TokenKind::Keyword, lexeme);
            return Ok(());
        }
        let lowercase = lexeme.to_lowercase();
        if lowercase == "t" || lowercase == "nil" {
            // Boolean literals keep their canonical lowercase text
            self.add_token(TokenKind::Bool, lowercase);
            return Ok(());
        }
        self.add_token(TokenKind::Identifier, lexeme);
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn add_token(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens
            .push(Token::new(kind, lexeme, self.file.clone(), self.line));
    }

    /// Builds a token marking the current position for error reporting
    fn marker_token(&self, kind: TokenKind, lexeme: String) -> Token {
        Token::new(kind, lexeme, self.file.clone(), self.line)
    }
}
