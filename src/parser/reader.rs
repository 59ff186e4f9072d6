use tracing::debug;

use super::syntax::SyntaxNode;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Recursive-descent reader: token stream to syntax trees
///
/// Produces one [`SyntaxNode`] per top-level parenthesized form. An empty
/// list is an internal, non-fatal signal; it simply contributes no node to
/// its surrounding form.
pub struct Reader {
    tokens: Vec<Token>,
    current: usize,
}

impl Reader {
    /// Creates a new reader over a token sequence
    pub fn new(tokens: Vec<Token>) -> Self {
        Reader { tokens, current: 0 }
    }

    /// Reads all top-level forms
    pub fn read(mut self) -> Result<Vec<SyntaxNode>> {
        debug!(tokens = self.tokens.len(), "begin syntactical analysis");
        let mut forms = Vec::new();
        while !self.is_at_end() {
            let first = self.advance().clone();
            if first.kind != TokenKind::ParenOpen {
                // Every top-level form must start with an opening parenthesis
                return Err(Error::SyntaxError { token: first });
            }
            if let Some(form) = self.parse_form()? {
                forms.push(form);
            }
        }
        debug!(forms = forms.len(), "end syntactical analysis");
        Ok(forms)
    }

    /// Parses one form whose opening parenthesis has already been consumed.
    ///
    /// Returns `Ok(None)` when the form turns out to be an empty list, so
    /// that callers can omit it.
    fn parse_form(&mut self) -> Result<Option<SyntaxNode>> {
        if self.is_at_end() {
            return Err(self.eof_error());
        }
        let head = self.advance().clone();

        if head.kind == TokenKind::ParenOpen {
            // Grouping list: the form starts with another parenthesis, so its
            // subforms are collected under a synthetic branch node.
            let mut children = Vec::new();
            loop {
                if self.is_at_end() {
                    return Err(self.eof_error());
                }
                match self.peek().kind {
                    TokenKind::ParenOpen => {
                        self.advance();
                        if let Some(child) = self.parse_form()? {
                            children.push(child);
                        }
                    }
                    TokenKind::ParenClose => {
                        self.advance();
                        break;
                    }
                    _ => children.push(self.parse_atom()?),
                }
            }
            let branch = Token::new(TokenKind::Branch, "", head.file, head.line);
            return Ok(Some(SyntaxNode::with_children(branch, children)));
        }

        if head.kind == TokenKind::ParenClose {
            // The list is empty; callers drop it silently.
            return Ok(None);
        }

        // The head token becomes the content of the node; subsequent tokens
        // are its children until the closing parenthesis.
        let mut children = Vec::new();
        loop {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            match self.peek().kind {
                TokenKind::ParenOpen => {
                    // Tie-break on one token of lookahead: `((` introduces a
                    // grouping list of nested forms, `(x` descends directly
                    // into the nested form. Existing programs' parameter-list
                    // conventions depend on this asymmetry.
                    if self.peek_next().map(|t| t.kind) != Some(TokenKind::ParenOpen) {
                        self.advance();
                    }
                    if let Some(child) = self.parse_form()? {
                        children.push(child);
                    }
                }
                TokenKind::ParenClose => {
                    self.advance();
                    return Ok(Some(SyntaxNode::with_children(head, children)));
                }
                _ => children.push(self.parse_atom()?),
            }
        }
    }

    /// Parses a single atom, which can never be a parenthesis
    fn parse_atom(&mut self) -> Result<SyntaxNode> {
        if self.is_at_end() {
            return Err(self.eof_error());
        }
        let token = self.advance().clone();
        if token.kind == TokenKind::ParenOpen || token.kind == TokenKind::ParenClose {
            return Err(Error::AtomCannotBeParenthesis { token });
        }
        Ok(SyntaxNode::leaf(token))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current];
        self.current += 1;
        token
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    /// Syntax error for input that ended inside an unterminated form
    fn eof_error(&self) -> Error {
        let token = self
            .tokens
            .last()
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::ParenOpen, "(", "", 0));
        Error::SyntaxError { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn read(source: &str) -> Vec<SyntaxNode> {
        let tokens = Scanner::new(source, "test.lisp").scan_tokens().unwrap();
        Reader::new(tokens).read().unwrap()
    }

    fn read_err(source: &str) -> Error {
        let tokens = Scanner::new(source, "test.lisp").scan_tokens().unwrap();
        Reader::new(tokens).read().unwrap_err()
    }

    #[test]
    fn test_single_form() {
        let forms = read("(+ 1 2)");
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].content.lexeme, "+");
        assert_eq!(forms[0].children.len(), 2);
        assert!(forms[0].children.iter().all(|c| c.is_leaf()));
    }

    #[test]
    fn test_nested_form() {
        let forms = read("(+ 1 (* 2 3))");
        assert_eq!(forms[0].children.len(), 2);
        let nested = &forms[0].children[1];
        assert_eq!(nested.content.lexeme, "*");
        assert_eq!(nested.children.len(), 2);
    }

    #[test]
    fn test_multiple_top_level_forms() {
        let forms = read("(print 1) (print 2)");
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn test_empty_list_contributes_nothing() {
        let forms = read("(void main () (println 1))");
        // The empty parameter list is dropped; only name and body remain.
        assert_eq!(forms[0].children.len(), 2);
        assert_eq!(forms[0].children[0].content.lexeme, "main");
        assert_eq!(forms[0].children[1].content.lexeme, "println");
    }

    #[test]
    fn test_grouping_list_for_parameters() {
        let forms = read("(int add ((int (x)) (int (y))) (+ x y))");
        assert_eq!(forms[0].children.len(), 3);
        let params = &forms[0].children[1];
        assert!(params.is_branch());
        assert_eq!(params.children.len(), 2);
        assert_eq!(params.children[0].content.lexeme, "int");
        assert_eq!(params.children[0].children[0].content.lexeme, "x");
    }

    #[test]
    fn test_single_parameter_shorthand() {
        let forms = read("(int sq (int (x)) (* x x))");
        assert_eq!(forms[0].children.len(), 3);
        let param = &forms[0].children[1];
        assert!(!param.is_branch());
        assert_eq!(param.content.lexeme, "int");
        assert_eq!(param.children[0].content.lexeme, "x");
    }

    #[test]
    fn test_grouping_list_for_body() {
        let forms = read("(void main ((println 1) (println 2)))");
        let body = &forms[0].children[1];
        assert!(body.is_branch());
        assert_eq!(body.children.len(), 2);
    }

    #[test]
    fn test_top_level_must_open_with_parenthesis() {
        assert!(matches!(read_err("print 1"), Error::SyntaxError { .. }));
    }

    #[test]
    fn test_unterminated_form() {
        assert!(matches!(read_err("(print 1"), Error::SyntaxError { .. }));
    }

    #[test]
    fn test_unterminated_grouping_list() {
        assert!(matches!(
            read_err("(void main ((println 1)"),
            Error::SyntaxError { .. }
        ));
    }

    #[test]
    fn test_empty_top_level_form() {
        assert!(read("()").is_empty());
    }
}
