//! Error types for the tylisp interpreter

use thiserror::Error;

use crate::lexer::{Token, ValueType};

/// Tylisp interpreter errors
///
/// Every variant raised during evaluation carries the offending token so that
/// an embedding shell can report the file, line and lexeme alongside the
/// message. A `return` statement is not an error; it travels through
/// [`crate::runtime::Eval`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// Numeric literal with more than one decimal point
    ///
    /// **Example:** `3.14.15`
    #[error("Too many decimal points in number '{}' ({}:{})", token.lexeme, token.file, token.line)]
    TooManyDecimals {
        /// Partial literal that was being scanned
        token: Token,
    },

    /// Input ended while a sub-tokenizer expected more characters
    #[error("Source code ended unexpectedly ({}:{})", token.file, token.line)]
    SourceTooShort {
        /// Marker token for the position where input ran out
        token: Token,
    },

    /// Character literal with no character between the quotes
    ///
    /// **Example:** `''`
    #[error("Empty character literal ({}:{})", token.file, token.line)]
    EmptyCharacter {
        /// Marker token for the literal
        token: Token,
    },

    /// Character literal without a closing quote
    ///
    /// **Example:** `'ab` or `'a` at end of input
    #[error("Missing closing quotation mark after character '{}' ({}:{})", token.lexeme, token.file, token.line)]
    NoExitQuotationMark {
        /// The character that was scanned before the quote was expected
        token: Token,
    },

    // Parse errors
    /// Malformed S-expression (missing parenthesis, stray token at top level)
    #[error("Syntax error near '{}' ({}:{})", token.lexeme, token.file, token.line)]
    SyntaxError {
        /// Token at which parsing failed
        token: Token,
    },

    /// A parenthesis appeared where a single atom was required
    #[error("Atom cannot be a parenthesis ({}:{})", token.file, token.line)]
    AtomCannotBeParenthesis {
        /// The offending parenthesis token
        token: Token,
    },

    // Evaluation errors
    /// A value of one type appeared where another type was required
    ///
    /// Covers every ordered pair of the five value types; no implicit
    /// conversions exist anywhere in the language.
    #[error("Cannot convert {from} to {to} near '{}' ({}:{})", token.lexeme, token.file, token.line)]
    TypeMismatch {
        /// Type the value actually has
        from: ValueType,
        /// Type the context required
        to: ValueType,
        /// Token carrying the mismatched value
        token: Token,
    },

    /// Read or assignment of a variable that was never declared
    #[error("Variable '{}' does not exist ({}:{})", token.lexeme, token.file, token.line)]
    VariableDoesNotExist {
        /// The variable name token
        token: Token,
    },

    /// Declaration of a name that already exists in the environment
    #[error("Variable name '{}' is already in use ({}:{})", token.lexeme, token.file, token.line)]
    VariableNameAlreadyInUse {
        /// The variable name token
        token: Token,
    },

    /// An operation received fewer operands than it requires
    #[error("Not enough arguments for '{}' ({}:{})", token.lexeme, token.file, token.line)]
    NotEnoughArguments {
        /// The operator or form that was short of operands
        token: Token,
    },

    /// An operation received more operands than it accepts
    #[error("Too many arguments for '{}' ({}:{})", token.lexeme, token.file, token.line)]
    TooManyArguments {
        /// The operator or form with excess operands
        token: Token,
    },

    /// A token of an unexpected kind appeared in an expression
    #[error("Incorrect token '{}' ({}:{})", token.lexeme, token.file, token.line)]
    IncorrectToken {
        /// The unexpected token
        token: Token,
    },

    /// A required token (e.g. a variable name after a type keyword) is absent
    #[error("Missing token after '{}' ({}:{})", token.lexeme, token.file, token.line)]
    MissingToken {
        /// The form that is missing a token
        token: Token,
    },

    /// An `if` or `while` form without a condition
    #[error("Missing condition for '{}' ({}:{})", token.lexeme, token.file, token.line)]
    MissingCondition {
        /// The `if`/`while` keyword token
        token: Token,
    },

    /// An `if` or `while` form without a body
    #[error("Missing body for '{}' ({}:{})", token.lexeme, token.file, token.line)]
    MissingBody {
        /// The `if`/`while` keyword token
        token: Token,
    },

    /// `+` applied to boolean operands
    #[error("Cannot add booleans ({}:{})", token.file, token.line)]
    CannotAddBooleans {
        /// The first boolean operand
        token: Token,
    },

    /// `-` applied to a non-numeric operand
    #[error("Cannot subtract non-numeric value '{}' ({}:{})", token.lexeme, token.file, token.line)]
    CannotSubtractNonNumeric {
        /// The non-numeric operand
        token: Token,
    },

    /// `*` applied to a non-numeric operand
    #[error("Cannot multiply non-numeric value '{}' ({}:{})", token.lexeme, token.file, token.line)]
    CannotMultiplyNonNumeric {
        /// The non-numeric operand
        token: Token,
    },

    /// `/` applied to a non-numeric operand
    #[error("Cannot divide non-numeric value '{}' ({}:{})", token.lexeme, token.file, token.line)]
    CannotDivideNonNumeric {
        /// The non-numeric operand
        token: Token,
    },

    /// `/` with a zero divisor
    #[error("Cannot divide by zero ({}:{})", token.file, token.line)]
    CannotDivideByZero {
        /// The zero operand
        token: Token,
    },

    /// Call of a function that was never defined
    #[error("Function '{}' does not exist ({}:{})", token.lexeme, token.file, token.line)]
    FunctionDoesNotExist {
        /// The function name token
        token: Token,
    },

    /// Call with an argument count different from the parameter count
    #[error("Incorrect number of arguments passed to '{}' ({}:{})", token.lexeme, token.file, token.line)]
    IncorrectNumberOfArgumentsPassed {
        /// The function name token
        token: Token,
    },

    /// No function named `main` was defined
    #[error("Missing main function")]
    MissingMainFunction,

    /// `main` was defined with parameters
    #[error("Main function must not have parameters")]
    MainFunctionHasParameters,

    /// `main` was defined with a non-void return type
    #[error("Main function must have return type void")]
    MainFunctionHasIncorrectReturnType,

    /// Function definition without a body expression
    #[error("Function '{}' has no expression ({}:{})", token.lexeme, token.file, token.line)]
    MissingFunctionExpression {
        /// The function name token
        token: Token,
    },

    /// Top-level form that is not a well-shaped function definition
    #[error("Incorrect function definition near '{}' ({}:{})", token.lexeme, token.file, token.line)]
    IncorrectFunctionDefinition {
        /// The token at which the definition is malformed
        token: Token,
    },

    /// Function definition whose name is not a plain identifier
    #[error("Function name '{}' is incorrect ({}:{})", token.lexeme, token.file, token.line)]
    FunctionNameIsIncorrect {
        /// The token found in name position
        token: Token,
    },

    /// `return` with more than one value
    #[error("Too many values to return ({}:{})", token.file, token.line)]
    TooManyValuesToReturn {
        /// The `return` keyword token
        token: Token,
    },

    /// A non-void function body completed without a `return` statement
    #[error("Function '{}' did not return a value ({}:{})", token.lexeme, token.file, token.line)]
    MissingReturnValue {
        /// The function name token
        token: Token,
    },
}

impl Error {
    /// Returns the offending token, if this error kind carries one
    pub fn token(&self) -> Option<&Token> {
        match self {
            Error::TooManyDecimals { token }
            | Error::SourceTooShort { token }
            | Error::EmptyCharacter { token }
            | Error::NoExitQuotationMark { token }
            | Error::SyntaxError { token }
            | Error::AtomCannotBeParenthesis { token }
            | Error::TypeMismatch { token, .. }
            | Error::VariableDoesNotExist { token }
            | Error::VariableNameAlreadyInUse { token }
            | Error::NotEnoughArguments { token }
            | Error::TooManyArguments { token }
            | Error::IncorrectToken { token }
            | Error::MissingToken { token }
            | Error::MissingCondition { token }
            | Error::MissingBody { token }
            | Error::CannotAddBooleans { token }
            | Error::CannotSubtractNonNumeric { token }
            | Error::CannotMultiplyNonNumeric { token }
            | Error::CannotDivideNonNumeric { token }
            | Error::CannotDivideByZero { token }
            | Error::FunctionDoesNotExist { token }
            | Error::IncorrectNumberOfArgumentsPassed { token }
            | Error::MissingFunctionExpression { token }
            | Error::IncorrectFunctionDefinition { token }
            | Error::FunctionNameIsIncorrect { token }
            | Error::TooManyValuesToReturn { token }
            | Error::MissingReturnValue { token } => Some(token),
            Error::MissingMainFunction
            | Error::MainFunctionHasParameters
            | Error::MainFunctionHasIncorrectReturnType => None,
        }
    }
}

/// Result type for tylisp operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_error_carries_token() {
        let tok = Token::new(TokenKind::Identifier, "x", "test.lisp", 3);
        let err = Error::VariableDoesNotExist { token: tok.clone() };
        assert_eq!(err.token(), Some(&tok));
        assert!(err.to_string().contains("'x'"));
        assert!(err.to_string().contains("test.lisp:3"));
    }

    #[test]
    fn test_main_errors_have_no_token() {
        assert_eq!(Error::MissingMainFunction.token(), None);
    }
}
