//! # tylisp
//!
//! A statically typed, S-expression interpreter. Programs are sets of typed
//! function definitions; execution starts at a parameterless `void main`.
//!
//! The pipeline is deliberately small and explicit:
//!
//! 1. [`lexer::Scanner`] turns source text into a token stream
//! 2. [`parser::Reader`] turns the tokens into syntax trees
//! 3. [`runtime::Interpreter`] registers the function definitions and
//!    evaluates `main`
//!
//! ## Example
//!
//! ```
//! use tylisp::runtime::{Interpreter, SharedOutput};
//!
//! let program = r#"
//!     (int add ((int (a)) (int (b)))
//!         (return (+ a b)))
//!     (void main ()
//!         (println (add 2 3)))
//! "#;
//!
//! let out = SharedOutput::new();
//! let mut interp = Interpreter::with_output(Box::new(out.clone()));
//! interp.run_source(program, "add.lisp").unwrap();
//! assert_eq!(out.contents(), "5\n");
//! ```
//!
//! ## Language notes
//!
//! The five value types are `int`, `double`, `bool`, `char` and `string`,
//! with no implicit conversions anywhere: arguments must match parameter
//! types exactly and a variable never changes type. Values travel as
//! canonical text; doubles render with six fixed fractional digits, and the
//! `=` / `!` operators compare that text, so `5` and `5.000000` are not
//! equal. `if` and `while` bodies see the surrounding variables but their
//! own declarations vanish when the body ends.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use error::{Error, Result};
pub use lexer::{Scanner, Token, TokenKind, ValueType};
pub use parser::{Reader, SyntaxNode};
pub use runtime::{Interpreter, SharedOutput};

/// Version of the tylisp crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
