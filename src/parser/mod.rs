//! Syntactical analysis: token stream to syntax trees

mod reader;
mod syntax;

pub use reader::Reader;
pub use syntax::SyntaxNode;
