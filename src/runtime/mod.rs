//! Evaluation: environments, functions and the tree-walking interpreter

mod environment;
mod function;
mod interpreter;
mod value;

pub use environment::{Environment, Variable};
pub use function::{FunctionDef, FunctionTable, Parameter, ReturnType};
pub use interpreter::{Eval, Interpreter, SharedOutput};
pub use value::{default_lexeme, Value};
