use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind, ValueType};
use crate::parser::SyntaxNode;

/// Declared return type of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnType {
    /// The function returns nothing; its result is discarded at call sites
    Void,
    /// The function must return a value of exactly this type
    Value(ValueType),
}

/// A typed function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type; arguments must match it exactly
    pub ty: ValueType,
}

/// A user-defined function
///
/// The body is shared behind an [`Arc`] so that the interpreter can execute
/// it while the function table stays borrowed elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// The function name token, kept for error reporting
    pub name: Token,
    /// Declared return type
    pub return_type: ReturnType,
    /// Declared parameters, in order
    pub params: Vec<Parameter>,
    /// Body expressions, executed in order
    pub body: Arc<Vec<SyntaxNode>>,
}

impl FunctionDef {
    /// Builds a function definition from one top-level form
    ///
    /// The accepted shapes are
    /// `(<type> <name> <body>)` and `(<type> <name> <params> <body>)`,
    /// where `<type>` is `void` or a value type keyword, `<params>` is either
    /// a single `(<type> (<name>))` pair or a parenthesized list of such
    /// pairs, and `<body>` is a single expression or a parenthesized list of
    /// expressions.
    pub fn from_form(form: &SyntaxNode) -> Result<FunctionDef> {
        let head = &form.content;
        if head.kind != TokenKind::Keyword {
            return Err(Error::IncorrectToken {
                token: head.clone(),
            });
        }
        let return_type = if head.lexeme == "void" {
            ReturnType::Void
        } else if let Some(ty) = ValueType::from_keyword(&head.lexeme) {
            ReturnType::Value(ty)
        } else {
            return Err(Error::IncorrectToken {
                token: head.clone(),
            });
        };

        if form.children.is_empty() {
            return Err(Error::IncorrectFunctionDefinition {
                token: head.clone(),
            });
        }
        let name_node = &form.children[0];
        if name_node.content.kind != TokenKind::Identifier || !name_node.is_leaf() {
            return Err(Error::FunctionNameIsIncorrect {
                token: name_node.content.clone(),
            });
        }
        let name = name_node.content.clone();

        let (params, body_node) = match form.children.len() {
            1 => return Err(Error::MissingFunctionExpression { token: name }),
            2 => (Vec::new(), &form.children[1]),
            3 => (parse_params(&form.children[1])?, &form.children[2]),
            _ => {
                return Err(Error::IncorrectFunctionDefinition {
                    token: form.children[3].content.clone(),
                })
            }
        };

        let body = if body_node.is_branch() {
            body_node.children.clone()
        } else {
            vec![body_node.clone()]
        };

        Ok(FunctionDef {
            name,
            return_type,
            params,
            body: Arc::new(body),
        })
    }
}

/// Parses the parameter list of a function definition
fn parse_params(node: &SyntaxNode) -> Result<Vec<Parameter>> {
    if node.is_branch() {
        node.children.iter().map(parse_param).collect()
    } else {
        Ok(vec![parse_param(node)?])
    }
}

/// Parses one `(<type> (<name>))` parameter pair
fn parse_param(node: &SyntaxNode) -> Result<Parameter> {
    let ty = if node.content.kind == TokenKind::Keyword {
        ValueType::from_keyword(&node.content.lexeme)
    } else {
        None
    };
    let ty = ty.ok_or_else(|| Error::IncorrectToken {
        token: node.content.clone(),
    })?;
    if node.children.is_empty() {
        return Err(Error::NotEnoughArguments {
            token: node.content.clone(),
        });
    }
    if node.children.len() > 1 {
        return Err(Error::TooManyArguments {
            token: node.content.clone(),
        });
    }
    Ok(Parameter {
        name: node.children[0].content.lexeme.clone(),
        ty,
    })
}

/// The set of functions defined by a program
///
/// Registration order is preserved and lookup returns the first match, so a
/// redefinition of an existing name has no effect.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: Vec<FunctionDef>,
}

impl FunctionTable {
    /// Creates an empty table
    pub fn new() -> Self {
        FunctionTable::default()
    }

    /// Registers a function definition
    pub fn register(&mut self, def: FunctionDef) {
        debug!(name = %def.name.lexeme, params = def.params.len(), "registered function");
        self.functions.push(def);
    }

    /// Looks up a function by name
    pub fn lookup(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name.lexeme == name)
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no functions are registered
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Reader;

    fn form(source: &str) -> SyntaxNode {
        let tokens = Scanner::new(source, "test.lisp").scan_tokens().unwrap();
        Reader::new(tokens).read().unwrap().remove(0)
    }

    #[test]
    fn test_void_function_without_parameters() {
        let def = FunctionDef::from_form(&form("(void main () (println 1))")).unwrap();
        assert_eq!(def.name.lexeme, "main");
        assert_eq!(def.return_type, ReturnType::Void);
        assert!(def.params.is_empty());
        assert_eq!(def.body.len(), 1);
    }

    #[test]
    fn test_typed_function_with_parameter_list() {
        let def =
            FunctionDef::from_form(&form("(int add ((int (x)) (int (y))) (+ x y))")).unwrap();
        assert_eq!(def.return_type, ReturnType::Value(ValueType::Int));
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.params[0].name, "x");
        assert_eq!(def.params[1].ty, ValueType::Int);
    }

    #[test]
    fn test_single_parameter_shorthand() {
        let def = FunctionDef::from_form(&form("(double half (double (x)) (/ x 2.0))")).unwrap();
        assert_eq!(def.params.len(), 1);
        assert_eq!(def.params[0].name, "x");
        assert_eq!(def.params[0].ty, ValueType::Double);
    }

    #[test]
    fn test_body_list_yields_multiple_expressions() {
        let def =
            FunctionDef::from_form(&form("(void main ((println 1) (println 2)))")).unwrap();
        assert_eq!(def.body.len(), 2);
    }

    #[test]
    fn test_missing_body() {
        let result = FunctionDef::from_form(&form("(void main)"));
        assert!(matches!(
            result,
            Err(Error::MissingFunctionExpression { .. })
        ));
    }

    #[test]
    fn test_name_must_be_identifier() {
        let result = FunctionDef::from_form(&form("(void 5 (println 1))"));
        assert!(matches!(result, Err(Error::FunctionNameIsIncorrect { .. })));
    }

    #[test]
    fn test_non_type_head_is_rejected() {
        let result = FunctionDef::from_form(&form("(set main () (println 1))"));
        assert!(matches!(result, Err(Error::IncorrectToken { .. })));
    }

    #[test]
    fn test_parameter_without_name() {
        let result = FunctionDef::from_form(&form("(int f (int ()) (+ 1 2))"));
        assert!(matches!(result, Err(Error::NotEnoughArguments { .. })));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut table = FunctionTable::new();
        let first = FunctionDef::from_form(&form("(int f () (return 1))")).unwrap();
        let second = FunctionDef::from_form(&form("(int f () (return 2))")).unwrap();
        table.register(first.clone());
        table.register(second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("f").unwrap().body, first.body);
    }
}
