use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::environment::Environment;
use super::function::{FunctionDef, FunctionTable, ReturnType};
use super::value::{self, Value};
use crate::error::{Error, Result};
use crate::lexer::{Scanner, Token, TokenKind, ValueType};
use crate::parser::{Reader, SyntaxNode};

/// Outcome of evaluating one expression
///
/// A fired `return` statement is not an error; it travels upward as its own
/// outcome until the enclosing function call consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Eval {
    /// The expression produced this value token
    Value(Token),
    /// A `return` fired; carries the returned value token
    Return(Token),
}

/// Tree-walking evaluator
///
/// Holds the single live [`Environment`], the program's [`FunctionTable`]
/// and the output sink `print`/`println` write to. Function calls swap the
/// environment wholesale; there are no closures and no visibility into the
/// caller's variables.
pub struct Interpreter {
    env: Environment,
    functions: FunctionTable,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// Creates an interpreter printing to standard output
    pub fn new() -> Self {
        Interpreter::with_output(Box::new(std::io::stdout()))
    }

    /// Creates an interpreter printing to the given sink
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Interpreter {
            env: Environment::new(),
            functions: FunctionTable::new(),
            out,
        }
    }

    /// Registers every top-level form as a function definition
    pub fn load(&mut self, forms: &[SyntaxNode]) -> Result<()> {
        for form in forms {
            let def = FunctionDef::from_form(form)?;
            self.functions.register(def);
        }
        Ok(())
    }

    /// Runs the program by calling its `main` function
    ///
    /// `main` must exist, take no parameters and return `void`.
    pub fn run(&mut self) -> Result<()> {
        let main = self
            .functions
            .lookup("main")
            .ok_or(Error::MissingMainFunction)?;
        if !main.params.is_empty() {
            return Err(Error::MainFunctionHasParameters);
        }
        if main.return_type != ReturnType::Void {
            return Err(Error::MainFunctionHasIncorrectReturnType);
        }
        let name = main.name.clone();
        debug!("executing main");
        self.call_function(&name, Vec::new())?;
        Ok(())
    }

    /// Lexes, reads, loads and runs a complete program
    pub fn run_source(&mut self, source: &str, file: &str) -> Result<()> {
        let tokens = Scanner::new(source, file).scan_tokens()?;
        let forms = Reader::new(tokens).read()?;
        self.load(&forms)?;
        self.run()
    }

    /// Evaluates one expression node
    pub fn eval(&mut self, node: &SyntaxNode) -> Result<Eval> {
        match node.content.kind {
            TokenKind::ArithOp | TokenKind::RelOp | TokenKind::BoolOp => {
                self.eval_operation(node)
            }
            TokenKind::Keyword => self.eval_keyword(node),
            TokenKind::Identifier => self.eval_identifier(node),
            _ => Err(Error::SyntaxError {
                token: node.content.clone(),
            }),
        }
    }

    /// Evaluates an operator application
    ///
    /// A leaf passes through unchanged, so bare operands inside a larger
    /// operation keep their original token. Operand resolution runs before
    /// the operator dispatch: a literal child is taken verbatim, an
    /// identifier child is read or called, anything else recurses.
    fn eval_operation(&mut self, node: &SyntaxNode) -> Result<Eval> {
        if node.is_leaf() {
            return Ok(Eval::Value(node.content.clone()));
        }
        let head = &node.content;
        let mut operands = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if child.content.is_value() {
                operands.push(child.content.clone());
            } else if child.content.kind == TokenKind::Identifier {
                match self.eval_identifier(child)? {
                    Eval::Value(token) => operands.push(token),
                    ret => return Ok(ret),
                }
            } else {
                match self.eval_operation(child)? {
                    Eval::Value(token) => operands.push(token),
                    ret => return Ok(ret),
                }
            }
        }
        let result = match head.kind {
            TokenKind::ArithOp => match head.lexeme.as_str() {
                "+" => self.eval_add(head, &operands)?,
                "-" => fold_numeric(head, &operands, NumericOp::Sub)?,
                "*" => fold_numeric(head, &operands, NumericOp::Mul)?,
                "/" => eval_div(head, &operands)?,
                _ => {
                    return Err(Error::IncorrectToken {
                        token: head.clone(),
                    })
                }
            },
            TokenKind::RelOp => eval_relational(head, &operands)?,
            TokenKind::BoolOp => eval_boolean(head, &operands)?,
            _ => {
                return Err(Error::IncorrectToken {
                    token: head.clone(),
                })
            }
        };
        Ok(Eval::Value(result))
    }

    /// Evaluates `+`: concatenation or numeric addition by first operand
    fn eval_add(&mut self, head: &Token, operands: &[Token]) -> Result<Token> {
        match operands[0].kind {
            TokenKind::Str | TokenKind::Char => {
                let mut text = String::new();
                for operand in operands {
                    match operand.kind {
                        TokenKind::Str | TokenKind::Char => text.push_str(&operand.lexeme),
                        _ => return Err(mismatch_to(operand, ValueType::Str)),
                    }
                }
                Ok(Token::new(TokenKind::Str, text, head.file.clone(), head.line))
            }
            TokenKind::Int | TokenKind::Double => fold_numeric(head, operands, NumericOp::Add),
            TokenKind::Bool => Err(Error::CannotAddBooleans {
                token: operands[0].clone(),
            }),
            _ => Err(Error::SyntaxError {
                token: operands[0].clone(),
            }),
        }
    }

    /// Evaluates a keyword form (declaration, `set`, `print`, control flow)
    fn eval_keyword(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let head = &node.content;
        if node.children.is_empty() {
            return Err(Error::MissingToken {
                token: head.clone(),
            });
        }
        match head.lexeme.as_str() {
            "int" | "double" | "bool" | "char" | "string" => self.eval_declaration(node),
            "set" => self.eval_set(node),
            "print" => self.eval_print(node, false),
            "println" => self.eval_print(node, true),
            "if" => self.eval_if(node),
            "while" => self.eval_while(node),
            "return" => self.eval_return(node),
            _ => Err(Error::IncorrectToken {
                token: head.clone(),
            }),
        }
    }

    /// Declares a variable, with the type's default value when no
    /// initializer is given
    fn eval_declaration(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let head = &node.content;
        let ty = ValueType::from_keyword(&head.lexeme).ok_or_else(|| Error::IncorrectToken {
            token: head.clone(),
        })?;
        let name_node = &node.children[0];
        if name_node.content.kind != TokenKind::Identifier {
            return Err(Error::IncorrectToken {
                token: name_node.content.clone(),
            });
        }
        let name = name_node.content.clone();
        let text = match node.children.len() {
            1 => value::default_lexeme(ty).to_string(),
            2 => {
                let token = self.resolve_value(&node.children[1])?;
                let token = match token {
                    Eval::Value(t) => t,
                    ret => return Ok(ret),
                };
                let got = token.kind.value_type().ok_or_else(|| Error::IncorrectToken {
                    token: token.clone(),
                })?;
                if got != ty {
                    return Err(Error::TypeMismatch {
                        from: got,
                        to: ty,
                        token,
                    });
                }
                token.lexeme
            }
            _ => {
                return Err(Error::TooManyArguments {
                    token: head.clone(),
                })
            }
        };
        debug!(name = %name.lexeme, %ty, "declared variable");
        self.env.declare(&name, ty, text)?;
        Ok(Eval::Value(name))
    }

    /// Assigns a new value to an existing variable
    fn eval_set(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let head = &node.content;
        if node.children.len() < 2 {
            return Err(Error::NotEnoughArguments {
                token: head.clone(),
            });
        }
        if node.children.len() > 2 {
            return Err(Error::TooManyArguments {
                token: head.clone(),
            });
        }
        let name_node = &node.children[0];
        if name_node.content.kind != TokenKind::Identifier {
            return Err(Error::IncorrectToken {
                token: name_node.content.clone(),
            });
        }
        let token = match self.resolve_value(&node.children[1])? {
            Eval::Value(t) => t,
            ret => return Ok(ret),
        };
        let ty = token.kind.value_type().ok_or_else(|| Error::IncorrectToken {
            token: token.clone(),
        })?;
        self.env.assign(&name_node.content, ty, token.lexeme)?;
        Ok(Eval::Value(name_node.content.clone()))
    }

    /// Prints every child in order; `println` appends a newline at the end
    fn eval_print(&mut self, node: &SyntaxNode, newline: bool) -> Result<Eval> {
        for child in &node.children {
            let text = if !child.is_leaf() {
                match self.eval(child)? {
                    Eval::Value(token) => token.lexeme,
                    ret => return Ok(ret),
                }
            } else if child.content.kind == TokenKind::Identifier {
                match self.eval_identifier(child)? {
                    Eval::Value(token) => token.lexeme,
                    ret => return Ok(ret),
                }
            } else if child.content.is_value() {
                child.content.lexeme.clone()
            } else {
                return Err(Error::IncorrectToken {
                    token: child.content.clone(),
                });
            };
            self.emit(&text);
        }
        if newline {
            self.emit("\n");
        }
        Ok(Eval::Value(node.content.clone()))
    }

    /// Evaluates an `if` form, restoring declarations made in the taken
    /// branch afterwards
    fn eval_if(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let head = &node.content;
        let token = match self.eval_condition(&node.children[0])? {
            Eval::Value(t) => t,
            ret => return Ok(ret),
        };
        let truth = truth_of(&token)?;
        if node.children.len() < 2 {
            return Err(Error::MissingBody {
                token: head.clone(),
            });
        }
        let body = if truth {
            Some(&node.children[1])
        } else {
            node.children.get(2)
        };
        if let Some(body) = body {
            let snapshot = self.env.snapshot();
            if let Some(ret) = self.run_block(body)? {
                return Ok(ret);
            }
            self.env.restore(snapshot);
        }
        Ok(Eval::Value(head.clone()))
    }

    /// Evaluates a `while` form; the condition is re-evaluated before every
    /// iteration and the environment is restored after each one
    fn eval_while(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let head = node.content.clone();
        loop {
            let token = match self.eval_condition(&node.children[0])? {
                Eval::Value(t) => t,
                ret => return Ok(ret),
            };
            if !truth_of(&token)? {
                break;
            }
            if node.children.len() < 2 {
                return Err(Error::MissingBody { token: head });
            }
            if node.children.len() > 2 {
                return Err(Error::TooManyArguments {
                    token: node.children[2].content.clone(),
                });
            }
            let snapshot = self.env.snapshot();
            if let Some(ret) = self.run_block(&node.children[1])? {
                return Ok(ret);
            }
            self.env.restore(snapshot);
        }
        Ok(Eval::Value(head))
    }

    /// Evaluates a `return` form into a [`Eval::Return`] outcome
    fn eval_return(&mut self, node: &SyntaxNode) -> Result<Eval> {
        if node.children.len() > 1 {
            return Err(Error::TooManyValuesToReturn {
                token: node.content.clone(),
            });
        }
        match self.resolve_value(&node.children[0])? {
            Eval::Value(token) => Ok(Eval::Return(token)),
            ret => Ok(ret),
        }
    }

    /// Reads a variable, or calls a function when the node is not a live
    /// childless variable name
    fn eval_identifier(&mut self, node: &SyntaxNode) -> Result<Eval> {
        let name = &node.content;
        if node.is_leaf() {
            if let Some(var) = self.env.get(&name.lexeme) {
                let token = Token::new(
                    var.ty.token_kind(),
                    var.value.clone(),
                    name.file.clone(),
                    name.line,
                );
                return Ok(Eval::Value(token));
            }
        }
        let mut args = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if child.content.is_value() {
                args.push(child.content.clone());
            } else {
                match self.eval(child)? {
                    Eval::Value(token) => args.push(token),
                    ret => return Ok(ret),
                }
            }
        }
        self.call_function(name, args).map(Eval::Value)
    }

    /// Calls a function with already-evaluated argument tokens
    ///
    /// The callee gets a fresh environment holding only its parameters; the
    /// caller's environment is put back on every exit path, error or not.
    fn call_function(&mut self, name: &Token, args: Vec<Token>) -> Result<Token> {
        let func = self
            .functions
            .lookup(&name.lexeme)
            .cloned()
            .ok_or_else(|| Error::FunctionDoesNotExist {
                token: name.clone(),
            })?;
        if func.params.len() != args.len() {
            return Err(Error::IncorrectNumberOfArgumentsPassed {
                token: name.clone(),
            });
        }
        debug!(name = %name.lexeme, args = args.len(), "calling function");

        let mut callee_env = Environment::new();
        for (param, arg) in func.params.iter().zip(&args) {
            let got = arg.kind.value_type().ok_or_else(|| Error::IncorrectToken {
                token: arg.clone(),
            })?;
            if got != param.ty {
                return Err(Error::TypeMismatch {
                    from: got,
                    to: param.ty,
                    token: arg.clone(),
                });
            }
            let param_name =
                Token::new(TokenKind::Identifier, param.name.clone(), arg.file.clone(), arg.line);
            callee_env.declare(&param_name, param.ty, arg.lexeme.clone())?;
        }

        let saved = std::mem::replace(&mut self.env, callee_env);
        let result = self.run_function_body(&func);
        self.env = saved;
        result
    }

    /// Executes a function body and checks its result against the declared
    /// return type
    fn run_function_body(&mut self, func: &FunctionDef) -> Result<Token> {
        let mut returned = None;
        for expr in func.body.iter() {
            if let Eval::Return(token) = self.eval(expr)? {
                returned = Some(token);
                break;
            }
        }
        match func.return_type {
            ReturnType::Void => Ok(func.name.clone()),
            ReturnType::Value(ty) => {
                let token = returned.ok_or_else(|| Error::MissingReturnValue {
                    token: func.name.clone(),
                })?;
                let got = token.kind.value_type().ok_or_else(|| Error::IncorrectToken {
                    token: token.clone(),
                })?;
                if got != ty {
                    return Err(Error::TypeMismatch {
                        from: got,
                        to: ty,
                        token,
                    });
                }
                Ok(token)
            }
        }
    }

    /// Runs a branch or loop body: a grouping node runs each child in order,
    /// anything else runs as a single expression
    fn run_block(&mut self, body: &SyntaxNode) -> Result<Option<Eval>> {
        if body.is_branch() {
            for expr in &body.children {
                if let Eval::Return(token) = self.eval(expr)? {
                    return Ok(Some(Eval::Return(token)));
                }
            }
            Ok(None)
        } else {
            match self.eval(body)? {
                Eval::Return(token) => Ok(Some(Eval::Return(token))),
                Eval::Value(_) => Ok(None),
            }
        }
    }

    /// Resolves a condition node to a value token
    fn eval_condition(&mut self, cond: &SyntaxNode) -> Result<Eval> {
        if cond.is_leaf() && cond.content.is_value() {
            return Ok(Eval::Value(cond.content.clone()));
        }
        self.eval(cond)
    }

    /// Resolves an initializer or argument node: a literal token is taken
    /// verbatim, anything else is evaluated
    fn resolve_value(&mut self, node: &SyntaxNode) -> Result<Eval> {
        if node.content.is_value() {
            return Ok(Eval::Value(node.content.clone()));
        }
        self.eval(node)
    }

    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

/// Decides truth of a condition token: it must be a boolean, and only the
/// text `t` counts as true
fn truth_of(token: &Token) -> Result<bool> {
    match token.kind.value_type() {
        Some(ValueType::Bool) => Ok(token.lexeme == "t"),
        Some(from) => Err(Error::TypeMismatch {
            from,
            to: ValueType::Bool,
            token: token.clone(),
        }),
        None => Err(Error::IncorrectToken {
            token: token.clone(),
        }),
    }
}

#[derive(Clone, Copy)]
enum NumericOp {
    Add,
    Sub,
    Mul,
}

/// Left fold for `+`, `-` and `*` over numeric operands
///
/// The accumulator is carried as canonical text and re-parsed at every step,
/// so a double result always ends up in the fixed six-digit rendering. The
/// result is a double as soon as any operand is one.
fn fold_numeric(head: &Token, operands: &[Token], op: NumericOp) -> Result<Token> {
    for operand in operands {
        if !matches!(operand.kind, TokenKind::Int | TokenKind::Double) {
            return Err(match op {
                NumericOp::Add => mismatch_to(
                    operand,
                    operands[0].kind.value_type().unwrap_or(ValueType::Int),
                ),
                NumericOp::Sub => Error::CannotSubtractNonNumeric {
                    token: operand.clone(),
                },
                NumericOp::Mul => Error::CannotMultiplyNonNumeric {
                    token: operand.clone(),
                },
            });
        }
    }
    let double_result = operands.iter().any(|o| o.kind == TokenKind::Double);
    let mut acc = operands[0].lexeme.clone();
    for operand in &operands[1..] {
        if double_result {
            let a = value::parse_double(&acc, &operands[0])?;
            let b = value::parse_double(&operand.lexeme, operand)?;
            let result = match op {
                NumericOp::Add => a + b,
                NumericOp::Sub => a - b,
                NumericOp::Mul => a * b,
            };
            acc = Value::Double(result).render();
        } else {
            let a = value::parse_int(&acc, &operands[0])?;
            let b = value::parse_int(&operand.lexeme, operand)?;
            let result = match op {
                NumericOp::Add => a.wrapping_add(b),
                NumericOp::Sub => a.wrapping_sub(b),
                NumericOp::Mul => a.wrapping_mul(b),
            };
            acc = Value::Int(result).render();
        }
    }
    let kind = if double_result {
        TokenKind::Double
    } else {
        TokenKind::Int
    };
    Ok(Token::new(kind, acc, head.file.clone(), head.line))
}

/// Left fold for `/`; the result is always a double and every divisor is
/// checked against zero before any division happens
fn eval_div(head: &Token, operands: &[Token]) -> Result<Token> {
    for operand in operands {
        if !matches!(operand.kind, TokenKind::Int | TokenKind::Double) {
            return Err(Error::CannotDivideNonNumeric {
                token: operand.clone(),
            });
        }
    }
    for operand in &operands[1..] {
        if Value::from_token(operand)?.as_double() == Some(0.0) {
            return Err(Error::CannotDivideByZero {
                token: operand.clone(),
            });
        }
    }
    let mut acc = operands[0].lexeme.clone();
    for operand in &operands[1..] {
        let a = value::parse_double(&acc, &operands[0])?;
        let b = value::parse_double(&operand.lexeme, operand)?;
        acc = Value::Double(a / b).render();
    }
    Ok(Token::new(TokenKind::Double, acc, head.file.clone(), head.line))
}

/// Evaluates a relational operator over exactly two operands
///
/// `=` and `!` compare canonical text, so an integer `5` never equals a
/// double `5.000000`. The ordering operators compare numerically.
fn eval_relational(head: &Token, operands: &[Token]) -> Result<Token> {
    if operands.len() < 2 {
        return Err(Error::NotEnoughArguments {
            token: head.clone(),
        });
    }
    if operands.len() > 2 {
        return Err(Error::TooManyArguments {
            token: head.clone(),
        });
    }
    let (a, b) = (&operands[0], &operands[1]);
    let result = match head.lexeme.as_str() {
        "=" => textual_eq(head, a, b)?,
        "!" => !textual_eq(head, a, b)?,
        ">" => compare_numeric(a, b)? == std::cmp::Ordering::Greater,
        "<" => compare_numeric(a, b)? == std::cmp::Ordering::Less,
        ">=" => compare_numeric(a, b)? != std::cmp::Ordering::Less,
        "<=" => compare_numeric(a, b)? != std::cmp::Ordering::Greater,
        _ => {
            return Err(Error::IncorrectToken {
                token: head.clone(),
            })
        }
    };
    Ok(Value::Bool(result).to_token(head.file.clone(), head.line))
}

/// Textual equality for `=` and `!`; operand types must match exactly,
/// except that integers and doubles may face each other
fn textual_eq(head: &Token, a: &Token, b: &Token) -> Result<bool> {
    let ta = a.kind.value_type().ok_or_else(|| Error::IncorrectToken { token: a.clone() })?;
    let tb = b.kind.value_type().ok_or_else(|| Error::IncorrectToken { token: b.clone() })?;
    let numeric_mix = matches!(
        (ta, tb),
        (ValueType::Int, ValueType::Double) | (ValueType::Double, ValueType::Int)
    );
    if ta != tb && !numeric_mix {
        return Err(Error::TypeMismatch {
            from: ta,
            to: tb,
            token: head.clone(),
        });
    }
    Ok(a.lexeme == b.lexeme)
}

/// Numeric ordering for `>`, `<`, `>=`, `<=`; both operands must be numeric
fn compare_numeric(a: &Token, b: &Token) -> Result<std::cmp::Ordering> {
    for operand in [a, b] {
        if !matches!(operand.kind, TokenKind::Int | TokenKind::Double) {
            return Err(mismatch_to(operand, ValueType::Double));
        }
    }
    let x = value::parse_double(&a.lexeme, a)?;
    let y = value::parse_double(&b.lexeme, b)?;
    Ok(x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal))
}

/// Evaluates `&` or `|` over at least two operands, by text alone
///
/// `&` is false when any operand reads `nil`; every other boolean operator
/// symbol is true when any operand reads `t`. Non-boolean operands are never
/// rejected here; their text simply counts as neither `t` nor `nil`.
fn eval_boolean(head: &Token, operands: &[Token]) -> Result<Token> {
    if operands.len() < 2 {
        return Err(Error::NotEnoughArguments {
            token: head.clone(),
        });
    }
    let result = if head.lexeme == "&" {
        operands.iter().all(|o| o.lexeme != "nil")
    } else {
        operands.iter().any(|o| o.lexeme == "t")
    };
    Ok(Value::Bool(result).to_token(head.file.clone(), head.line))
}

/// Type-mismatch error from an operand token toward a required type
fn mismatch_to(operand: &Token, to: ValueType) -> Error {
    match operand.kind.value_type() {
        Some(from) => Error::TypeMismatch {
            from,
            to,
            token: operand.clone(),
        },
        None => Error::IncorrectToken {
            token: operand.clone(),
        },
    }
}

/// Growable in-memory output sink that stays readable after being handed to
/// an interpreter
#[derive(Clone, Debug, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    /// Creates an empty sink
    pub fn new() -> Self {
        SharedOutput::default()
    }

    /// Everything written so far, as UTF-8 text
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_expr(source: &str) -> Result<Token> {
        let tokens = Scanner::new(source, "test.lisp").scan_tokens()?;
        let forms = Reader::new(tokens).read()?;
        let mut interp = Interpreter::with_output(Box::new(std::io::sink()));
        match interp.eval(&forms[0])? {
            Eval::Value(token) => Ok(token),
            Eval::Return(token) => Ok(token),
        }
    }

    #[test]
    fn test_integer_addition() {
        let token = eval_expr("(+ 1 2 3)").unwrap();
        assert_eq!(token.kind, TokenKind::Int);
        assert_eq!(token.lexeme, "6");
    }

    #[test]
    fn test_double_contaminates_addition() {
        let token = eval_expr("(+ 1 2 3.0)").unwrap();
        assert_eq!(token.kind, TokenKind::Double);
        assert_eq!(token.lexeme, "6.000000");
    }

    #[test]
    fn test_string_concatenation() {
        let token = eval_expr("(+ \"ab\" 'c' \"d\")").unwrap();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.lexeme, "abcd");
    }

    #[test]
    fn test_add_booleans() {
        assert!(matches!(
            eval_expr("(+ t nil)"),
            Err(Error::CannotAddBooleans { .. })
        ));
    }

    #[test]
    fn test_division_is_always_double() {
        let token = eval_expr("(/ 10 2)").unwrap();
        assert_eq!(token.kind, TokenKind::Double);
        assert_eq!(token.lexeme, "5.000000");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            eval_expr("(/ 10 0)"),
            Err(Error::CannotDivideByZero { .. })
        ));
    }

    #[test]
    fn test_zero_dividend_is_allowed() {
        let token = eval_expr("(/ 0 5)").unwrap();
        assert_eq!(token.lexeme, "0.000000");
    }

    #[test]
    fn test_textual_equality_distinguishes_int_and_double() {
        assert_eq!(eval_expr("(= 5 5)").unwrap().lexeme, "t");
        assert_eq!(eval_expr("(= 5 5.0)").unwrap().lexeme, "nil");
        assert_eq!(eval_expr("(! 5 5.0)").unwrap().lexeme, "t");
    }

    #[test]
    fn test_ordering_compares_numerically() {
        assert_eq!(eval_expr("(< 2 10)").unwrap().lexeme, "t");
        assert_eq!(eval_expr("(>= 2.0 2)").unwrap().lexeme, "t");
    }

    #[test]
    fn test_relational_arity() {
        assert!(matches!(
            eval_expr("(= 1)"),
            Err(Error::NotEnoughArguments { .. })
        ));
        assert!(matches!(
            eval_expr("(= 1 2 3)"),
            Err(Error::TooManyArguments { .. })
        ));
    }

    #[test]
    fn test_boolean_operators_read_text() {
        assert_eq!(eval_expr("(& t t t)").unwrap().lexeme, "t");
        assert_eq!(eval_expr("(& t nil)").unwrap().lexeme, "nil");
        assert_eq!(eval_expr("(| nil nil t)").unwrap().lexeme, "t");
        assert_eq!(eval_expr("(| nil nil)").unwrap().lexeme, "nil");
    }

    #[test]
    fn test_nested_operation() {
        assert_eq!(eval_expr("(* (+ 1 2) (- 10 6))").unwrap().lexeme, "12");
    }

    #[test]
    fn test_shared_output() {
        let out = SharedOutput::new();
        let mut interp = Interpreter::with_output(Box::new(out.clone()));
        interp
            .run_source("(void main () (println \"hi\"))", "test.lisp")
            .unwrap();
        assert_eq!(out.contents(), "hi\n");
    }
}
