//! Operator semantics: arithmetic folds, textual equality, boolean text

use tylisp::lexer::{Scanner, TokenKind};
use tylisp::parser::Reader;
use tylisp::runtime::{Eval, Interpreter};
use tylisp::{Error, Token};

fn eval(source: &str) -> Result<Token, Error> {
    let tokens = Scanner::new(source, "op.lisp").scan_tokens()?;
    let forms = Reader::new(tokens).read()?;
    let mut interp = Interpreter::with_output(Box::new(std::io::sink()));
    match interp.eval(&forms[0])? {
        Eval::Value(token) | Eval::Return(token) => Ok(token),
    }
}

fn lexeme(source: &str) -> String {
    eval(source).unwrap().lexeme
}

#[test]
fn addition_folds_left_to_right() {
    assert_eq!(lexeme("(+ 1 2 3 4)"), "10");
    assert_eq!(lexeme("(- 10 1 2)"), "7");
    assert_eq!(lexeme("(* 2 3 4)"), "24");
}

#[test]
fn one_double_makes_the_whole_fold_double() {
    let token = eval("(+ 1 2.5)").unwrap();
    assert_eq!(token.kind, TokenKind::Double);
    assert_eq!(token.lexeme, "3.500000");
    assert_eq!(lexeme("(* 2 2.0)"), "4.000000");
    assert_eq!(lexeme("(- 5.5 0.5)"), "5.000000");
}

#[test]
fn division_always_yields_a_double() {
    let token = eval("(/ 10 2)").unwrap();
    assert_eq!(token.kind, TokenKind::Double);
    assert_eq!(token.lexeme, "5.000000");
    assert_eq!(lexeme("(/ 7 2)"), "3.500000");
}

#[test]
fn division_by_zero_is_rejected_before_folding() {
    assert!(matches!(
        eval("(/ 10 0)"),
        Err(Error::CannotDivideByZero { .. })
    ));
    assert!(matches!(
        eval("(/ 10 2 0.0)"),
        Err(Error::CannotDivideByZero { .. })
    ));
}

#[test]
fn zero_is_a_legal_dividend() {
    assert_eq!(lexeme("(/ 0 4)"), "0.000000");
}

#[test]
fn plus_concatenates_strings_and_chars() {
    assert_eq!(lexeme("(+ \"foo\" \"bar\")"), "foobar");
    assert_eq!(lexeme("(+ 'a' \"bc\" 'd')"), "abcd");
}

#[test]
fn concatenation_rejects_numbers() {
    assert!(matches!(
        eval("(+ \"foo\" 1)"),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn arithmetic_rejects_non_numeric_operands() {
    assert!(matches!(
        eval("(+ t t)"),
        Err(Error::CannotAddBooleans { .. })
    ));
    assert!(matches!(
        eval("(- 5 \"x\")"),
        Err(Error::CannotSubtractNonNumeric { .. })
    ));
    assert!(matches!(
        eval("(* 'a' 2)"),
        Err(Error::CannotMultiplyNonNumeric { .. })
    ));
    assert!(matches!(
        eval("(/ 8 t)"),
        Err(Error::CannotDivideNonNumeric { .. })
    ));
}

#[test]
fn equality_compares_canonical_text() {
    assert_eq!(lexeme("(= 5 5)"), "t");
    assert_eq!(lexeme("(= \"ab\" \"ab\")"), "t");
    assert_eq!(lexeme("(! 1 2)"), "t");
    // An int and a double may face each other, but their text never matches
    assert_eq!(lexeme("(= 5 5.0)"), "nil");
    assert_eq!(lexeme("(= 5.0 5.000000)"), "nil");
    // A computed double is in canonical rendering
    assert_eq!(lexeme("(= (+ 2.0 3.0) 5.000000)"), "t");
}

#[test]
fn equality_requires_matching_types() {
    assert!(matches!(
        eval("(= 5 \"5\")"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(eval("(! t 'x')"), Err(Error::TypeMismatch { .. })));
}

#[test]
fn ordering_operators_compare_numerically() {
    assert_eq!(lexeme("(> 3 2)"), "t");
    assert_eq!(lexeme("(< 3 2)"), "nil");
    assert_eq!(lexeme("(>= 2.0 2)"), "t");
    assert_eq!(lexeme("(<= 2 1.5)"), "nil");
}

#[test]
fn ordering_operators_reject_non_numeric_operands() {
    assert!(matches!(
        eval("(> \"a\" \"b\")"),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn relational_operators_take_exactly_two_operands() {
    assert!(matches!(
        eval("(< 1)"),
        Err(Error::NotEnoughArguments { .. })
    ));
    assert!(matches!(
        eval("(< 1 2 3)"),
        Err(Error::TooManyArguments { .. })
    ));
}

#[test]
fn boolean_operators_decide_by_text_alone() {
    assert_eq!(lexeme("(& t t)"), "t");
    assert_eq!(lexeme("(& t t nil)"), "nil");
    assert_eq!(lexeme("(| nil t)"), "t");
    assert_eq!(lexeme("(| nil nil)"), "nil");
    // Non-boolean operands are not rejected; their text is simply neither
    // `t` nor `nil`
    assert_eq!(lexeme("(& 5 t)"), "t");
    assert_eq!(lexeme("(| 5 nil)"), "nil");
}

#[test]
fn boolean_operators_need_two_operands() {
    assert!(matches!(
        eval("(& t)"),
        Err(Error::NotEnoughArguments { .. })
    ));
}

#[test]
fn boolean_idempotence() {
    assert_eq!(lexeme("(& t t t t)"), lexeme("(& t t)"));
    assert_eq!(lexeme("(| nil nil nil)"), lexeme("(| nil nil)"));
}

#[test]
fn operations_nest() {
    assert_eq!(lexeme("(+ (* 2 3) (- 10 (/ 8 4)))"), "14.000000");
    assert_eq!(lexeme("(= (+ 1 2) 3)"), "t");
    assert_eq!(lexeme("(& (> 3 2) (< 1 2))"), "t");
}
