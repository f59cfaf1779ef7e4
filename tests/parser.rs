//! Parser integration tests: precedence, the extended grammar, and
//! panic-mode error recovery.

use tlox::ast_printer::AstPrinter;
use tlox::error::{Diagnostics, Result};
use tlox::parser::Parser;
use tlox::scanner::Scanner;
use tlox::stmt::Stmt;
use tlox::token::Token;

fn tokens(src: &str) -> Vec<Token<'_>> {
    Scanner::new(src.as_bytes())
        .collect::<Result<Vec<_>>>()
        .expect("test source lexes")
}

/// Parse a lone expression and render it in prefix form.
fn prefix(src: &str) -> String {
    let tokens = tokens(src);
    let mut diag = Diagnostics::new();
    let expr = Parser::new(&tokens, &mut diag)
        .parse_expression()
        .expect("expression parses");
    assert!(diag.is_clean());

    AstPrinter::print(&expr)
}

/// Parse a program, returning the surviving statements and the diagnostics.
fn program(src: &str) -> (Vec<String>, Vec<String>) {
    let tokens = tokens(src);
    let mut diag = Diagnostics::new();
    let stmts = Parser::new(&tokens, &mut diag).parse();

    let shapes = stmts.iter().map(shape).collect();
    let errors = diag.iter().map(|e| e.to_string()).collect();
    (shapes, errors)
}

/// One-word description of a statement, enough to check recovery behavior.
fn shape(stmt: &Stmt<'_>) -> String {
    match stmt {
        Stmt::Expression(_) => "expr",
        Stmt::Print(_) => "print",
        Stmt::Var { .. } => "var",
        Stmt::Block(_) => "block",
        Stmt::If { .. } => "if",
        Stmt::While { .. } => "while",
        Stmt::For { .. } => "for",
        Stmt::Function(_) => "fun",
        Stmt::Return { .. } => "return",
        Stmt::Class { .. } => "class",
        Stmt::Break(_) => "break",
        Stmt::Continue(_) => "continue",
        Stmt::Switch { .. } => "switch",
        Stmt::Exit(_) => "exit",
    }
    .to_string()
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(prefix("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(prefix("(1 + 2) * 3"), "(* (group (+ 1.0 2.0)) 3.0)");
}

#[test]
fn comparison_binds_tighter_than_equality() {
    assert_eq!(prefix("1 < 2 == true"), "(== (< 1.0 2.0) true)");
}

#[test]
fn ternary_sits_between_assignment_and_or() {
    // The whole ternary is the assigned value...
    assert_eq!(prefix("a = true ? 1 : 2"), "(= a (?: true 1.0 2.0))");
    // ...and `or` binds tighter than `?:`.
    assert_eq!(
        prefix("a or b ? 1 : 2"),
        "(?: (or a b) 1.0 2.0)"
    );
}

#[test]
fn ternary_is_right_associative() {
    assert_eq!(
        prefix("a ? 1 : b ? 2 : 3"),
        "(?: a 1.0 (?: b 2.0 3.0))"
    );
}

#[test]
fn missing_colon_in_ternary_is_an_error() {
    let (_, errors) = program("a ? 1;");
    assert!(errors.iter().any(|e| e.contains("':' in ternary")));
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(prefix("a = b = 1"), "(= a (= b 1.0))");
}

#[test]
fn property_access_and_calls_chain() {
    assert_eq!(
        prefix("obj.field.method(1)"),
        "(call (. (. obj field) method) 1.0)"
    );
}

#[test]
fn invalid_assignment_target_is_non_fatal() {
    let (shapes, errors) = program("1 + 2 = 3; print 4;");

    assert!(errors.iter().any(|e| e.contains("Invalid assignment target")));
    // Both statements survive.
    assert_eq!(shapes, vec!["expr", "print"]);
}

#[test]
fn recovery_isolates_independent_errors() {
    let (shapes, errors) = program("var = 1; print 2; fun (x) {} print 3;");

    assert_eq!(errors.len(), 2, "errors: {:?}", errors);
    assert_eq!(shapes, vec!["print", "print"]);
}

#[test]
fn break_outside_a_loop_is_reported() {
    let (_, errors) = program("break;");
    assert!(errors.iter().any(|e| e.contains("'break' outside of a loop")));
}

#[test]
fn continue_outside_a_loop_is_reported() {
    let (_, errors) = program("continue;");
    assert!(errors
        .iter()
        .any(|e| e.contains("'continue' outside of a loop")));
}

#[test]
fn break_inside_nested_function_does_not_see_outer_loop() {
    let (_, errors) = program("while (true) { fun f() { break; } }");
    assert!(errors.iter().any(|e| e.contains("'break' outside of a loop")));
}

#[test]
fn break_inside_a_loop_is_fine() {
    let (shapes, errors) = program("while (true) break;");
    assert!(errors.is_empty(), "errors: {:?}", errors);
    assert_eq!(shapes, vec!["while"]);
}

#[test]
fn for_loop_clauses_are_all_optional() {
    let (shapes, errors) = program("for (;;) break;");
    assert!(errors.is_empty(), "errors: {:?}", errors);
    assert_eq!(shapes, vec!["for"]);
}

#[test]
fn switch_with_cases_and_default() {
    let (shapes, errors) = program(
        "switch (x) { case 1: print \"one\"; case 2: print \"two\"; \
         default: print \"other\"; }",
    );

    assert!(errors.is_empty(), "errors: {:?}", errors);
    assert_eq!(shapes, vec!["switch"]);
}

#[test]
fn switch_rejects_stray_statements_in_body() {
    let (_, errors) = program("switch (x) { print 1; }");
    assert!(errors
        .iter()
        .any(|e| e.contains("'case' or 'default' in switch body")));
}

#[test]
fn duplicate_default_clause_is_reported() {
    let (_, errors) = program("switch (x) { default: print 1; default: print 2; }");
    assert!(errors.iter().any(|e| e.contains("Multiple 'default'")));
}

#[test]
fn class_with_superclass_and_methods() {
    let (shapes, errors) = program("class B < A { init(x) { this.x = x; } go() {} }");
    assert!(errors.is_empty(), "errors: {:?}", errors);
    assert_eq!(shapes, vec!["class"]);
}

#[test]
fn exit_statement_parses() {
    let (shapes, errors) = program("exit;");
    assert!(errors.is_empty(), "errors: {:?}", errors);
    assert_eq!(shapes, vec!["exit"]);
}

#[test]
fn expression_entry_point_rejects_trailing_tokens() {
    let tokens = tokens("1 + 2 3");
    let mut diag = Diagnostics::new();
    let expr = Parser::new(&tokens, &mut diag).parse_expression();

    assert!(expr.is_none());
    assert!(diag
        .iter()
        .any(|e| e.to_string().contains("Expected end of expression")));
}
