//! End-to-end interpreter tests: whole programs through scanner, parser,
//! resolver, and evaluator, asserting on captured `print` output.

use std::cell::RefCell;
use std::rc::Rc;

use tlox::error::{Diagnostics, Result};
use tlox::interpreter::{Flow, Interpreter};
use tlox::parser::Parser;
use tlox::resolver::Resolver;
use tlox::scanner::Scanner;
use tlox::token::Token;

/// Run a program and return everything it printed plus its final flow.
/// Panics on front-end diagnostics; returns `Err` on runtime error.
fn run_flow(src: &str) -> Result<(String, bool)> {
    let tokens: Vec<Token> = Scanner::new(src.as_bytes())
        .collect::<Result<Vec<_>>>()
        .expect("test source lexes");

    let mut diag = Diagnostics::new();
    let program = Parser::new(&tokens, &mut diag).parse();
    let locals = Resolver::new(&mut diag).resolve(&program);
    assert!(
        diag.is_clean(),
        "unexpected diagnostics: {:?}",
        diag.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    );

    let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
    let mut interpreter = Interpreter::new().with_output(Rc::clone(&sink));
    interpreter.merge_locals(locals);

    let flow = interpreter.interpret(&program)?;
    let exited = flow == Flow::Exit;

    let bytes = sink.borrow().clone();
    Ok((String::from_utf8(bytes).expect("output is UTF-8"), exited))
}

fn run(src: &str) -> Result<String> {
    run_flow(src).map(|(output, _)| output)
}

macro_rules! assert_prints {
    ($src:expr, $expected:expr) => {
        assert_eq!(run($src).unwrap(), $expected);
    };
}

// ───────────────────────── variables and scope ─────────────────────────

#[test]
fn block_scoping_shadows_and_restores() {
    assert_prints!(
        "var a = \"outer\"; { var a = \"inner\"; print a; } print a;",
        "inner\nouter\n"
    );
}

#[test]
fn closures_capture_their_defining_scope() {
    // The classic resolver test: `a` inside the closure must stay bound to
    // the global even after the block declares a shadowing local.
    assert_prints!(
        "var a = \"global\"; \
         { fun show() { print a; } show(); var a = \"block\"; show(); }",
        "global\nglobal\n"
    );
}

#[test]
fn closures_share_mutable_state() {
    assert_prints!(
        "fun makeCounter() { var n = 0; fun inc() { n = n + 1; print n; } return inc; } \
         var c = makeCounter(); c(); c(); c();",
        "1\n2\n3\n"
    );
}

#[test]
fn each_counter_owns_an_independent_closure() {
    // A second makeCounter call starts back at 1 without disturbing the
    // first counter's state.
    assert_prints!(
        "fun makeCounter() { var n = 0; fun inc() { n = n + 1; print n; } return inc; } \
         var a = makeCounter(); a(); a(); \
         var b = makeCounter(); b(); \
         a();",
        "1\n2\n1\n3\n"
    );
}

#[test]
fn assignment_is_an_expression() {
    assert_prints!("var a = 1; print a = 2; print a;", "2\n2\n");
}

// ───────────────────────── functions ─────────────────────────

#[test]
fn recursion_works() {
    assert_prints!(
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } \
         print fib(10);",
        "55\n"
    );
}

#[test]
fn function_without_return_yields_nil() {
    assert_prints!("fun f() {} print f();", "nil\n");
}

#[test]
fn functions_print_their_name() {
    assert_prints!("fun greet() {} print greet;", "<fn greet>\n");
}

#[test]
fn clock_is_a_native_function() {
    assert_prints!("print clock() >= 0;", "true\n");
}

// ───────────────────────── loops ─────────────────────────

#[test]
fn while_loop_with_break() {
    assert_prints!(
        "var i = 0; while (true) { i = i + 1; if (i == 3) break; } print i;",
        "3\n"
    );
}

#[test]
fn continue_in_for_loop_still_runs_increment() {
    // Without the dedicated For node, `continue` would skip `i = i + 1`
    // and loop forever.
    assert_prints!(
        "for (var i = 0; i < 5; i = i + 1) { if (i == 2) continue; print i; }",
        "0\n1\n3\n4\n"
    );
}

#[test]
fn continue_in_while_loop_rechecks_condition() {
    assert_prints!(
        "var i = 0; var sum = 0; \
         while (i < 5) { i = i + 1; if (i == 2) continue; sum = sum + i; } \
         print sum;",
        "13\n"
    );
}

#[test]
fn break_only_exits_the_innermost_loop() {
    assert_prints!(
        "for (var i = 0; i < 2; i = i + 1) { \
           for (var j = 0; j < 10; j = j + 1) { if (j == 1) break; } \
           print i; \
         }",
        "0\n1\n"
    );
}

#[test]
fn for_initializer_is_scoped_to_the_loop() {
    assert_prints!(
        "var i = 99; for (var i = 0; i < 1; i = i + 1) {} print i;",
        "99\n"
    );
}

#[test]
fn for_loop_variable_is_visible_to_closures_in_the_body() {
    assert_prints!(
        "var f; for (var i = 7; i < 8; i = i + 1) { fun get() { return i; } f = get; } \
         print f();",
        "8\n"
    );
}

// ───────────────────────── switch ─────────────────────────

#[test]
fn switch_runs_first_matching_case_only() {
    assert_prints!(
        "switch (2) { case 1: print \"one\"; case 2: print \"two\"; \
         case 2: print \"again\"; default: print \"other\"; }",
        "two\n"
    );
}

#[test]
fn switch_falls_back_to_default() {
    assert_prints!(
        "switch (9) { case 1: print \"one\"; default: print \"other\"; }",
        "other\n"
    );
}

#[test]
fn switch_without_match_or_default_does_nothing() {
    assert_prints!("switch (9) { case 1: print \"one\"; } print \"after\";", "after\n");
}

#[test]
fn switch_subject_is_evaluated_once() {
    assert_prints!(
        "var n = 0; fun subject() { n = n + 1; return 1; } \
         switch (subject()) { case 0: print \"zero\"; case 1: print \"one\"; } \
         print n;",
        "one\n1\n"
    );
}

#[test]
fn switch_stops_evaluating_case_expressions_after_a_match() {
    assert_prints!(
        "var probes = 0; fun probe(v) { probes = probes + 1; return v; } \
         switch (1) { case probe(1): print \"hit\"; case probe(2): print \"miss\"; } \
         print probes;",
        "hit\n1\n"
    );
}

#[test]
fn switch_compares_strings_too() {
    assert_prints!(
        "switch (\"b\") { case \"a\": print 1; case \"b\": print 2; }",
        "2\n"
    );
}

// ───────────────────────── classes ─────────────────────────

#[test]
fn fields_and_methods() {
    assert_prints!(
        "class Counter { init() { this.n = 0; } bump() { this.n = this.n + 1; } } \
         var c = Counter(); c.bump(); c.bump(); print c.n;",
        "2\n"
    );
}

#[test]
fn constructor_takes_arguments() {
    assert_prints!(
        "class Point { init(x, y) { this.x = x; this.y = y; } } \
         var p = Point(3, 4); print p.x + p.y;",
        "7\n"
    );
}

#[test]
fn methods_bind_this_when_extracted() {
    assert_prints!(
        "class Speaker { init(word) { this.word = word; } say() { print this.word; } } \
         var m = Speaker(\"hi\").say; m();",
        "hi\n"
    );
}

#[test]
fn fields_shadow_methods() {
    assert_prints!(
        "class A { label() { return \"method\"; } } \
         var a = A(); a.label = \"field\"; print a.label;",
        "field\n"
    );
}

#[test]
fn inherited_methods_are_found_through_the_chain() {
    assert_prints!(
        "class A { hello() { print \"A\"; } } class B < A {} class C < B {} \
         C().hello();",
        "A\n"
    );
}

#[test]
fn super_calls_the_parent_method() {
    assert_prints!(
        "class A { greet() { print \"A\"; } } \
         class B < A { greet() { super.greet(); print \"B\"; } } \
         B().greet();",
        "A\nB\n"
    );
}

#[test]
fn super_binds_statically_not_dynamically() {
    // `super` in B::method must target A even when called on a C instance.
    assert_prints!(
        "class A { method() { print \"A method\"; } } \
         class B < A { method() { print \"B method\"; } \
                       test() { super.method(); } } \
         class C < B {} \
         C().test();",
        "A method\n"
    );
}

#[test]
fn init_returns_the_instance() {
    assert_prints!(
        "class A { init() { this.ok = true; return; } } \
         print A().ok;",
        "true\n"
    );
}

#[test]
fn instances_print_their_class_name() {
    assert_prints!("class Bagel {} print Bagel(); print Bagel;", "Bagel instance\nBagel\n");
}

// ───────────────────────── exit ─────────────────────────

#[test]
fn exit_stops_the_program() {
    let (output, exited) = run_flow("print 1; exit; print 2;").unwrap();
    assert_eq!(output, "1\n");
    assert!(exited);
}

#[test]
fn exit_unwinds_out_of_function_calls() {
    let (output, exited) =
        run_flow("fun die() { print \"going\"; exit; } die(); print \"unreached\";").unwrap();
    assert_eq!(output, "going\n");
    assert!(exited);
}

#[test]
fn exit_inside_a_loop_skips_everything_after() {
    let (output, exited) = run_flow(
        "for (var i = 0; i < 10; i = i + 1) { if (i == 2) exit; print i; } print \"end\";",
    )
    .unwrap();
    assert_eq!(output, "0\n1\n");
    assert!(exited);
}

// ───────────────────────── runtime errors ─────────────────────────

#[test]
fn undefined_variable_reports_its_line() {
    let err = run("print 1;\nprint missing;").unwrap_err().to_string();
    assert!(err.contains("[line 2]"), "got {:?}", err);
    assert!(err.contains("Undefined variable 'missing'"), "got {:?}", err);
}

#[test]
fn undefined_property_is_a_runtime_error() {
    let err = run("class A {} print A().nope;").unwrap_err().to_string();
    assert!(err.contains("Undefined property 'nope'"), "got {:?}", err);
}

#[test]
fn property_access_on_non_instance_is_an_error() {
    let err = run("print (4).x;").unwrap_err().to_string();
    assert!(err.contains("Only instances have properties"), "got {:?}", err);
}

#[test]
fn superclass_must_be_a_class() {
    let err = run("var NotAClass = 1; class A < NotAClass {}")
        .unwrap_err()
        .to_string();
    assert!(err.contains("Superclass must be a class"), "got {:?}", err);
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    // The error aborts execution but not the process; prints already
    // flushed stay visible.
    let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
    let src = "print \"first\"; missing; print \"second\";";

    let tokens: Vec<Token> = Scanner::new(src.as_bytes())
        .collect::<Result<Vec<_>>>()
        .unwrap();
    let mut diag = Diagnostics::new();
    let program = Parser::new(&tokens, &mut diag).parse();
    let locals = Resolver::new(&mut diag).resolve(&program);
    assert!(diag.is_clean());

    let mut interpreter = Interpreter::new().with_output(Rc::clone(&sink));
    interpreter.merge_locals(locals);
    assert!(interpreter.interpret(&program).is_err());

    let bytes = sink.borrow().clone();
    assert_eq!(String::from_utf8(bytes).unwrap(), "first\n");
}

#[test]
fn interpreter_survives_a_failed_program() {
    // REPL behavior: state from before the error is still usable.
    let tokens1: Vec<Token> = Scanner::new(b"var x = 41; missing;")
        .collect::<Result<Vec<_>>>()
        .unwrap();
    let tokens2: Vec<Token> = Scanner::new(b"print x + 1;")
        .collect::<Result<Vec<_>>>()
        .unwrap();

    let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
    let mut interpreter = Interpreter::new().with_output(Rc::clone(&sink));

    let mut diag = Diagnostics::new();
    let program1 = Parser::new(&tokens1, &mut diag).parse();
    interpreter.merge_locals(Resolver::new(&mut diag).resolve(&program1));
    assert!(diag.is_clean());
    assert!(interpreter.interpret(&program1).is_err());

    let mut diag = Diagnostics::new();
    let program2 = Parser::new(&tokens2, &mut diag).parse();
    interpreter.merge_locals(Resolver::new(&mut diag).resolve(&program2));
    assert!(diag.is_clean());
    interpreter.interpret(&program2).unwrap();

    let bytes = sink.borrow().clone();
    assert_eq!(String::from_utf8(bytes).unwrap(), "42\n");
}
