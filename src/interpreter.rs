//! Tree‑walking evaluator.
//!
//! Executes resolved ASTs directly.  Statements produce a [`Flow`] outcome
//! so `break`, `continue` and `return` unwind structurally through the
//! enclosing constructs instead of via exceptions; expression evaluation
//! produces [`Value`]s.  Runtime errors abort the current `interpret` call
//! but leave the interpreter (globals, locals table) intact, which is what
//! lets the REPL keep its session alive across failed lines.
//!
//! Variable binding is lexical: identifiers the resolver assigned a distance
//! are fetched by hopping exactly that many environments; everything else is
//! a global.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::class::{Instance, LoxClass};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::function::Function;
use crate::resolver::Locals;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Outcome of executing a statement.
///
/// Everything except `Normal` unwinds: loops absorb `Break`/`Continue`,
/// function calls absorb `Return`, and `Exit` travels all the way out of
/// [`Interpreter::interpret`].
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<'a> {
    Normal,
    Break,
    Continue,
    Return(Value<'a>),
    Exit,
}

/// The `clock` built‑in: seconds since the Unix epoch, sub‑second precision.
fn clock_native<'a>(_args: &[Value<'a>]) -> std::result::Result<Value<'a>, String> {
    Ok(Value::Number(Utc::now().timestamp_millis() as f64 / 1000.0))
}

pub struct Interpreter<'a> {
    globals: Rc<RefCell<Environment<'a>>>,

    /// Environment of the scope currently executing.
    environment: Rc<RefCell<Environment<'a>>>,

    /// Resolver side table; grows monotonically as the REPL feeds new lines.
    locals: Locals,

    /// Where `print` writes.  Injectable so tests capture output.
    output: Rc<RefCell<dyn Write + 'a>>,
}

impl<'a> Default for Interpreter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Interpreter<'a> {
    pub fn new() -> Self {
        let mut globals = Environment::new();

        globals.define(
            "clock",
            Value::NativeFunction {
                name: "clock",
                arity: 0,
                func: clock_native,
            },
        );

        let globals = Rc::new(RefCell::new(globals));

        info!("Interpreter created");

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: Locals::new(),
            output: Rc::new(RefCell::new(io::stdout())),
        }
    }

    /// Redirect `print` output (tests use an in‑memory buffer).
    ///
    /// Generic over the writer so callers can hand over an
    /// `Rc<RefCell<Vec<u8>>>` as is; the unsizing to `dyn Write` happens
    /// here.
    pub fn with_output<W: Write + 'a>(mut self, output: Rc<RefCell<W>>) -> Self {
        self.output = output;
        self
    }

    /// Absorb a resolver side table.  Ids are globally unique, so extending
    /// never clobbers entries from earlier REPL lines.
    pub fn merge_locals(&mut self, locals: Locals) {
        self.locals.extend(locals);
    }

    /// Execute a whole program (or one REPL line).
    ///
    /// Returns `Flow::Exit` when an `exit` statement fired anywhere in the
    /// run — including inside a function call, where it arrives as the
    /// internal unwinding signal — and `Flow::Normal` otherwise.
    pub fn interpret(&mut self, statements: &[Stmt<'a>]) -> Result<Flow<'a>> {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Exit) => return Ok(Flow::Exit),
                Ok(_) => {}
                Err(LoxError::ExitSignal) => return Ok(Flow::Exit),
                Err(e) => return Err(e),
            }
        }

        Ok(Flow::Normal)
    }

    /// Evaluate a lone expression (the REPL echo path).
    pub fn interpret_expr(&mut self, expr: &Expr<'a>) -> Result<Value<'a>> {
        self.evaluate(expr)
    }

    // ────────────────────────── statements ────────────────────────

    fn execute(&mut self, stmt: &Stmt<'a>) -> Result<Flow<'a>> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output.borrow_mut(), "{}", value)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.evaluate(init)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let env = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(env)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        flow => return Ok(flow),
                    }
                }

                Ok(Flow::Normal)
            }

            // One environment wraps the entire loop so the initializer's
            // variable is scoped to it; restored even when the body errors.
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                let previous = Rc::clone(&self.environment);
                let env = Environment::with_enclosing(Rc::clone(&previous));
                self.environment = Rc::new(RefCell::new(env));

                let result = self.run_for(
                    initializer.as_deref(),
                    condition.as_ref(),
                    increment.as_ref(),
                    body,
                );

                self.environment = previous;
                result
            }

            Stmt::Function(decl) => {
                let function =
                    Function::new(Rc::clone(decl), Rc::clone(&self.environment), false);

                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme, Value::Function(Rc::new(function)));

                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),

            Stmt::Break(_) => Ok(Flow::Break),

            Stmt::Continue(_) => Ok(Flow::Continue),

            Stmt::Switch {
                subject,
                cases,
                default,
            } => {
                let subject = self.evaluate(subject)?;

                // First matching case wins; later case expressions are not
                // evaluated, and there is no fallthrough.
                for (value, stmt) in cases {
                    if self.evaluate(value)? == subject {
                        return self.execute(stmt);
                    }
                }

                match default {
                    Some(stmt) => self.execute(stmt),
                    None => Ok(Flow::Normal),
                }
            }

            Stmt::Exit(_) => {
                debug!("exit statement reached");
                Ok(Flow::Exit)
            }
        }
    }

    /// Execute `statements` inside `environment`, restoring the previous
    /// environment afterwards even on error.  Stops at the first non‑normal
    /// flow and hands it to the caller.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt<'a>],
        environment: Rc<RefCell<Environment<'a>>>,
    ) -> Result<Flow<'a>> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Flow::Normal);

        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn run_for(
        &mut self,
        initializer: Option<&Stmt<'a>>,
        condition: Option<&Expr<'a>>,
        increment: Option<&Expr<'a>>,
        body: &Stmt<'a>,
    ) -> Result<Flow<'a>> {
        if let Some(init) = initializer {
            self.execute(init)?;
        }

        loop {
            if let Some(cond) = condition {
                if !self.evaluate(cond)?.is_truthy() {
                    break;
                }
            }

            // `continue` falls through so the increment still runs.
            match self.execute(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                flow => return Ok(flow),
            }

            if let Some(inc) = increment {
                self.evaluate(inc)?;
            }
        }

        Ok(Flow::Normal)
    }

    fn execute_class(
        &mut self,
        name: &Token<'a>,
        superclass: Option<&Expr<'a>>,
        methods: &[Rc<crate::stmt::FunctionDecl<'a>>],
    ) -> Result<Flow<'a>> {
        let superclass_value = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                other => {
                    return Err(LoxError::runtime(
                        expr.line(),
                        format!("Superclass must be a class, got {}", other.type_name()),
                    ));
                }
            },
            None => None,
        };

        // Two-step definition so methods can refer to the class by name.
        self.environment.borrow_mut().define(name.lexeme, Value::Nil);

        // With a superclass, methods close over a transient environment
        // holding `super`; the resolver pushed the matching scope.
        let method_closure = match &superclass_value {
            Some(class) => {
                let mut env = Environment::with_enclosing(Rc::clone(&self.environment));
                env.define("super", Value::Class(Rc::clone(class)));
                Rc::new(RefCell::new(env))
            }
            None => Rc::clone(&self.environment),
        };

        let mut method_map = HashMap::new();

        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function =
                Function::new(Rc::clone(method), Rc::clone(&method_closure), is_initializer);

            method_map.insert(method.name.lexeme, Rc::new(function));
        }

        let class = LoxClass::new(name.lexeme, superclass_value, method_map);

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        Ok(Flow::Normal)
    }

    // ────────────────────────── expressions ───────────────────────

    fn evaluate(&mut self, expr: &Expr<'a>) -> Result<Value<'a>> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match operator.token_type {
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(LoxError::runtime(
                            operator.line,
                            format!("Operand must be a number, got {}", other.type_name()),
                        )),
                    },

                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

                    _ => unreachable!("parser emits only '!' and '-' unaries"),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary_op(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                // Short-circuit: the operand value itself is the result.
                match operator.token_type {
                    TokenType::OR if left.is_truthy() => Ok(left),
                    TokenType::AND if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        let assigned = self.environment.borrow_mut().assign_at(
                            distance,
                            name.lexeme,
                            value.clone(),
                        );

                        if !assigned {
                            return Err(LoxError::runtime(
                                name.line,
                                format!("Undefined variable '{}'", name.lexeme),
                            ));
                        }
                    }
                    None => {
                        self.globals.borrow_mut().assign(name, value.clone())?;
                    }
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                self.call_value(callee, args, paren)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Instance::get(&instance, name),
                other => Err(LoxError::runtime(
                    name.line,
                    format!("Only instances have properties, got {}", other.type_name()),
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value = self.evaluate(value)?;
                    instance.borrow_mut().set(name, value.clone());
                    Ok(value)
                }
                other => Err(LoxError::runtime(
                    name.line,
                    format!("Only instances have fields, got {}", other.type_name()),
                )),
            },

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn binary_op(
        &self,
        operator: &Token<'a>,
        left: Value<'a>,
        right: Value<'a>,
    ) -> Result<Value<'a>> {
        match operator.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::MINUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::STAR => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            // Division by zero follows IEEE‑754: ±inf, or NaN for 0/0.
            TokenType::SLASH => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::GREATER => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(a > b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::GREATER_EQUAL => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(a >= b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::LESS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(a < b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::LESS_EQUAL => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(a <= b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),

            _ => unreachable!("parser emits no other binary operators"),
        }
    }

    fn call_value(
        &mut self,
        callee: Value<'a>,
        args: Vec<Value<'a>>,
        paren: &Token<'a>,
    ) -> Result<Value<'a>> {
        match callee {
            Value::NativeFunction { name, arity, func } => {
                if args.len() != arity {
                    return Err(LoxError::runtime(
                        paren.line,
                        format!(
                            "Expected {} arguments to {} but got {}",
                            arity,
                            name,
                            args.len()
                        ),
                    ));
                }

                func(&args).map_err(|msg| LoxError::runtime(paren.line, msg))
            }

            Value::Function(function) => {
                if args.len() != function.arity() {
                    return Err(LoxError::runtime(
                        paren.line,
                        format!(
                            "Expected {} arguments but got {}",
                            function.arity(),
                            args.len()
                        ),
                    ));
                }

                function.call(self, args)
            }

            Value::Class(class) => {
                if args.len() != class.arity() {
                    return Err(LoxError::runtime(
                        paren.line,
                        format!(
                            "Expected {} arguments but got {}",
                            class.arity(),
                            args.len()
                        ),
                    ));
                }

                let instance = Instance::new(Rc::clone(&class));

                if let Some(init) = class.find_method("init") {
                    init.bind(Rc::clone(&instance)).call(self, args)?;
                }

                Ok(Value::Instance(instance))
            }

            other => Err(LoxError::runtime(
                paren.line,
                format!(
                    "Can only call functions and classes, got {}",
                    other.type_name()
                ),
            )),
        }
    }

    fn evaluate_super(
        &mut self,
        id: ExprId,
        keyword: &Token<'a>,
        method: &Token<'a>,
    ) -> Result<Value<'a>> {
        let distance = *self.locals.get(&id).ok_or_else(|| {
            LoxError::runtime(keyword.line, "Unresolved 'super' expression")
        })?;

        let superclass = match self.environment.borrow().get_at(distance, "super") {
            Some(Value::Class(class)) => class,
            _ => {
                return Err(LoxError::runtime(keyword.line, "'super' is not a class"));
            }
        };

        // `this` lives one environment inside the one holding `super`.
        let instance = match self.environment.borrow().get_at(distance - 1, "this") {
            Some(Value::Instance(instance)) => instance,
            _ => {
                return Err(LoxError::runtime(keyword.line, "'this' is not bound"));
            }
        };

        let found = superclass.find_method(method.lexeme).ok_or_else(|| {
            LoxError::runtime(
                method.line,
                format!("Undefined property '{}'", method.lexeme),
            )
        })?;

        Ok(Value::Function(Rc::new(found.bind(instance))))
    }

    fn look_up_variable(&self, id: ExprId, name: &Token<'a>) -> Result<Value<'a>> {
        match self.locals.get(&id) {
            Some(&distance) => self
                .environment
                .borrow()
                .get_at(distance, name.lexeme)
                .ok_or_else(|| {
                    LoxError::runtime(
                        name.line,
                        format!("Undefined variable '{}'", name.lexeme),
                    )
                }),
            None => self.globals.borrow().get(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    /// Run a program, returning captured `print` output; panics on any
    /// front-end diagnostic, returns `Err` on runtime error.
    fn run(src: &str) -> Result<String> {
        let tokens: Vec<Token> = Scanner::new(src.as_bytes())
            .collect::<Result<_>>()
            .expect("test source lexes");

        let mut diag = Diagnostics::new();
        let program = Parser::new(&tokens, &mut diag).parse();
        let locals = Resolver::new(&mut diag).resolve(&program);
        assert!(diag.is_clean(), "test source is static-error free");

        let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
        let mut interpreter = Interpreter::new().with_output(Rc::clone(&sink));
        interpreter.merge_locals(locals);
        interpreter.interpret(&program)?;

        let bytes = sink.borrow().clone();
        Ok(String::from_utf8(bytes).expect("output is UTF-8"))
    }

    macro_rules! assert_prints {
        ($src:expr, $expected:expr) => {
            assert_eq!(run($src).unwrap(), $expected);
        };
    }

    macro_rules! assert_runtime_error {
        ($src:expr, $fragment:expr) => {
            let err = run($src).unwrap_err().to_string();
            assert!(
                err.contains($fragment),
                "error {:?} does not mention {:?}",
                err,
                $fragment
            );
        };
    }

    #[test]
    fn arithmetic_and_stringify() {
        assert_prints!("print 1 + 2 * 3;", "7\n");
        assert_prints!("print (1 + 2) * 3;", "9\n");
        assert_prints!("print 10 / 4;", "2.5\n");
        assert_prints!("print -3 + 1;", "-2\n");
        assert_prints!("print 2.50 + 0.50;", "3\n");
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert_prints!("print 1 / 0;", "inf\n");
        assert_prints!("print -1 / 0;", "-inf\n");
        assert_prints!("print 0 / 0;", "NaN\n");
    }

    #[test]
    fn string_concat_and_comparison() {
        assert_prints!("print \"foo\" + \"bar\";", "foobar\n");
        assert_prints!("print \"apple\" < \"banana\";", "true\n");
        assert_prints!("print \"b\" >= \"b\";", "true\n");
    }

    #[test]
    fn mixed_comparison_is_a_runtime_error() {
        assert_runtime_error!("print 1 < \"2\";", "two numbers or two strings");
        assert_runtime_error!("print \"a\" + 1;", "two numbers or two strings");
    }

    #[test]
    fn equality_across_types_is_false() {
        assert_prints!("print 1 == \"1\";", "false\n");
        assert_prints!("print nil == false;", "false\n");
        assert_prints!("print nil == nil;", "true\n");
    }

    #[test]
    fn truthiness() {
        assert_prints!("print !nil;", "true\n");
        assert_prints!("print !0;", "false\n");
        assert_prints!("print !\"\";", "false\n");
    }

    #[test]
    fn logical_operators_return_operands() {
        assert_prints!("print nil or \"fallback\";", "fallback\n");
        assert_prints!("print 1 and 2;", "2\n");
        assert_prints!("print false and 2;", "false\n");
    }

    #[test]
    fn short_circuit_skips_side_effects() {
        assert_prints!(
            "var x = 0; fun bump() { x = x + 1; return true; } \
             false and bump(); print x;",
            "0\n"
        );
    }

    #[test]
    fn ternary_evaluates_one_branch() {
        assert_prints!(
            "var hits = 0; fun tick(v) { hits = hits + 1; return v; } \
             print true ? tick(1) : tick(2); print hits;",
            "1\n1\n"
        );
    }

    #[test]
    fn ternary_is_right_associative() {
        assert_prints!("print false ? 1 : true ? 2 : 3;", "2\n");
    }

    #[test]
    fn unary_minus_requires_a_number() {
        assert_runtime_error!("print -\"oops\";", "Operand must be a number");
    }

    #[test]
    fn calling_a_non_callable_is_an_error() {
        assert_runtime_error!("\"not a fn\"();", "Can only call functions and classes");
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        assert_runtime_error!("fun f(a, b) {} f(1);", "Expected 2 arguments but got 1");
    }

    #[test]
    fn injected_sink_receives_all_prints() {
        // `with_output` must accept a plain `Rc<RefCell<Vec<u8>>>` buffer.
        let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
        let tokens: Vec<Token> = Scanner::new(b"print 1; print 2;")
            .collect::<Result<_>>()
            .unwrap();

        let mut diag = Diagnostics::new();
        let program = Parser::new(&tokens, &mut diag).parse();
        assert!(diag.is_clean());

        let mut interpreter = Interpreter::new().with_output(Rc::clone(&sink));
        interpreter.interpret(&program).unwrap();

        assert_eq!(&*sink.borrow(), b"1\n2\n");
    }

    #[test]
    fn negative_zero_prints_without_sign() {
        assert_prints!("print -0.0;", "0\n");
        assert_prints!("print 0 * -1;", "0\n");
    }
}
