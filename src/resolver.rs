//! Static resolution pass.
//!
//! Walks the AST between parsing and execution, computing for every
//! variable‑bearing expression how many environments separate its use from
//! its definition.  The distances land in a [`Locals`] side table keyed by
//! [`ExprId`]; the interpreter consults it to bind identifiers *lexically*,
//! so a later re‑declaration can never retarget a captured variable.
//!
//! The pass also rejects constructs that are only detectable statically:
//! reading a local in its own initializer, re‑declaring a local in the same
//! scope, `return` outside a function, returning a value from `init`, and
//! misuse of `this` / `super`.  Errors are reported to the [`Diagnostics`]
//! collector and the walk continues, so one run surfaces them all.
//!
//! Scope discipline: every `begin_scope` here corresponds to exactly one
//! environment the interpreter creates at runtime.  A function body pushes
//! one scope (parameters and body share it); a `for` statement pushes one
//! scope for its initializer; a class body pushes a scope for `super` (when
//! inheriting) and one for `this`.

use std::collections::HashMap;

use crate::error::{Diagnostics, LoxError};
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;

use log::info;

/// Scope distances: expression id → number of environments to hop.
/// Globals never appear here.
pub type Locals = HashMap<ExprId, usize>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

pub struct Resolver<'a, 'd> {
    /// Lexical scope stack; `false` marks "declared but not yet initialized".
    scopes: Vec<HashMap<&'a str, bool>>,

    current_function: FunctionType,
    current_class: ClassType,

    locals: Locals,
    diag: &'d mut Diagnostics,
}

impl<'a, 'd> Resolver<'a, 'd> {
    pub fn new(diag: &'d mut Diagnostics) -> Self {
        Self {
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            locals: Locals::new(),
            diag,
        }
    }

    /// Resolve a whole program and return the computed side table.
    /// Callers check the diagnostics collector before running anything.
    pub fn resolve(mut self, statements: &[Stmt<'a>]) -> Locals {
        info!("Beginning resolve phase over {} statements", statements.len());

        self.resolve_stmts(statements);
        self.locals
    }

    // ────────────────────────── statements ────────────────────────

    fn resolve_stmts(&mut self, statements: &[Stmt<'a>]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt<'a>) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),

            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }

            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }

            // One scope for the whole `for` head, matching the single
            // environment the interpreter wraps around the loop.
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.begin_scope();

                if let Some(init) = initializer {
                    self.resolve_stmt(init);
                }
                if let Some(cond) = condition {
                    self.resolve_expr(cond);
                }
                if let Some(inc) = increment {
                    self.resolve_expr(inc);
                }
                self.resolve_stmt(body);

                self.end_scope();
            }

            Stmt::Function(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name); // defined before the body: recursion
                self.resolve_function(decl, FunctionType::Function);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.diag.report(LoxError::resolve(
                        keyword.line,
                        "Cannot return from top-level code",
                    ));
                }

                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.diag.report(LoxError::resolve(
                            keyword.line,
                            "Cannot return a value from an initializer",
                        ));
                    }

                    self.resolve_expr(value);
                }
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),

            // Placement already validated by the parser.
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Exit(_) => {}

            Stmt::Switch {
                subject,
                cases,
                default,
            } => {
                self.resolve_expr(subject);

                for (value, stmt) in cases {
                    self.resolve_expr(value);
                    self.resolve_stmt(stmt);
                }

                if let Some(default) = default {
                    self.resolve_stmt(default);
                }
            }
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token<'a>,
        superclass: Option<&Expr<'a>>,
        methods: &[std::rc::Rc<FunctionDecl<'a>>],
    ) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(superclass) = superclass {
            if let Expr::Variable {
                name: super_name, ..
            } = superclass
            {
                if super_name.lexeme == name.lexeme {
                    self.diag.report(LoxError::resolve(
                        super_name.line,
                        "A class cannot inherit from itself",
                    ));
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);

            // Scope holding `super`, mirroring the transient environment the
            // interpreter inserts between the methods and their closure.
            self.begin_scope();
            self.scope_define("super");
        }

        self.begin_scope();
        self.scope_define("this");

        for method in methods {
            let declaration = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };

            self.resolve_function(method, declaration);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    /// One scope for parameters *and* body, matching the single call‑frame
    /// environment at runtime.
    fn resolve_function(&mut self, decl: &FunctionDecl<'a>, ftype: FunctionType) {
        let enclosing = self.current_function;
        self.current_function = ftype;

        self.begin_scope();

        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }

        self.resolve_stmts(&decl.body);

        self.end_scope();
        self.current_function = enclosing;
    }

    // ────────────────────────── expressions ───────────────────────

    fn resolve_expr(&mut self, expr: &Expr<'a>) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(inner),

            Expr::Unary { right, .. } => self.resolve_expr(right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }

            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name.lexeme) == Some(&false) {
                        self.diag.report(LoxError::resolve(
                            name.line,
                            "Cannot read local variable in its own initializer",
                        ));
                    }
                }

                self.resolve_local(*id, name.lexeme);
            }

            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.lexeme);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.diag.report(LoxError::resolve(
                        keyword.line,
                        "Cannot use 'this' outside of a class",
                    ));
                    return;
                }

                self.resolve_local(*id, keyword.lexeme);
            }

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.diag.report(LoxError::resolve(
                            keyword.line,
                            "Cannot use 'super' outside of a class",
                        ));
                        return;
                    }
                    ClassType::Class => {
                        self.diag.report(LoxError::resolve(
                            keyword.line,
                            "Cannot use 'super' in a class with no superclass",
                        ));
                        return;
                    }
                    ClassType::Subclass => {}
                }

                self.resolve_local(*id, keyword.lexeme);
            }
        }
    }

    // ─────────────────────────── helpers ──────────────────────────

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Mark `name` as declared‑but‑uninitialized in the innermost scope.
    /// No‑op at global scope: globals may be re‑declared freely.
    fn declare(&mut self, name: &Token<'a>) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name.lexeme) {
                self.diag.report(LoxError::resolve(
                    name.line,
                    format!("Variable '{}' already declared in this scope", name.lexeme),
                ));
            }

            scope.insert(name.lexeme, false);
        }
    }

    fn define(&mut self, name: &Token<'a>) {
        self.scope_define(name.lexeme);
    }

    fn scope_define(&mut self, name: &'a str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    /// Record the hop distance from the innermost scope to the one declaring
    /// `name`.  Not found ⇒ assumed global, left out of the table.
    fn resolve_local(&mut self, id: ExprId, name: &str) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, distance);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_errors(src: &str) -> Vec<String> {
        let tokens: Vec<_> = Scanner::new(src.as_bytes())
            .collect::<crate::error::Result<_>>()
            .expect("test source lexes");

        let mut diag = Diagnostics::new();
        let program = Parser::new(&tokens, &mut diag).parse();
        assert!(diag.is_clean(), "test source parses");

        Resolver::new(&mut diag).resolve(&program);
        diag.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn top_level_return_is_rejected() {
        let errors = resolve_errors("return 1;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Cannot return from top-level code"));
    }

    #[test]
    fn returning_value_from_initializer_is_rejected() {
        let errors = resolve_errors("class A { init() { return 1; } }");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Cannot return a value from an initializer"));
    }

    #[test]
    fn bare_return_in_initializer_is_fine() {
        assert!(resolve_errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn self_inheritance_is_rejected() {
        let errors = resolve_errors("class A < A {}");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("cannot inherit from itself"));
    }

    #[test]
    fn this_outside_class_is_rejected() {
        let errors = resolve_errors("print this;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'this' outside of a class"));
    }

    #[test]
    fn super_without_superclass_is_rejected() {
        let errors = resolve_errors("class A { f() { super.f(); } }");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no superclass"));
    }

    #[test]
    fn double_declaration_in_local_scope_is_rejected() {
        let errors = resolve_errors("{ var a = 1; var a = 2; }");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("already declared"));
    }

    #[test]
    fn reading_local_in_own_initializer_is_rejected() {
        let errors = resolve_errors("{ var a = a; }");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("its own initializer"));
    }

    #[test]
    fn multiple_errors_are_all_reported() {
        let errors = resolve_errors("return 1; print this;");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn global_redeclaration_is_allowed() {
        assert!(resolve_errors("var a = 1; var a = 2;").is_empty());
    }
}
