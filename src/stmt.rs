use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function or method declaration.
///
/// Shared via `Rc` between the AST and every runtime function value created
/// from it, so calling a closure never clones its body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl<'a> {
    pub name: Token<'a>,

    /// Parameter name tokens (arity ≤ 255, enforced by the parser).
    pub params: Vec<Token<'a>>,

    /// Body executed when the function is called.  Resolved and run directly
    /// in the call frame, not as a nested block.
    pub body: Vec<Stmt<'a>>,
}

/// **Abstract‑syntax‑tree node** for *statements* (complete executable
/// constructs).  A program is a sequence of these nodes returned by
/// `Parser::parse`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr<'a>),

    /// `print` statement used for output.
    Print(Expr<'a>),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: Token<'a>,
        initializer: Option<Expr<'a>>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt<'a>>),

    /// `if` / `else` conditional.
    If {
        condition: Expr<'a>,
        then_branch: Box<Stmt<'a>>,
        else_branch: Option<Box<Stmt<'a>>>,
    },

    /// `while` loop.
    While {
        condition: Expr<'a>,
        body: Box<Stmt<'a>>,
    },

    /// `for` loop, kept as a dedicated node rather than desugared to
    /// `while`: `continue` must still run the increment clause, which only
    /// the evaluator can guarantee.
    For {
        initializer: Option<Box<Stmt<'a>>>,
        /// Absent condition defaults to `true`.
        condition: Option<Expr<'a>>,
        increment: Option<Expr<'a>>,
        body: Box<Stmt<'a>>,
    },

    /// Function declaration ‑ becomes a first‑class callable value.
    Function(Rc<FunctionDecl<'a>>),

    /// `return` statement inside a function body.
    Return {
        /// The `return` keyword token (for diagnostics).
        keyword: Token<'a>,

        /// Optional expression to return.  Absent ⇒ `nil` is returned.
        value: Option<Expr<'a>>,
    },

    /// Class declaration with optional single‑inheritance superclass.
    Class {
        name: Token<'a>,

        /// Always an `Expr::Variable` when present; kept as an expression so
        /// it carries an `ExprId` for resolution.
        superclass: Option<Expr<'a>>,

        methods: Vec<Rc<FunctionDecl<'a>>>,
    },

    /// `break;` ‑ terminates the nearest enclosing loop.
    Break(Token<'a>),

    /// `continue;` ‑ resumes the nearest enclosing loop.
    Continue(Token<'a>),

    /// `switch (subject) { case expr: stmt … default: stmt }`.
    /// Cases are tested in source order against the subject; no fallthrough.
    Switch {
        subject: Expr<'a>,
        cases: Vec<(Expr<'a>, Stmt<'a>)>,
        default: Option<Box<Stmt<'a>>>,
    },

    /// `exit;` ‑ unwinds the whole run.
    Exit(Token<'a>),
}
