use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

/// Identity of a variable‑bearing expression node.
///
/// The resolver keys its scope‑distance side table on these, so they must be
/// unique across every AST the interpreter will ever execute.  Ids are drawn
/// from a process‑wide counter: REPL lines parsed by fresh `Parser` instances
/// can then never collide in the persistent table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

impl ExprId {
    /// Allocate a fresh, never‑before‑used id.
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A **literal constant** that appears directly in the source code.
///
/// These variants are the *terminal leaves* of the expression tree.  The
/// parser copies (or converts) the value at parse‑time so the literal does
/// not retain the originating [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    /// Integral lexemes such as `"3"` are still parsed as `3.0`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    /// The boolean constant `true`.
    True,

    /// The boolean constant `false`.
    False,

    /// The `nil` literal.
    Nil,
}

/// **Abstract‑syntax‑tree node** representing every kind of *expression*.
///
/// A closed set of variants: each pass (print, resolve, interpret) is an
/// exhaustive `match` over this enum, so "did I handle every node kind" is a
/// compile‑time property.  The lifetime `'a` ties embedded tokens back to the
/// source buffer the scanner lexed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// A literal constant: number, string, `true`, `false`, or `nil`.
    Literal(LiteralValue),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Prefix unary operator expression, `!isReady` or `-42`.
    Unary {
        /// The operator token (`!` or `-`).
        operator: Token<'a>,
        /// Operand to which the operator is applied.
        right: Box<Expr<'a>>,
    },

    /// Infix binary operator expression, `a + b`, `x <= y`.
    Binary {
        left: Box<Expr<'a>>,
        /// Operator token such as `+`, `*`, `==`, …
        operator: Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Short‑circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr<'a>>,
        operator: Token<'a>, // `AND` or `OR`
        right: Box<Expr<'a>>,
    },

    /// Conditional expression `cond ? then : else`, right‑associative.
    Ternary {
        condition: Box<Expr<'a>>,
        then_branch: Box<Expr<'a>>,
        else_branch: Box<Expr<'a>>,
    },

    /// Variable access ‑ resolves to the identifier’s current value at runtime.
    Variable { id: ExprId, name: Token<'a> },

    /// Assignment expression: `identifier "=" expression`.
    Assign {
        id: ExprId,
        name: Token<'a>,
        value: Box<Expr<'a>>,
    },

    /// Function‑, method‑ or class‑call expression, `clock()` or `add(1, 2)`.
    Call {
        /// Expression that evaluates to a callable (variable, property, etc.).
        callee: Box<Expr<'a>>,
        /// The closing `)` token ‑ retained for error reporting.
        paren: Token<'a>,
        /// Argument list (may be empty).
        arguments: Vec<Expr<'a>>,
    },

    /// object.property
    Get {
        object: Box<Expr<'a>>,
        name: Token<'a>,
    },

    /// object.property = value
    Set {
        object: Box<Expr<'a>>,
        name: Token<'a>,
        value: Box<Expr<'a>>,
    },

    /// The 'this' keyword inside a method.
    This { id: ExprId, keyword: Token<'a> },

    /// `super.method` inside a subclass method.
    Super {
        id: ExprId,
        keyword: Token<'a>,
        method: Token<'a>,
    },
}

impl<'a> Expr<'a> {
    /// Best‑effort source line for diagnostics.
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(_) => 0,
            Expr::Grouping(inner) => inner.line(),
            Expr::Unary { operator, .. } => operator.line,
            Expr::Binary { operator, .. } => operator.line,
            Expr::Logical { operator, .. } => operator.line,
            Expr::Ternary { condition, .. } => condition.line(),
            Expr::Variable { name, .. } => name.line,
            Expr::Assign { name, .. } => name.line,
            Expr::Call { paren, .. } => paren.line,
            Expr::Get { name, .. } => name.line,
            Expr::Set { name, .. } => name.line,
            Expr::This { keyword, .. } => keyword.line,
            Expr::Super { keyword, .. } => keyword.line,
        }
    }
}
