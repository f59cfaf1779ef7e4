//! Debug printers for expression trees.
//!
//! [`AstPrinter`] renders the classic parenthesised prefix form used by the
//! `parse` subcommand (`(* (- 123) (group 45.67))`); [`RpnPrinter`] renders
//! postfix, mostly useful for eyeballing precedence in tests.

use crate::expr::{Expr, LiteralValue};

fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e18 {
        let mut buf = itoa::Buffer::new();
        format!("{}.0", buf.format(n as i64))
    } else {
        format!("{}", n)
    }
}

fn fmt_literal(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::Number(n) => fmt_number(*n),
        LiteralValue::Str(s) => s.clone(),
        LiteralValue::True => "true".to_string(),
        LiteralValue::False => "false".to_string(),
        LiteralValue::Nil => "nil".to_string(),
    }
}

/// Parenthesised prefix notation.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr<'_>) -> String {
        match expr {
            Expr::Literal(literal) => fmt_literal(literal),

            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(?: {} {} {})",
                Self::print(condition),
                Self::print(then_branch),
                Self::print(else_branch)
            ),

            Expr::Variable { name, .. } => name.lexeme.to_string(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, Self::print(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut out = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    out.push(' ');
                    out.push_str(&Self::print(arg));
                }
                out.push(')');
                out
            }

            Expr::Get { object, name } => {
                format!("(. {} {})", Self::print(object), name.lexeme)
            }

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                Self::print(object),
                name.lexeme,
                Self::print(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),
        }
    }
}

/// Reverse Polish notation.
pub struct RpnPrinter;

impl RpnPrinter {
    pub fn print(expr: &Expr<'_>) -> String {
        match expr {
            Expr::Literal(literal) => fmt_literal(literal),

            // Grouping is implicit in postfix.
            Expr::Grouping(inner) => Self::print(inner),

            Expr::Unary { operator, right } => {
                format!("{} {}", Self::print(right), operator.lexeme)
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "{} {} {}",
                Self::print(left),
                Self::print(right),
                operator.lexeme
            ),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "{} {} {} ?:",
                Self::print(condition),
                Self::print(then_branch),
                Self::print(else_branch)
            ),

            Expr::Variable { name, .. } => name.lexeme.to_string(),

            Expr::Assign { name, value, .. } => {
                format!("{} {} =", Self::print(value), name.lexeme)
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut out = String::new();
                for arg in arguments {
                    out.push_str(&Self::print(arg));
                    out.push(' ');
                }
                out.push_str(&Self::print(callee));
                out.push_str(" call");
                out
            }

            Expr::Get { object, name } => {
                format!("{} {} .", Self::print(object), name.lexeme)
            }

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "{} {} {} .=",
                Self::print(object),
                name.lexeme,
                Self::print(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("{} super", method.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::parser::Parser;
    use crate::scanner::Scanner;
    use crate::token::Token;

    fn parse_expr(src: &str) -> (Vec<Token<'_>>, Diagnostics) {
        let tokens: Vec<Token> = Scanner::new(src.as_bytes())
            .collect::<crate::error::Result<_>>()
            .expect("test source lexes");
        (tokens, Diagnostics::new())
    }

    #[test]
    fn prefix_form_shows_precedence() {
        let (tokens, mut diag) = parse_expr("-123 * (45.67)");
        let expr = Parser::new(&tokens, &mut diag)
            .parse_expression()
            .expect("parses");

        assert_eq!(AstPrinter::print(&expr), "(* (- 123.0) (group 45.67))");
    }

    #[test]
    fn prefix_form_of_ternary() {
        let (tokens, mut diag) = parse_expr("a ? 1 : 2");
        let expr = Parser::new(&tokens, &mut diag)
            .parse_expression()
            .expect("parses");

        assert_eq!(AstPrinter::print(&expr), "(?: a 1.0 2.0)");
    }

    #[test]
    fn rpn_form_orders_operands_first() {
        let (tokens, mut diag) = parse_expr("(1 + 2) * (4 - 3)");
        let expr = Parser::new(&tokens, &mut diag)
            .parse_expression()
            .expect("parses");

        assert_eq!(RpnPrinter::print(&expr), "1.0 2.0 + 4.0 3.0 - *");
    }
}
