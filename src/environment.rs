//! Lexically‑scoped variable environments.
//!
//! Environments form a parent chain (`enclosing`) mirroring the nesting of
//! blocks and call frames at runtime.  They are shared behind
//! `Rc<RefCell<…>>` because closures capture their defining environment and
//! keep it alive past the block that created it.
//!
//! Bindings are keyed by `&'a str` lexeme slices, so defining a variable
//! never allocates a key.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

use log::debug;

#[derive(Debug, Default)]
pub struct Environment<'a> {
    /// Parent scope; `None` only for the global environment.
    enclosing: Option<Rc<RefCell<Environment<'a>>>>,

    values: HashMap<&'a str, Value<'a>>,
}

impl<'a> Environment<'a> {
    /// Create a fresh global (parent‑less) environment.
    pub fn new() -> Self {
        Self {
            enclosing: None,
            values: HashMap::new(),
        }
    }

    /// Create an environment nested inside `enclosing`.
    pub fn with_enclosing(enclosing: Rc<RefCell<Environment<'a>>>) -> Self {
        Self {
            enclosing: Some(enclosing),
            values: HashMap::new(),
        }
    }

    /// Define (or redefine) `name` in *this* scope.
    pub fn define(&mut self, name: &'a str, value: Value<'a>) {
        debug!("define {} = {}", name, value);

        self.values.insert(name, value);
    }

    /// Look `name` up through the scope chain, innermost first.
    pub fn get(&self, name: &Token<'a>) -> Result<Value<'a>> {
        if let Some(value) = self.values.get(name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(LoxError::runtime(
            name.line,
            format!("Undefined variable '{}'", name.lexeme),
        ))
    }

    /// Assign to an *existing* binding somewhere in the chain.
    pub fn assign(&mut self, name: &Token<'a>, value: Value<'a>) -> Result<()> {
        if let Some(slot) = self.values.get_mut(name.lexeme) {
            *slot = value;
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(LoxError::runtime(
            name.line,
            format!("Undefined variable '{}'", name.lexeme),
        ))
    }

    /// Read a binding exactly `distance` scopes up the chain.
    ///
    /// The distance comes from the resolver, which guarantees the binding
    /// exists at that depth; a miss here is an interpreter bug surfaced as a
    /// runtime error by the caller.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Value<'a>> {
        if distance == 0 {
            return self.values.get(name).cloned();
        }

        self.enclosing
            .as_ref()
            .and_then(|parent| parent.borrow().get_at(distance - 1, name))
    }

    /// Write a binding exactly `distance` scopes up the chain.
    /// Returns `false` when no such slot exists.
    pub fn assign_at(&mut self, distance: usize, name: &'a str, value: Value<'a>) -> bool {
        if distance == 0 {
            if let Some(slot) = self.values.get_mut(name) {
                *slot = value;
                return true;
            }
            return false;
        }

        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign_at(distance - 1, name, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token<'_> {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        assert_eq!(env.get(&ident("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_walks_the_chain() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("x", Value::Number(7.0));

        let inner = Environment::with_enclosing(globals);
        assert_eq!(inner.get(&ident("x")).unwrap(), Value::Number(7.0));
    }

    #[test]
    fn assign_updates_outer_binding() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("x", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.assign(&ident("x"), Value::Number(2.0)).unwrap();

        assert_eq!(globals.borrow().get(&ident("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn get_undefined_is_an_error() {
        let env = Environment::new();
        assert!(env.get(&ident("missing")).is_err());
    }

    #[test]
    fn get_at_skips_shadowing_scopes() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("x", Value::String("outer".into()));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.define("x", Value::String("inner".into()));

        assert_eq!(inner.get_at(0, "x"), Some(Value::String("inner".into())));
        assert_eq!(inner.get_at(1, "x"), Some(Value::String("outer".into())));
    }

    #[test]
    fn assign_at_targets_exact_depth() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("x", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.define("x", Value::Number(10.0));

        assert!(inner.assign_at(1, "x", Value::Number(99.0)));
        assert_eq!(globals.borrow().get_at(0, "x"), Some(Value::Number(99.0)));
        assert_eq!(inner.get_at(0, "x"), Some(Value::Number(10.0)));
    }
}
