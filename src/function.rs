//! User‑defined functions and methods.
//!
//! A [`Function`] pairs a shared declaration with the environment it closed
//! over.  Methods are ordinary functions plus a `bind` step that inserts a
//! one‑slot environment holding `this` between the closure and the call
//! frame.

use std::cell::RefCell;
use std::rc::Rc;

use crate::class::Instance;
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::stmt::FunctionDecl;
use crate::value::Value;

use log::debug;

#[derive(Debug)]
pub struct Function<'a> {
    declaration: Rc<FunctionDecl<'a>>,

    /// Environment in effect where the function was *declared*.
    closure: Rc<RefCell<Environment<'a>>>,

    /// `init` methods return `this` no matter what the body does.
    is_initializer: bool,
}

impl<'a> Function<'a> {
    pub fn new(
        declaration: Rc<FunctionDecl<'a>>,
        closure: Rc<RefCell<Environment<'a>>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &'a str {
        self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Produce a bound method: same declaration, with `this` defined in a
    /// fresh environment wrapped around the original closure.
    pub fn bind(&self, instance: Rc<RefCell<Instance<'a>>>) -> Function<'a> {
        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define("this", Value::Instance(instance));

        Function::new(
            Rc::clone(&self.declaration),
            Rc::new(RefCell::new(env)),
            self.is_initializer,
        )
    }

    /// Invoke the function.  The caller has already checked arity.
    ///
    /// The call frame is a single environment enclosing the closure; the
    /// parameters are defined in it and the body statements run directly
    /// inside it.
    pub fn call(
        &self,
        interpreter: &mut Interpreter<'a>,
        arguments: Vec<Value<'a>>,
    ) -> Result<Value<'a>> {
        debug!("calling <fn {}> with {} args", self.name(), arguments.len());

        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            env.define(param.lexeme, arg);
        }

        let frame = Rc::new(RefCell::new(env));
        let flow = interpreter.execute_block(&self.declaration.body, frame)?;

        match flow {
            Flow::Return(value) => {
                if self.is_initializer {
                    self.bound_this()
                } else {
                    Ok(value)
                }
            }

            // `exit` keeps unwinding through the caller's expression.
            Flow::Exit => Err(LoxError::ExitSignal),

            _ => {
                if self.is_initializer {
                    self.bound_this()
                } else {
                    Ok(Value::Nil)
                }
            }
        }
    }

    /// `this` from the bind environment; only called on initializers, whose
    /// closure always starts with that slot.
    fn bound_this(&self) -> Result<Value<'a>> {
        self.closure.borrow().get_at(0, "this").ok_or_else(|| {
            LoxError::runtime(self.declaration.name.line, "Initializer lost its 'this'")
        })
    }
}
