//! Classes and instances.
//!
//! A [`LoxClass`] is the runtime object a `class` declaration evaluates to;
//! calling it constructs an [`Instance`].  Method lookup walks the single
//! inheritance chain; fields live per instance and shadow methods of the
//! same name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{LoxError, Result};
use crate::function::Function;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug)]
pub struct LoxClass<'a> {
    pub name: &'a str,
    superclass: Option<Rc<LoxClass<'a>>>,
    methods: HashMap<&'a str, Rc<Function<'a>>>,
}

impl<'a> LoxClass<'a> {
    pub fn new(
        name: &'a str,
        superclass: Option<Rc<LoxClass<'a>>>,
        methods: HashMap<&'a str, Rc<Function<'a>>>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    /// Look a method up on this class, then up the inheritance chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function<'a>>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Constructor arity is the `init` method's arity, or zero without one.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

/// A mutable bag of fields tagged with its class.
#[derive(Debug)]
pub struct Instance<'a> {
    pub class: Rc<LoxClass<'a>>,
    fields: HashMap<&'a str, Value<'a>>,
}

impl<'a> Instance<'a> {
    pub fn new(class: Rc<LoxClass<'a>>) -> Rc<RefCell<Instance<'a>>> {
        Rc::new(RefCell::new(Instance {
            class,
            fields: HashMap::new(),
        }))
    }

    /// Property access: fields first, then methods (bound to `instance`).
    ///
    /// Takes the `Rc` rather than `&self` because binding a method needs to
    /// store a handle to the instance itself.
    pub fn get(
        instance: &Rc<RefCell<Instance<'a>>>,
        name: &Token<'a>,
    ) -> Result<Value<'a>> {
        if let Some(field) = instance.borrow().fields.get(name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = instance.borrow().class.find_method(name.lexeme) {
            let bound = method.bind(Rc::clone(instance));
            return Ok(Value::Function(Rc::new(bound)));
        }

        Err(LoxError::runtime(
            name.line,
            format!("Undefined property '{}'", name.lexeme),
        ))
    }

    /// Property assignment always targets a field; it creates one if needed.
    pub fn set(&mut self, name: &Token<'a>, value: Value<'a>) {
        self.fields.insert(name.lexeme, value);
    }
}
