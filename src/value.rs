//! Runtime values for the tlox interpreter.
//!
//! Every expression evaluates to a [`Value`].  Primitive variants are owned
//! directly; callables and instances are reference‑counted so closures,
//! bound methods, and aliased objects share state the way the language
//! requires.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::class::{Instance, LoxClass};
use crate::function::Function;

/// Signature of a built‑in function.  Errors are plain messages; the
/// interpreter attaches the call‑site line.
pub type NativeFn<'a> = fn(&[Value<'a>]) -> Result<Value<'a>, String>;

/// A dynamically‑typed tlox value.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),

    /// Built‑in function provided by the interpreter (e.g. `clock`).
    NativeFunction {
        name: &'static str,
        arity: usize,
        func: NativeFn<'a>,
    },

    /// User‑defined function or bound method.
    Function(Rc<Function<'a>>),

    /// Class object; calling it constructs an instance.
    Class(Rc<LoxClass<'a>>),

    /// Instance of a user‑defined class, shared by reference.
    Instance(Rc<RefCell<Instance<'a>>>),
}

impl<'a> Value<'a> {
    /// Truthiness rule: `nil` and `false` are falsey, everything else is
    /// truthy (including `0` and `""`).
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Human‑readable type name for runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::NativeFunction { .. } => "native function",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

impl<'a> PartialEq for Value<'a> {
    /// Equality by value for primitives, by identity for callables, classes
    /// and instances.  Values of different types are never equal, so
    /// `1 == "1"` is `false` rather than an error.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::NativeFunction { func: a, .. },
                Value::NativeFunction { func: b, .. },
            ) => std::ptr::eq(*a as *const (), *b as *const ()),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<'a> fmt::Display for Value<'a> {
    /// The `print` / stringification format.
    ///
    /// Numbers with no fractional part drop the `.0` (`6`, not `6.0`);
    /// strings print their contents without quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => {
                // itoa only for values an i64 can represent exactly.
                if n.fract() == 0.0 && n.abs() < 9.0e18 {
                    let mut buf = itoa::Buffer::new();
                    write!(f, "{}", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),
            Value::NativeFunction { name, .. } => write!(f, "<native fn {}>", name),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
            Value::Class(class) => write!(f, "{}", class.name),
            Value::Instance(instance) => {
                write!(f, "{} instance", instance.borrow().class.name)
            }
        }
    }
}
