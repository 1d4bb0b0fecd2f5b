//! Runtime values.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::function::{Class, Instance, NativeFunction, UserFunction};

/// Shared, immutable heap allocation for runtime values.
///
/// Cloning shares the allocation. Identity comparison (`ptr_eq`) is what
/// callables and instances use for equality.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self.0).fmt(f)
    }
}

impl From<&str> for Heap<str> {
    fn from(s: &str) -> Self {
        Heap(Rc::from(s))
    }
}

impl From<String> for Heap<str> {
    fn from(s: String) -> Self {
        Heap(Rc::from(s))
    }
}

/// A Lox runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Heap<str>),
    Function(Heap<UserFunction>),
    Native(NativeFunction),
    Class(Heap<Class>),
    Instance(Heap<Instance>),
}

impl Value {
    /// Create a text value.
    #[inline]
    pub fn string(s: impl Into<Heap<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Truthiness: `nil`, `false` and positive zero are falsy.
    ///
    /// `-0` is truthy: zero is matched by bit pattern, not by `==`.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.to_bits() != 0f64.to_bits(),
            _ => true,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text form used when this value is one side of a concatenation.
    ///
    /// Only text, booleans and numbers convert.
    pub fn concat_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(&**s)),
            Value::Bool(_) | Value::Number(_) => Some(Cow::Owned(self.to_string())),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Same-variant comparison: text by content, numbers as boxed doubles
    /// (`NaN` equals itself, `0` differs from `-0`), callables and instances
    /// by identity. Different variants never match.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (Value::Class(a), Value::Class(b)) => Heap::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Number equality as a boxed double sees it: `NaN` equals itself and `0`
/// differs from `-0`.
#[inline]
fn same_number(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            // Whole numbers print without a fractional part
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Function(func) => write!(f, "<fn {}>", func.display_name()),
            Value::Native(_) => write!(f, "<native fn>"),
            Value::Class(class) => f.write_str(class.display_name()),
            Value::Instance(instance) => {
                write!(f, "{} instance", instance.class().display_name())
            }
        }
    }
}

impl fmt::Debug for Value {
    /// Shallow: closures can reach themselves through their environment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Function(func) => write!(f, "Function({})", func.display_name()),
            Value::Native(native) => write!(f, "Native({})", native.name),
            Value::Class(class) => write!(f, "Class({})", class.display_name()),
            Value::Instance(instance) => {
                write!(f, "Instance({})", instance.class().display_name())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
