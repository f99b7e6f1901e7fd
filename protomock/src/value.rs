// vim: tw=80
//! Dynamically typed values that flow into and out of spies.

use downcast::{downcast, Any};
use std::{fmt, ptr, sync::Arc};

/// Anything that can be stored in a [`Value::Object`].
///
/// Implemented automatically for every `Debug + Send + Sync + 'static` type.
pub trait Opaque: Any + fmt::Debug + Send + Sync {}
downcast!(dyn Opaque);

impl<T: Any + fmt::Debug + Send + Sync> Opaque for T {}

/// A shared, reference-counted callable.
///
/// Two `Function`s are equal only if they are clones of the same original.
#[derive(Clone)]
pub struct Function(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Function {
    pub fn new<F>(f: F) -> Self
        where F: Fn(&[Value]) -> Value + Send + Sync + 'static
    {
        Function(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Do both handles refer to the same callable?
    pub fn ptr_eq(&self, other: &Function) -> bool {
        ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[Function {:p}]", Arc::as_ptr(&self.0) as *const ())
    }
}

/// A shared handle to an arbitrary Rust object.
///
/// Compared by identity, never by content.
#[derive(Clone)]
pub struct Object(Arc<dyn Opaque>);

impl Object {
    pub fn new<T: Opaque>(t: T) -> Self {
        Object(Arc::new(t))
    }

    /// Borrow the wrapped object as its concrete type, if it is a `T`.
    pub fn downcast_ref<T: Opaque>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>().ok()
    }

    /// Do both handles refer to the same allocation?
    pub fn ptr_eq(&self, other: &Object) -> bool {
        ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Object({:?})", &*self.0)
    }
}

/// A dynamically typed argument or return value.
///
/// `PartialEq` implements strict equality: primitives compare by value (so
/// `NaN` never equals itself) while functions and objects compare by
/// identity.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absent value.  Returned by spies with nothing better to say.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Function),
    Object(Object),
}

impl Value {
    /// Wrap an arbitrary Rust object.
    pub fn object<T: Opaque>(t: T) -> Self {
        Value::Object(Object::new(t))
    }

    /// Wrap a closure.
    pub fn function<F>(f: F) -> Self
        where F: Fn(&[Value]) -> Value + Send + Sync + 'static
    {
        Value::Function(Function::new(f))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Boolean coercion.  `undefined`, `null`, `false`, `0`, `NaN` and the
    /// empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Function(_) | Value::Object(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None
        }
    }

    /// Name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false
        }
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    }
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map_or(Value::Undefined, Into::into)
    }
}

/// Results that can be coerced to a boolean, as returned by
/// [`arg_that`](crate::arg_that) predicates.
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

impl Truthy for Value {
    fn truthy(&self) -> bool {
        self.is_truthy()
    }
}
