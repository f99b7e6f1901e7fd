// vim: tw=80
//! Prototype-driven mock instances with spies and argument-matched stubs.
//!
//! Protomock builds stand-in objects from a description of a class: every
//! method becomes a [`Spy`] that records its calls, and every other member
//! is copied.  Tests then tell individual spies what to return for which
//! arguments.
//!
//! # Usage
//!
//! * Describe the class to mock, either by hand with [`ClassDescriptor`] or
//!   with the [`#[prototype]`](prototype) attribute.
//! * Build an instance with [`mock`].
//! * Configure stubs with [`when`], matching arguments by value or with
//!   [`arg_that`].
//! * Hand the instance, or its spies, to the code under test.
//!
//! ## Getting started
//! ```
//! use protomock::*;
//!
//! let clazz = ClassDescriptor::new("Clazz")
//!     .method("foo");
//! let instance = mock(&clazz, None).unwrap();
//! let foo = instance.spy("foo").unwrap();
//!
//! when(&foo).is_called_with(args!["one", "two"]).then_return("three");
//!
//! assert_eq!(Value::from("three"), instance.call("foo", ["one", "two"]).unwrap());
//! assert_eq!(Value::Undefined, instance.call("foo", ["one", "three"]).unwrap());
//! assert_eq!(2, foo.call_count());
//! ```
//!
//! ## Matching arguments
//!
//! Each position of a pattern is either a literal, compared with strict
//! equality, or a matcher built by [`arg_that`] or [`arg_matching`].
//! Missing arguments compare as [`Value::Undefined`].  A call that matches
//! no stub returns [`Value::Undefined`].
//!
//! ```
//! # use protomock::*;
//! let spy = Spy::new("lookup");
//! let any_string = arg_that(|v: &Value| v.as_str().is_some());
//! when(&spy).is_called_with(args![any_string, 1]).then_return("first");
//! when(&spy).is_called_with(args!["key", 2]).then_return("second");
//!
//! assert_eq!(Value::from("first"), spy.call(values!["anything", 1]));
//! assert_eq!(Value::from("second"), spy.call(values!["key", 2]));
//! assert_eq!(Value::Undefined, spy.call(values![3, 1]));
//! ```
//!
//! ## Overriding stubs
//!
//! Stubs are checked newest first, so configuring the same pattern again
//! replaces the old return value.
//!
//! ```
//! # use protomock::*;
//! let spy = Spy::new("fruit");
//! when(&spy).is_called_with(args!["monkey"]).then_return("apple");
//! when(&spy).is_called_with(args!["monkey"]).then_return("pear");
//! assert_eq!(Value::from("pear"), spy.call(["monkey"]));
//! ```
//!
//! ## Base classes
//!
//! The optional second argument to [`mock`] supplies real behavior.  Its
//! members are not mocked, and they win over same-named members of the
//! mocked class.
//!
//! ```
//! # use protomock::*;
//! let emitter = ClassDescriptor::new("EventEmitter")
//!     .method_with("on", |this, args| {
//!         let event = args[0].as_str().unwrap_or_default();
//!         this.set(&format!("listener:{}", event), args[1].clone());
//!         Value::Undefined
//!     })
//!     .method_with("emit", |this, args| {
//!         let event = args[0].as_str().unwrap_or_default();
//!         this.call(&format!("listener:{}", event), args[1..].to_vec())
//!             .unwrap_or_default()
//!     });
//! let clazz = ClassDescriptor::new("Clazz").method("foo");
//! let instance = mock(&clazz, Some(&emitter)).unwrap();
//!
//! instance.call("on", [Value::from("ping"), Value::function(|_| "pong".into())])
//!     .unwrap();
//! assert_eq!(Value::from("pong"), instance.call("emit", ["ping"]).unwrap());
//! ```
//!
//! ## Crate features
//!
//! * **tracing** (default): emit `tracing` events when mocks are built,
//!   stubs are configured and spies are called.

use std::sync::{Mutex, MutexGuard, PoisonError};

#[macro_use]
mod logging;
mod descriptor;
mod error;
mod mock;
mod spy;
mod stub;
mod value;

pub use descriptor::{ClassDescriptor, Describe, Member, Method, Prototype};
pub use error::{Error, Result};
pub use mock::{mock, MockInstance, Slot};
pub use predicates::prelude::{predicate, Predicate};
pub use protomock_derive::prototype;
pub use spy::Spy;
pub use stub::{
    arg_matching,
    arg_that,
    arg_that_st,
    when,
    ArgMatcher,
    PredicateMatcher,
    Stubbing,
    When
};
pub use value::{Function, Object, Opaque, Truthy, Value};

/// Lock `m`, ignoring poison.  A panicking predicate or fake must not
/// disable the spy for the rest of the test.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build an argument pattern for
/// [`is_called_with`](struct.When.html#method.is_called_with).
///
/// Each element is either a literal, converted with `ArgMatcher::from`, or
/// a matcher from [`arg_that`] / [`arg_matching`].
///
/// # Examples
/// ```
/// # use protomock::*;
/// let pattern = args![5, "x", arg_that(|v: &Value| v.is_truthy())];
/// assert_eq!(3, pattern.len());
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {{
        let pattern: ::std::vec::Vec<$crate::ArgMatcher> =
            ::std::vec![$($crate::ArgMatcher::from($arg)),*];
        pattern
    }};
}

/// Build a list of [`Value`]s, for calling spies with mixed argument types.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let spy = Spy::new("foo");
/// spy.call(values![1, "two", true]);
/// spy.call(values![]);
/// assert_eq!(2, spy.call_count());
/// ```
#[macro_export]
macro_rules! values {
    ($($v:expr),* $(,)?) => {{
        let values: ::std::vec::Vec<$crate::Value> =
            ::std::vec![$($crate::Value::from($v)),*];
        values
    }};
}
