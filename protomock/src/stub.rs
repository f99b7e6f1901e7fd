// vim: tw=80
//! Argument-matched return values for spies.

use fragile::Fragile;
use predicates::prelude::{predicate, Predicate};
use predicates_tree::CaseTreeExt;
use std::{fmt, sync::{Arc, Mutex}};

use crate::{
    lock,
    value::{Function, Object, Truthy},
    Spy,
    Value
};

static UNDEFINED: Value = Value::Undefined;

/// A matcher defined by a predicate rather than by equality.  Built by
/// [`arg_that`] and [`arg_matching`].
pub struct PredicateMatcher(Box<dyn Predicate<Value> + Send + Sync>);

impl PredicateMatcher {
    pub fn matches(&self, actual: &Value) -> bool {
        self.0.eval(actual)
    }

    /// Render why `actual` was rejected, or `None` if it wasn't.
    fn explain(&self, actual: &Value) -> Option<String> {
        self.0.find_case(false, actual)
            .map(|case| case.tree().to_string())
    }
}

impl fmt::Debug for PredicateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PredicateMatcher({})", self.0)
    }
}

/// One position of an argument pattern.
#[derive(Debug)]
pub enum ArgMatcher {
    /// Matches an argument strictly equal to this value.
    Literal(Value),
    /// Matches any argument the predicate accepts.
    Predicate(PredicateMatcher),
}

impl ArgMatcher {
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            ArgMatcher::Literal(expected) => expected == actual,
            ArgMatcher::Predicate(p) => p.matches(actual)
        }
    }

    fn explain(&self, actual: &Value) -> Option<String> {
        match self {
            ArgMatcher::Literal(expected) if expected != actual =>
                Some(format!("{:?} !== {:?}", actual, expected)),
            ArgMatcher::Literal(_) => None,
            ArgMatcher::Predicate(p) => p.explain(actual)
        }
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ArgMatcher {
                fn from(v: $ty) -> Self {
                    ArgMatcher::Literal(Value::from(v))
                }
            }
        )*
    }
}

literal_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
              bool, &str, String, Function, Object, Value);

impl From<PredicateMatcher> for ArgMatcher {
    fn from(p: PredicateMatcher) -> Self {
        ArgMatcher::Predicate(p)
    }
}

/// Match any argument for which `f` returns something truthy.
///
/// Panics raised by `f` propagate out of the stubbed call.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let spy = Spy::new("foo");
/// let is_even = arg_that(|v: &Value| {
///     v.as_f64().is_some_and(|n| n % 2.0 == 0.0)
/// });
/// when(&spy).is_called_with(args![is_even]).then_return("woo");
/// assert_eq!(Value::from("woo"), spy.call([4]));
/// assert_eq!(Value::Undefined, spy.call([3]));
/// ```
pub fn arg_that<F, R>(f: F) -> ArgMatcher
    where F: Fn(&Value) -> R + Send + Sync + 'static,
          R: Truthy
{
    let p = predicate::function(move |v: &Value| f(v).truthy())
        .fn_name("arg_that");
    arg_matching(p)
}

/// Single-threaded version of [`arg_that`].  Useful for closures that
/// aren't `Send` or `Sync`.
///
/// It is a runtime error to evaluate the matcher on a different thread than
/// the one that created it.
pub fn arg_that_st<F, R>(f: F) -> ArgMatcher
    where F: Fn(&Value) -> R + 'static,
          R: Truthy
{
    let fragile = Fragile::new(f);
    let p = predicate::function(move |v: &Value| (fragile.get())(v).truthy())
        .fn_name("arg_that_st");
    arg_matching(p)
}

/// Match any argument accepted by a [`Predicate`].
///
/// # Examples
/// ```
/// # use protomock::*;
/// let spy = Spy::new("foo");
/// let small = arg_matching(predicate::in_iter([Value::from(1),
///                                              Value::from(2)]));
/// when(&spy).is_called_with(args![small]).then_return(true);
/// assert_eq!(Value::from(true), spy.call([2]));
/// assert_eq!(Value::Undefined, spy.call([5]));
/// ```
pub fn arg_matching<P>(p: P) -> ArgMatcher
    where P: Predicate<Value> + Send + Sync + 'static
{
    ArgMatcher::Predicate(PredicateMatcher(Box::new(p)))
}

/// An argument pattern bound to a return value.
#[derive(Debug)]
struct MatchRule {
    pattern: Vec<ArgMatcher>,
    value: Value,
}

impl MatchRule {
    /// Missing arguments are compared as `undefined`; surplus arguments are
    /// ignored.
    fn matches(&self, args: &[Value]) -> bool {
        self.pattern.iter()
            .enumerate()
            .all(|(i, m)| m.matches(args.get(i).unwrap_or(&UNDEFINED)))
    }

    /// Describe the first position that rejects `args`.
    fn explain(&self, args: &[Value]) -> Option<String> {
        self.pattern.iter()
            .enumerate()
            .find_map(|(i, m)| {
                m.explain(args.get(i).unwrap_or(&UNDEFINED))
                    .map(|why| format!("argument {}: {}", i, why))
            })
    }
}

/// The stubs configured on one spy.
///
/// Rules are only ever appended.  Dispatch checks the most recently
/// configured rule first, so reconfiguring a pattern overrides it.
pub(crate) struct StubRegistry {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    identity: String,
    rules: Mutex<Vec<Arc<MatchRule>>>,
}

impl StubRegistry {
    pub(crate) fn new(identity: &str) -> Self {
        StubRegistry {
            identity: identity.to_owned(),
            rules: Mutex::default(),
        }
    }

    fn push(&self, rule: MatchRule) {
        lock(&self.rules).push(Arc::new(rule));
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.rules).len()
    }

    /// Return the value of the newest rule matching `args`, or `undefined`.
    ///
    /// Each predicate runs at most once per call.  When trace events are
    /// enabled the match is done with `find_case`, which yields the reason
    /// for each rejection in the same evaluation.
    pub(crate) fn dispatch(&self, args: &[Value]) -> Value {
        // Predicates may panic or call back into the spy, so evaluate them
        // without holding the lock.
        let rules = lock(&self.rules).clone();
        let verbose = trace_enabled!();
        let mut rejected = Vec::new();
        let found = rules.iter().rev().find(|r| {
            if !verbose {
                return r.matches(args);
            }
            match r.explain(args) {
                Some(why) => {
                    rejected.push(why);
                    false
                },
                None => true
            }
        });
        if let Some(rule) = found {
            trace!(spy = %self.identity, value = ?rule.value, "stub matched");
            return rule.value.clone();
        }
        trace!(spy = %self.identity, ?args, report = %rejected.join("\n"),
               "no stub matched");
        Value::Undefined
    }
}

/// First stage of stub configuration.  Returned by [`when`].
#[must_use = "call is_called_with and then_return to configure a stub"]
pub struct When<'a> {
    spy: &'a Spy,
}

impl<'a> When<'a> {
    /// Capture the argument pattern.  Each position is a literal or a
    /// matcher; see [`args!`](crate::args).
    pub fn is_called_with<P>(self, pattern: P) -> Stubbing<'a>
        where P: IntoIterator<Item = ArgMatcher>
    {
        Stubbing {
            spy: self.spy,
            pattern: pattern.into_iter().collect(),
        }
    }
}

/// Second stage of stub configuration.
#[must_use = "call then_return to configure a stub"]
pub struct Stubbing<'a> {
    spy: &'a Spy,
    pattern: Vec<ArgMatcher>,
}

impl Stubbing<'_> {
    /// Make calls matching the captured pattern return `value`.  Later
    /// stubs take precedence over earlier ones.
    pub fn then_return<V: Into<Value>>(self, value: V) {
        let rule = MatchRule {
            pattern: self.pattern,
            value: value.into(),
        };
        debug!(spy = %self.spy.identity(), pattern = ?rule.pattern,
               value = ?rule.value, "stubbed");
        self.spy.stubs().push(rule);
    }
}

/// Start configuring a stub on `spy`.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let spy = Spy::new("foo");
/// when(&spy).is_called_with(args!["one", "two"]).then_return("three");
/// assert_eq!(Value::from("three"), spy.call(["one", "two"]));
/// assert_eq!(Value::Undefined, spy.call(["one", "three"]));
/// ```
pub fn when(spy: &Spy) -> When<'_> {
    When { spy }
}
