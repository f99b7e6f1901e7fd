// vim: tw=80
//! Named call recorders.

use fragile::Fragile;
use std::{fmt, sync::{Arc, Mutex}};

use crate::{lock, stub::StubRegistry, Value};

type Fake = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

struct Inner {
    identity: String,
    calls: Mutex<Vec<Vec<Value>>>,
    fake: Mutex<Option<Fake>>,
    stubs: Mutex<Option<Arc<StubRegistry>>>,
}

/// An instrumented callable.
///
/// A `Spy` records the arguments of every call and returns whatever its
/// installed fake returns, or [`Value::Undefined`] if it has none.  Cloning a
/// `Spy` produces another handle to the same spy.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let spy = Spy::new("add");
/// spy.and_call_fake(|args| {
///     let sum = args.iter().filter_map(Value::as_f64).sum::<f64>();
///     Value::from(sum)
/// });
/// assert_eq!(Value::from(5), spy.call([2, 3]));
/// assert_eq!(spy.calls(), [values![2, 3]]);
/// ```
#[derive(Clone)]
pub struct Spy(Arc<Inner>);

impl Spy {
    pub fn new(identity: &str) -> Self {
        Spy(Arc::new(Inner {
            identity: identity.to_owned(),
            calls: Mutex::default(),
            fake: Mutex::default(),
            stubs: Mutex::default(),
        }))
    }

    /// The name this spy was created with.
    pub fn identity(&self) -> &str {
        &self.0.identity
    }

    /// Invoke the spy.
    pub fn call<I>(&self, args: I) -> Value
        where I: IntoIterator,
              I::Item: Into<Value>
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<Value>>();
        self.call_with(&args)
    }

    /// Invoke the spy with an argument slice.
    pub fn call_with(&self, args: &[Value]) -> Value {
        trace!(spy = %self.identity(), ?args, "called");
        lock(&self.0.calls).push(args.to_vec());
        // Don't hold the lock while user code runs
        let fake = lock(&self.0.fake).clone();
        match fake {
            Some(f) => f(args),
            None => Value::Undefined
        }
    }

    /// Replace the spy's behavior.  Any previously installed fake, including
    /// the stub dispatcher, is discarded.
    pub fn and_call_fake<F>(&self, f: F)
        where F: Fn(&[Value]) -> Value + Send + Sync + 'static
    {
        self.install(Arc::new(f));
    }

    /// Single-threaded version of [`and_call_fake`](#method.and_call_fake).
    /// Useful for closures that aren't `Send` or `Sync`.
    ///
    /// It is a runtime error to call the spy from a different thread than
    /// the one that installed the fake.
    pub fn and_call_fake_st<F>(&self, f: F)
        where F: Fn(&[Value]) -> Value + 'static
    {
        let fragile = Fragile::new(f);
        self.install(Arc::new(move |args: &[Value]| (fragile.get())(args)));
    }

    fn install(&self, fake: Fake) {
        *lock(&self.0.fake) = Some(fake);
    }

    /// Arguments of every call so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Value>> {
        lock(&self.0.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.0.calls).len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn most_recent_call(&self) -> Option<Vec<Value>> {
        lock(&self.0.calls).last().cloned()
    }

    /// Number of stubs configured through [`when`](crate::when).
    pub fn stub_count(&self) -> usize {
        lock(&self.0.stubs).as_ref().map_or(0, |r| r.len())
    }

    /// This spy's stub registry, created and installed as the spy's fake on
    /// first use.
    pub(crate) fn stubs(&self) -> Arc<StubRegistry> {
        let mut guard = lock(&self.0.stubs);
        if let Some(registry) = guard.as_ref() {
            return registry.clone();
        }
        let registry = Arc::new(StubRegistry::new(self.identity()));
        let dispatcher = registry.clone();
        self.install(Arc::new(move |args: &[Value]| dispatcher.dispatch(args)));
        *guard = Some(registry.clone());
        registry
    }

    /// Are both handles the same spy?
    pub fn ptr_eq(&self, other: &Spy) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Spy {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Spy")
            .field("identity", &self.0.identity)
            .field("calls", &self.call_count())
            .finish()
    }
}
