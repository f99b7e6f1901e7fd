// vim: tw=80
//! Mock instances and the factory that builds them.

use std::{collections::HashSet, fmt, sync::Mutex};

use crate::{
    descriptor::{ClassDescriptor, Member, Method, Prototype},
    lock,
    Error,
    Result,
    Spy,
    Value
};

/// The contents of one member of a [`MockInstance`].
#[derive(Clone, Debug)]
pub enum Slot {
    /// A mocked method.
    Spy(Spy),
    /// A real method inherited from the base class.
    Method(Method),
    /// A method the base class declares but doesn't implement.
    Abstract,
    /// A non-callable member.
    Value(Value),
}

impl Slot {
    fn inherited(member: &Member) -> Self {
        match member {
            Member::Method(Some(m)) => Slot::Method(m.clone()),
            Member::Method(None) => Slot::Abstract,
            Member::Property(v) => Slot::Value(v.clone()),
        }
    }
}

/// A stand-in object built by [`mock`].
///
/// Its members form a single flat table, in the order they were enumerated
/// when the mock was built.
pub struct MockInstance {
    class: String,
    members: Mutex<Vec<(String, Slot)>>,
}

impl MockInstance {
    /// Name of the mocked class.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Member names in enumeration order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.members).iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.members).iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<Slot> {
        lock(&self.members).iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
    }

    /// The spy standing in for method `name`.
    pub fn spy(&self, name: &str) -> Result<Spy> {
        match self.get(name) {
            Some(Slot::Spy(spy)) => Ok(spy),
            Some(_) => Err(Error::NotASpy(name.to_owned())),
            None => Err(Error::NoSuchMember(name.to_owned()))
        }
    }

    /// The current value of non-callable member `name`.
    pub fn value(&self, name: &str) -> Option<Value> {
        match self.get(name) {
            Some(Slot::Value(v)) => Some(v),
            _ => None
        }
    }

    /// Assign a member, replacing whatever was there.
    pub fn set<V: Into<Value>>(&self, name: &str, value: V) {
        let slot = Slot::Value(value.into());
        let mut members = lock(&self.members);
        match members.iter_mut().find(|(n, _)| n == name) {
            Some((_, s)) => *s = slot,
            None => members.push((name.to_owned(), slot))
        }
    }

    /// Call member `name` with `args`.
    ///
    /// # Examples
    /// ```
    /// # use protomock::*;
    /// let clazz = ClassDescriptor::new("Clazz").method("foo");
    /// let instance = mock(&clazz, None).unwrap();
    /// instance.call("foo", values![1, "two"]).unwrap();
    /// assert_eq!(instance.spy("foo").unwrap().calls(), [values![1, "two"]]);
    /// ```
    pub fn call<I>(&self, name: &str, args: I) -> Result<Value>
        where I: IntoIterator,
              I::Item: Into<Value>
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<Value>>();
        // The lock is released before the member runs, so methods may use
        // `self` freely.
        match self.get(name) {
            Some(Slot::Spy(spy)) => Ok(spy.call_with(&args)),
            Some(Slot::Method(m)) => Ok(m.call(self, &args)),
            Some(Slot::Value(Value::Function(f))) => Ok(f.call(&args)),
            Some(Slot::Abstract) => Err(Error::Unimplemented(name.to_owned())),
            Some(Slot::Value(_)) => Err(Error::NotCallable(name.to_owned())),
            None => Err(Error::NoSuchMember(name.to_owned()))
        }
    }
}

impl fmt::Debug for MockInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MockInstance")
            .field("class", &self.class)
            .field("members", &*lock(&self.members))
            .finish()
    }
}

fn prototype_of<'a>(class: &'a ClassDescriptor, role: &str)
    -> Result<&'a Prototype>
{
    class.prototype().ok_or_else(|| Error::InvalidArgument(
        format!("{} `{}` has no prototype", role, class.name())))
}

/// Build a mock instance of `class`.
///
/// Every method of `class`, own or inherited, becomes a fresh [`Spy`] named
/// after the method, and every other member is copied.  `class`'s
/// constructor is never run.
///
/// If `base` is given its members are copied first, unmocked, and take
/// precedence over same-named members of `class`.  Precedence goes by
/// presence, so a base default of `0` or `false` still wins.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `class` or `base` has no prototype.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let clazz = ClassDescriptor::new("Clazz")
///     .method("foo")
///     .property("initialProperty", Value::Null);
/// let instance = mock(&clazz, None).unwrap();
///
/// let foo = instance.spy("foo").unwrap();
/// assert_eq!("foo", foo.identity());
/// assert_eq!(Some(Value::Null), instance.value("initialProperty"));
/// ```
pub fn mock(class: &ClassDescriptor, base: Option<&ClassDescriptor>)
    -> Result<MockInstance>
{
    let proto = prototype_of(class, "class")?;
    let mut present = HashSet::new();
    let mut members = Vec::new();

    if let Some(base) = base {
        for (name, member) in prototype_of(base, "base class")?.members() {
            present.insert(name.to_owned());
            members.push((name.to_owned(), Slot::inherited(member)));
        }
    }

    for (name, member) in proto.members() {
        if present.contains(name) {
            // Already defined by the base class
            continue;
        }
        let slot = match member {
            Member::Method(_) => Slot::Spy(Spy::new(name)),
            Member::Property(v) => Slot::Value(v.clone()),
        };
        present.insert(name.to_owned());
        members.push((name.to_owned(), slot));
    }

    debug!(class = %class.name(),
           base = ?base.map(ClassDescriptor::name),
           members = members.len(),
           skipped_constructor = class.has_constructor(),
           "created mock");
    Ok(MockInstance {
        class: class.name().to_owned(),
        members: Mutex::new(members),
    })
}
