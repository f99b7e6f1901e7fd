// vim: tw=80
//! Class descriptors: explicit member tables that stand in for a type's
//! prototype.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::{MockInstance, Value};

/// A concrete method body.  It receives the instance it was called on and
/// the call's arguments.
#[derive(Clone)]
pub struct Method(Arc<dyn Fn(&MockInstance, &[Value]) -> Value + Send + Sync>);

impl Method {
    pub fn new<F>(f: F) -> Self
        where F: Fn(&MockInstance, &[Value]) -> Value + Send + Sync + 'static
    {
        Method(Arc::new(f))
    }

    pub fn call(&self, this: &MockInstance, args: &[Value]) -> Value {
        (self.0)(this, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Method")
    }
}

/// One entry in a [`Prototype`].
#[derive(Clone, Debug)]
pub enum Member {
    /// A callable member.  Declared-only methods carry no body.
    Method(Option<Method>),
    /// A non-callable member and its default value.
    Property(Value),
}

impl Member {
    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

/// An ordered member table with an optional parent.
#[derive(Clone, Debug, Default)]
pub struct Prototype {
    members: Vec<(String, Member)>,
    parent: Option<Arc<Prototype>>,
}

impl Prototype {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine an own member.  Redefinition keeps the member's
    /// original position.
    pub fn define(&mut self, name: &str, member: Member) {
        match self.members.iter_mut().find(|(n, _)| n == name) {
            Some((_, m)) => *m = member,
            None => self.members.push((name.to_owned(), member))
        }
    }

    pub fn set_parent(&mut self, parent: Option<Arc<Prototype>>) {
        self.parent = parent;
    }

    pub fn parent(&self) -> Option<&Prototype> {
        self.parent.as_deref()
    }

    /// Own members only, in definition order.
    pub fn own_members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// Every member reachable from this prototype: own members first, then
    /// each ancestor's members that a nearer prototype doesn't shadow.
    pub fn members(&self) -> Vec<(&str, &Member)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut proto = Some(self);
        while let Some(p) = proto {
            for (name, member) in p.own_members() {
                if seen.insert(name) {
                    out.push((name, member));
                }
            }
            proto = p.parent();
        }
        out
    }

    /// Resolve `name` through the parent chain.
    pub fn lookup(&self, name: &str) -> Option<&Member> {
        let mut proto = Some(self);
        while let Some(p) = proto {
            if let Some((_, m)) = p.members.iter().find(|(n, _)| n == name) {
                return Some(m);
            }
            proto = p.parent();
        }
        None
    }
}

/// Describes a class-like type: its name, its (never invoked) constructor,
/// and its prototype.
///
/// # Examples
/// ```
/// # use protomock::*;
/// let emitter = ClassDescriptor::new("EventEmitter")
///     .method_with("listenerCount", |_this, _args| Value::from(0));
/// let widget = ClassDescriptor::new("Widget")
///     .extends(&emitter)
///     .method("render")
///     .property("width", 80);
/// let names = widget.prototype().unwrap().members().into_iter()
///     .map(|(n, _)| n)
///     .collect::<Vec<_>>();
/// assert_eq!(names, ["render", "width", "listenerCount"]);
/// ```
#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    constructor: Option<Arc<dyn Fn() + Send + Sync>>,
    prototype: Option<Arc<Prototype>>,
}

impl ClassDescriptor {
    /// A class with an empty prototype.
    pub fn new(name: &str) -> Self {
        ClassDescriptor {
            name: name.to_owned(),
            constructor: None,
            prototype: Some(Arc::new(Prototype::new())),
        }
    }

    /// A callable with no prototype at all.  Can't be mocked, but can still
    /// gain one by defining members on it.
    pub fn without_prototype(name: &str) -> Self {
        ClassDescriptor {
            name: name.to_owned(),
            constructor: None,
            prototype: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prototype(&self) -> Option<&Prototype> {
        self.prototype.as_deref()
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    fn prototype_mut(&mut self) -> &mut Prototype {
        Arc::make_mut(self.prototype.get_or_insert_with(Default::default))
    }

    /// Record the type's initializer.  Mocking never runs it.
    pub fn constructor<F>(mut self, f: F) -> Self
        where F: Fn() + Send + Sync + 'static
    {
        self.constructor = Some(Arc::new(f));
        self
    }

    /// Inherit `parent`'s prototype.
    pub fn extends(mut self, parent: &ClassDescriptor) -> Self {
        let parent = parent.prototype.clone();
        self.prototype_mut().set_parent(parent);
        self
    }

    /// Declare a method with no body.
    pub fn method(mut self, name: &str) -> Self {
        self.prototype_mut().define(name, Member::Method(None));
        self
    }

    /// Define a method with a concrete body.
    pub fn method_with<F>(mut self, name: &str, f: F) -> Self
        where F: Fn(&MockInstance, &[Value]) -> Value + Send + Sync + 'static
    {
        self.prototype_mut().define(name, Member::Method(Some(Method::new(f))));
        self
    }

    /// Define a non-callable member with a default value.
    pub fn property<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.prototype_mut().define(name, Member::Property(value.into()));
        self
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("constructor", &self.constructor.is_some())
            .field("prototype", &self.prototype)
            .finish()
    }
}

/// Types that can describe themselves as a [`ClassDescriptor`].
///
/// Usually implemented with the [`prototype`](crate::prototype) attribute.
pub trait Describe {
    fn descriptor() -> ClassDescriptor;
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn redefinition_keeps_position() {
        let d = ClassDescriptor::new("C")
            .method("a")
            .property("b", 1)
            .property("a", 2);
        let p = d.prototype().unwrap();
        let names = p.own_members().map(|(n, _)| n).collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert!(!p.lookup("a").unwrap().is_method());
    }

    #[test]
    fn shadowed_members_are_enumerated_once() {
        let base = ClassDescriptor::new("Base")
            .method("shared")
            .method("inherited");
        let d = ClassDescriptor::new("Derived")
            .extends(&base)
            .property("shared", 0);
        let p = d.prototype().unwrap();
        let members = p.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].0, "shared");
        assert!(!members[0].1.is_method());
        assert_eq!(members[1].0, "inherited");
    }

    #[test]
    fn lookup_walks_the_chain() {
        let base = ClassDescriptor::new("Base").property("x", 1);
        let d = ClassDescriptor::new("Derived").extends(&base);
        let p = d.prototype().unwrap();
        assert!(p.lookup("x").is_some());
        assert!(p.lookup("y").is_none());
    }

    #[test]
    fn defining_members_creates_a_prototype() {
        let d = ClassDescriptor::without_prototype("f");
        assert!(d.prototype().is_none());
        let d = d.method("call");
        assert!(d.prototype().is_some());
    }
}
