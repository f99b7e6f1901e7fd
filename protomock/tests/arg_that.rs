// vim: tw=80
//! Predicate matchers.

use protomock::*;
use std::{cell::Cell, panic, rc::Rc};

fn is_even(v: &Value) -> bool {
    v.as_f64().is_some_and(|n| n % 2.0 == 0.0)
}

#[test]
fn handles_arg_that_matchers() {
    let foo = Spy::new("foo");

    when(&foo).is_called_with(args![arg_that(is_even)]).then_return("woo");

    assert_eq!(Value::from("woo"), foo.call([4]));
    assert_eq!(Value::Undefined, foo.call([3]));
}

#[test]
fn mixed_with_literals() {
    let foo = Spy::new("foo");

    when(&foo).is_called_with(args!["key", arg_that(is_even)])
        .then_return("even");

    assert_eq!(Value::from("even"), foo.call(values!["key", 2]));
    assert_eq!(Value::Undefined, foo.call(values!["key", 1]));
    assert_eq!(Value::Undefined, foo.call(values!["other", 2]));
}

#[test]
fn truthy_results_are_coerced() {
    let foo = Spy::new("foo");

    // Return the argument itself: truthy arguments match
    when(&foo).is_called_with(args![arg_that(|v: &Value| v.clone())])
        .then_return("truthy");

    assert_eq!(Value::from("truthy"), foo.call(["x"]));
    assert_eq!(Value::Undefined, foo.call([""]));
    assert_eq!(Value::Undefined, foo.call([0]));
}

#[test]
fn missing_argument_is_passed_as_undefined() {
    let foo = Spy::new("foo");

    when(&foo).is_called_with(args![arg_that(|v: &Value| v.is_undefined())])
        .then_return("nothing");

    assert_eq!(Value::from("nothing"), foo.call(values![]));
}

#[test]
fn predicates_crate() {
    let foo = Spy::new("foo");

    when(&foo).is_called_with(args![arg_matching(predicate::eq(Value::from(7)))])
        .then_return("seven");
    when(&foo).is_called_with(args![arg_matching(predicate::never())])
        .then_return("never");

    assert_eq!(Value::from("seven"), foo.call([7]));
    assert_eq!(Value::Undefined, foo.call([8]));
}

#[test]
#[should_panic(expected = "predicate exploded")]
fn predicate_panics_propagate() {
    let foo = Spy::new("foo");

    when(&foo).is_called_with(args![arg_that(|_: &Value| -> bool {
        panic!("predicate exploded")
    })]).then_return(1);

    foo.call([1]);
}

#[test]
fn spy_survives_a_panicking_predicate() {
    let foo = Spy::new("foo");
    when(&foo).is_called_with(args![arg_that(|v: &Value| -> bool {
        if v.as_str() == Some("bad") {
            panic!("bad argument");
        }
        false
    })]).then_return(1);
    when(&foo).is_called_with(args!["good"]).then_return(2);

    let r = panic::catch_unwind(panic::AssertUnwindSafe(|| foo.call(["bad"])));

    assert!(r.is_err());
    assert_eq!(Value::from(2), foo.call(["good"]));
    assert_eq!(2, foo.call_count());
}

#[test]
fn single_threaded_predicates() {
    let foo = Spy::new("foo");
    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();

    when(&foo).is_called_with(args![arg_that_st(move |_: &Value| {
        counter.set(counter.get() + 1);
        true
    })]).then_return("st");

    assert_eq!(Value::from("st"), foo.call([1]));
    assert_eq!(1, seen.get());
}
