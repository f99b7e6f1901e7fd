// vim: tw=80
//! Stubbing return values with `when`.

use protomock::*;

fn foo() -> Spy {
    let clazz = ClassDescriptor::new("Clazz").method("foo");
    mock(&clazz, None).unwrap().spy("foo").unwrap()
}

#[test]
fn defines_behavior_based_on_a_matcher() {
    let foo = foo();
    when(&foo).is_called_with(args![5]).then_return("zebra");

    assert_eq!(Value::from("zebra"), foo.call([5]));
}

#[test]
fn installs_multiple_behaviors() {
    let foo = foo();

    when(&foo).is_called_with(args![3]).then_return("dog");
    when(&foo).is_called_with(args![4]).then_return("cat");

    assert_eq!(Value::from("cat"), foo.call([4]));
    assert_eq!(Value::from("dog"), foo.call([3]));
    assert_eq!(Value::Undefined, foo.call([5]));
    assert_eq!(2, foo.stub_count());
}

#[test]
fn multiple_arguments_positive() {
    let foo = foo();

    when(&foo).is_called_with(args!["one", "two"]).then_return("three");

    assert_eq!(Value::from("three"), foo.call(["one", "two"]));
}

#[test]
fn multiple_arguments_negative() {
    let foo = foo();

    when(&foo).is_called_with(args!["one", "two"]).then_return("three");

    assert_eq!(Value::Undefined, foo.call(["one", "three"]));
}

#[test]
fn through_the_instance() {
    let clazz = ClassDescriptor::new("Clazz").method("foo");
    let instance = mock(&clazz, None).unwrap();

    when(&instance.spy("foo").unwrap())
        .is_called_with(args!["one", "two"])
        .then_return("three");

    assert_eq!(Ok(Value::from("three")), instance.call("foo", ["one", "two"]));
    assert_eq!(Ok(Value::Undefined), instance.call("foo", ["one", "three"]));
}

#[test]
fn rewrites_the_return_value_for_the_same_arguments() {
    let foo = foo();

    when(&foo).is_called_with(args!["monkey"]).then_return("apple");
    when(&foo).is_called_with(args!["monkey"]).then_return("pear");

    assert_eq!(Value::from("pear"), foo.call(["monkey"]));
    assert_eq!(2, foo.stub_count());
}

#[test]
fn newest_overlapping_stub_wins() {
    let foo = foo();

    when(&foo).is_called_with(args![arg_that(|_: &Value| true)])
        .then_return("anything");
    when(&foo).is_called_with(args![1]).then_return("one");

    assert_eq!(Value::from("one"), foo.call([1]));
    assert_eq!(Value::from("anything"), foo.call([2]));
}

#[test]
fn fewer_arguments_than_the_pattern() {
    let foo = foo();

    when(&foo).is_called_with(args!["a", "b"]).then_return(1);
    when(&foo).is_called_with(args!["c", Value::Undefined]).then_return(2);

    assert_eq!(Value::Undefined, foo.call(["a"]));
    assert_eq!(Value::from(2), foo.call(["c"]));
}

#[test]
fn extra_arguments_are_ignored() {
    let foo = foo();

    when(&foo).is_called_with(args!["a"]).then_return(1);

    assert_eq!(Value::from(1), foo.call(["a", "b", "c"]));
}

#[test]
fn empty_pattern_matches_any_call() {
    let foo = foo();

    when(&foo).is_called_with(args![]).then_return("always");

    assert_eq!(Value::from("always"), foo.call(values![]));
    assert_eq!(Value::from("always"), foo.call(values![1, 2]));
}

#[test]
fn literals_use_strict_equality() {
    let foo = foo();

    when(&foo).is_called_with(args![1]).then_return("number");
    when(&foo).is_called_with(args![f64::NAN]).then_return("nan");

    assert_eq!(Value::Undefined, foo.call(["1"]));
    assert_eq!(Value::Undefined, foo.call([true]));
    assert_eq!(Value::from("number"), foo.call([1.0]));
    assert_eq!(Value::Undefined, foo.call([f64::NAN]));
}

#[test]
fn objects_match_by_identity() {
    #[derive(Debug)]
    struct Config;

    let foo = foo();
    let config = Object::new(Config);
    when(&foo).is_called_with(args![config.clone()]).then_return("known");

    assert_eq!(Value::from("known"), foo.call([config]));
    assert_eq!(Value::Undefined, foo.call([Object::new(Config)]));
}

#[test]
fn returned_objects_keep_their_identity() {
    let foo = foo();
    let result = Value::object(String::from("payload"));
    when(&foo).is_called_with(args![]).then_return(result.clone());

    let returned = foo.call(values![]);

    assert_eq!(result, returned);
    let s = returned.as_object().unwrap().downcast_ref::<String>().unwrap();
    assert_eq!("payload", s.as_str());
}

#[test]
fn no_stubs_no_calls() {
    let foo = foo();

    assert_eq!(0, foo.stub_count());
    assert_eq!(Value::Undefined, foo.call(values![]));
}

#[test]
fn stubbing_does_not_count_as_a_call() {
    let foo = foo();

    when(&foo).is_called_with(args![1]).then_return(2);

    assert!(!foo.was_called());
    foo.call([1]);
    assert_eq!(foo.calls(), [values![1]]);
}

#[test]
fn custom_fake_replaces_the_dispatcher() {
    let foo = foo();

    when(&foo).is_called_with(args![1]).then_return("stub");
    foo.and_call_fake(|_| Value::from("fake"));

    assert_eq!(Value::from("fake"), foo.call([1]));
}
