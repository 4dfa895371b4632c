mod common;

use common::run;

#[test]
fn this_outside_a_class_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("print this;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn super_outside_a_class_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("print super.foo;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run(
        r#"
        class A {
            method() { super.foo(); }
        }
        "#,
    );
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn shadowing_a_local_with_itself_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("{ var a = 1; var a = 2; }");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn reading_a_local_variable_in_its_own_initializer_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("{ var a = a; }");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn top_level_return_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("return 1;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn returning_a_value_from_init_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("class A { init() { return 1; } }");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn class_inheriting_itself_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("class A < A {}");
    assert!(had_error);
    assert!(!had_runtime_error);
}
