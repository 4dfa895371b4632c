mod common;

use common::{run, run_ok};

#[test]
fn negating_a_non_number_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(r#"print -"nope";"#);
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn comparing_non_numbers_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(r#"print "a" < 1;"#);
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn subtracting_non_numbers_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(r#"print "a" - "b";"#);
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn adding_a_number_and_a_string_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(r#"print 1 + "a";"#);
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn adding_two_strings_concatenates() {
    let output = run_ok(r#"print "foo" + "bar";"#);
    assert_eq!(output, "foobar\n");
}

#[test]
fn string_plus_non_string_coerces_the_right_operand_to_its_printable_form() {
    let output = run_ok(
        r#"
        var a = "foo";
        print a + "bar";
        print "count: " + 3;
        print "is it? " + true;
        "#,
    );
    assert_eq!(output, "foobar\ncount: 3\nis it? true\n");
}

#[test]
fn dividing_by_zero_yields_a_number_not_an_error() {
    let output = run_ok("print 1 / 0;");
    assert_eq!(output, "inf\n");
}

#[test]
fn a_global_initializer_referencing_its_own_name_sees_nil() {
    let output = run_ok("var a = a; print a;");
    assert_eq!(output, "nil\n");
}

#[test]
fn the_same_pattern_in_a_local_scope_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("{ var a = a; }");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn equality_never_raises_regardless_of_operand_types() {
    let output = run_ok(
        r#"
        print 1 == "1";
        print nil == false;
        print 1 == 1.0;
        "#,
    );
    assert_eq!(output, "false\nfalse\ntrue\n");
}
