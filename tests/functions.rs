mod common;

use common::{run, run_ok};

#[test]
fn recursive_fibonacci() {
    let output = run_ok(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
        "#,
    );
    assert_eq!(output, "55\n");
}

#[test]
fn function_without_return_yields_nil() {
    let output = run_ok(
        r#"
        fun nothing() {}
        print nothing();
        "#,
    );
    assert_eq!(output, "nil\n");
}

#[test]
fn calling_with_wrong_arity_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(
        r#"
        fun one(a) { return a; }
        one(1, 2);
        "#,
    );
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(r#"var x = 1; x();"#);
    assert!(had_error);
    assert!(had_runtime_error);
}

#[test]
fn functions_print_with_their_name() {
    let output = run_ok(
        r#"
        fun add(a, b) { return a + b; }
        print add;
        "#,
    );
    assert_eq!(output, "<fn add>\n");
}

#[test]
fn native_clock_is_callable_with_no_arguments() {
    let output = run_ok("print clock() > 0;");
    assert_eq!(output, "true\n");
}

#[test]
fn two_hundred_fifty_six_arguments_is_a_parse_error() {
    let mut args = Vec::new();
    for i in 0..256 {
        args.push(i.to_string());
    }
    let source = format!("fun many() {{}}\nmany({});", args.join(", "));
    let (_, had_error, had_runtime_error) = run(&source);
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn exactly_two_hundred_fifty_five_arguments_is_accepted() {
    let mut params = Vec::new();
    let mut args = Vec::new();
    for i in 0..255 {
        params.push(format!("p{i}"));
        args.push(i.to_string());
    }
    let source = format!("fun many({}) {{ return p0; }}\nprint many({});", params.join(", "), args.join(", "));
    let output = run_ok(&source);
    assert_eq!(output, "0\n");
}

#[test]
fn exceeding_the_argument_cap_reports_once_and_does_not_abort_the_rest_of_the_program() {
    let mut args = Vec::new();
    for i in 0..256 {
        args.push(i.to_string());
    }
    let source = format!(
        "fun many() {{}}\nmany({});\nprint \"still here\";",
        args.join(", ")
    );
    let (_, had_error, had_runtime_error) = run(&source);
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn exactly_two_hundred_fifty_five_parameters_is_accepted() {
    let mut params = Vec::new();
    for i in 0..255 {
        params.push(format!("p{i}"));
    }
    let source = format!("fun many({}) {{ return p0; }}", params.join(", "));
    let (_, had_error, _) = run(&source);
    assert!(!had_error);
}

#[test]
fn two_hundred_fifty_six_parameters_is_a_parse_error_that_does_not_abort_the_declaration() {
    let mut params = Vec::new();
    for i in 0..256 {
        params.push(format!("p{i}"));
    }
    let source = format!(
        "fun many({}) {{ return p255; }}\nprint \"still here\";",
        params.join(", ")
    );
    let (_, had_error, had_runtime_error) = run(&source);
    assert!(had_error);
    assert!(!had_runtime_error);
}
