mod common;

use common::run;

#[test]
fn missing_semicolon_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("var a = 1");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn invalid_assignment_target_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("1 + 2 = 3;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn parser_recovers_after_an_error_and_reports_later_ones_too() {
    let (_, had_error, had_runtime_error) = run(
        r#"
        var a = ;
        var b = 1;
        print b;
        "#,
    );
    assert!(had_error);
    assert!(!had_runtime_error);
}
