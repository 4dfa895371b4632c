mod common;

use common::run;

#[test]
fn unterminated_string_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("print \"unterminated;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn unexpected_character_is_a_static_error() {
    let (_, had_error, had_runtime_error) = run("var a = 1 @ 2;");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn scanner_keeps_going_past_an_earlier_error_and_still_scans_later_lines() {
    let (_, had_error, had_runtime_error) = run(
        "var a = 1 @ 2;\nvar b = 3;\nprint b;",
    );
    assert!(had_error);
    assert!(!had_runtime_error);
}
