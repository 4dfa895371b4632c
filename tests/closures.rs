mod common;

use common::run_ok;

#[test]
fn counter_closure_keeps_its_own_count() {
    let output = run_ok(
        r#"
        fun make_counter() {
            var count = 0;
            fun counter() {
                count = count + 1;
                print count;
            }
            return counter;
        }
        var a = make_counter();
        var b = make_counter();
        a();
        a();
        b();
        "#,
    );
    assert_eq!(output, "1\n2\n1\n");
}

#[test]
fn closure_captures_variable_not_value_at_definition_time() {
    let output = run_ok(
        r#"
        var x = "before";
        fun show() { print x; }
        x = "after";
        show();
        "#,
    );
    assert_eq!(output, "after\n");
}

#[test]
fn each_loop_iteration_of_a_block_scoped_var_gets_its_own_closure() {
    let output = run_ok(
        r#"
        var functions = nil;
        {
            var i = 1;
            fun show() { print i; }
            functions = show;
        }
        functions();
        "#,
    );
    assert_eq!(output, "1\n");
}
