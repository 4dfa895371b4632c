mod common;

use common::run_ok;

#[test]
fn if_else_picks_the_right_branch() {
    let output = run_ok(
        r#"
        if (1 < 2) { print "yes"; } else { print "no"; }
        if (1 > 2) { print "yes"; } else { print "no"; }
        "#,
    );
    assert_eq!(output, "yes\nno\n");
}

#[test]
fn while_loop_counts_up() {
    let output = run_ok(
        r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
        "#,
    );
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_to_a_while_with_initializer_and_increment() {
    let output = run_ok(
        r#"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
        "#,
    );
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn and_or_short_circuit_and_return_an_operand_not_a_bool() {
    let output = run_ok(
        r#"
        print nil or "default";
        print false and "unreached";
        print "truthy" and "second";
        "#,
    );
    assert_eq!(output, "default\nfalse\nsecond\n");
}
