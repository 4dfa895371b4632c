mod common;

use common::{run, run_ok};

#[test]
fn subclass_inherits_superclass_methods() {
    let output = run_ok(
        r#"
        class Doughnut {
            cook() {
                print "Fry until golden brown.";
            }
        }
        class BostonCream < Doughnut {}
        BostonCream().cook();
        "#,
    );
    assert_eq!(output, "Fry until golden brown.\n");
}

#[test]
fn super_calls_the_superclass_method_even_when_overridden() {
    let output = run_ok(
        r#"
        class Doughnut {
            cook() {
                print "Fry until golden brown.";
            }
        }
        class BostonCream < Doughnut {
            cook() {
                super.cook();
                print "Pipe full of custard and coat with chocolate.";
            }
        }
        BostonCream().cook();
        "#,
    );
    assert_eq!(output, "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n");
}

#[test]
fn super_resolves_relative_to_the_class_where_it_is_written_not_the_receiver() {
    let output = run_ok(
        r#"
        class A {
            method() { print "A method"; }
        }
        class B < A {
            method() { print "B method"; }
            test() { super.method(); }
        }
        class C < B {}
        C().test();
        "#,
    );
    assert_eq!(output, "A method\n");
}

#[test]
fn class_cannot_inherit_from_itself() {
    let (_, had_error, had_runtime_error) = run("class Oops < Oops {}");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn inheriting_from_a_non_class_is_a_runtime_error() {
    let (_, had_error, had_runtime_error) = run(
        r#"
        var NotAClass = "I am not a class";
        class Oops < NotAClass {}
        "#,
    );
    assert!(had_error);
    assert!(had_runtime_error);
}
