mod common;

use common::run;

#[test]
fn for_loop_desugars_correctly() {
    let result = run("for (var i = 0; i < 3; i = i + 1) print i;");
    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_with_no_initializer() {
    let source = r#"
        var i = 0;
        for (; i < 3; i = i + 1) print i;
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_with_no_condition_relies_on_a_break_via_return() {
    let source = r#"
        fun countTo(n) {
            var i = 0;
            for (;;) {
                if (i >= n) return;
                print i;
                i = i + 1;
            }
        }
        countTo(3);
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_with_no_increment() {
    let source = r#"
        var i = 0;
        for (; i < 3;) {
            print i;
            i = i + 1;
        }
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn while_loop_condition_is_coerced_via_truthiness() {
    let source = r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "0\n1\n2\n");
}
