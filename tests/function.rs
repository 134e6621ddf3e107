mod common;

use common::run;

#[test]
fn function_prints_as_fn_with_its_declared_name() {
    let result = run("fun add(a, b) { return a + b; } print add;");
    assert_eq!(result.stdout, "<fn add>\n");
}

#[test]
fn native_clock_is_callable_with_zero_arguments() {
    let result = run("print clock() >= 0;");
    assert_eq!(result.stdout, "true\n");
    assert!(!result.had_runtime_error);
}

#[test]
fn calling_with_wrong_argument_count_is_a_runtime_error() {
    let result = run("fun add(a, b) { return a + b; } add(1);");
    assert!(result.had_runtime_error);
    assert!(result.stderr.contains("Expected 2 arguments but got 1."));
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let result = run("var x = 1; x();");
    assert!(result.had_runtime_error);
    assert!(result.stderr.contains("Can only call functions and classes."));
}

#[test]
fn functions_are_first_class_values() {
    let source = r#"
        fun identity(x) { return x; }
        fun apply(f, x) { return f(x); }
        print apply(identity, 42);
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "42\n");
}

#[test]
fn argument_evaluation_order_is_left_to_right() {
    let source = r#"
        var log = "";
        fun trace(n) {
            log = log + n;
            return n;
        }
        fun ignore(a, b) {}
        ignore(trace("1"), trace("2"));
        print log;
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "12\n");
}
