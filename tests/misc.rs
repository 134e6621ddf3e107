mod common;

use common::run;

#[test]
fn arithmetic_precedence() {
    let result = run("print 1 + 2 * 3 / 4;");
    assert_eq!(result.stdout, "2.5\n");
    assert!(!result.had_error);
}

#[test]
fn runtime_type_error_produces_no_stdout_and_exits_with_diagnostic() {
    let result = run(r#"print "x" - 1;"#);
    assert_eq!(result.stdout, "");
    assert!(result.stderr.contains("Operands must be numbers."));
    assert!(result.had_runtime_error);
}

#[test]
fn short_circuit_or_returns_the_operand_not_a_boolean() {
    let result = run(r#"print "left" or "right";"#);
    assert_eq!(result.stdout, "left\n");
}

#[test]
fn short_circuit_and_skips_the_right_operand_when_left_is_falsy() {
    let result = run("print false and (1/0);");
    assert_eq!(result.stdout, "false\n");
    assert!(!result.had_runtime_error);
}

#[test]
fn unterminated_string_is_reported_and_execution_does_not_run() {
    let result = run("\"unterminated");
    assert!(result.had_error);
    assert!(result.stderr.contains("Unterminated string."));
}

#[test]
fn global_redefinition_is_allowed() {
    let result = run("var a = 1; var a = 2; print a;");
    assert_eq!(result.stdout, "2\n");
    assert!(!result.had_error);
}
