mod common;

use common::run;

#[test]
fn subclass_inherits_superclass_methods() {
    let source = r#"
        class A {
            speak() { print "A"; }
        }
        class B < A {}
        B().speak();
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "A\n");
}

#[test]
fn subclass_overrides_superclass_methods() {
    let source = r#"
        class A {
            speak() { print "A"; }
        }
        class B < A {
            speak() { print "B"; }
        }
        B().speak();
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "B\n");
}

#[test]
fn inheriting_from_a_non_class_is_a_runtime_error() {
    let result = run(r#"
        var NotAClass = 1;
        class B < NotAClass {}
    "#);
    assert!(result.had_runtime_error);
    assert!(result.stderr.contains("Superclass must be a class."));
}

#[test]
fn class_inheriting_itself_is_a_resolve_error() {
    let result = run("class Foo < Foo {}");
    assert!(result.had_error);
    assert!(!result.had_runtime_error);
}
