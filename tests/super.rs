mod common;

use common::run;

#[test]
fn super_calls_the_immediate_superclass_method() {
    let source = r#"
        class A {
            speak() { print "A"; }
        }
        class B < A {
            speak() {
                super.speak();
                print "B";
            }
        }
        B().speak();
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "A\nB\n");
}

#[test]
fn super_resolves_through_a_three_level_chain() {
    let source = r#"
        class A {
            speak() { print "A"; }
        }
        class B < A {
            speak() { super.speak(); print "B"; }
        }
        class C < B {
            speak() { super.speak(); print "C"; }
        }
        C().speak();
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "A\nB\nC\n");
}

#[test]
fn super_without_a_superclass_is_a_resolve_error() {
    let result = run(r#"
        class A {
            speak() { super.speak(); }
        }
    "#);
    assert!(result.had_error);
    assert!(!result.had_runtime_error);
}

#[test]
fn super_outside_any_class_is_a_resolve_error() {
    let result = run("print super.speak();");
    assert!(result.had_error);
}
