mod common;

use common::run;

#[test]
fn closures_capture_environment_not_variables_by_name() {
    let source = r#"
        var a = "global";
        {
            fun show() { print a; }
            show();
            var a = "local";
            show();
        }
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "global\nglobal\n");
}

#[test]
fn each_call_to_a_factory_gets_its_own_closure() {
    let source = r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                return i;
            }
            return count;
        }
        var a = makeCounter();
        var b = makeCounter();
        print a();
        print a();
        print b();
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "1\n2\n1\n");
}

#[test]
fn recursive_function_terminates() {
    let source = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#;
    let result = run(source);
    assert_eq!(result.stdout, "55\n");
}
