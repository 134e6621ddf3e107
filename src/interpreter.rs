use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::{EnvRef, Environment};
use crate::error::RuntimeError;
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprId, ExprVisitor, GetData, GroupingData,
    LogicalData, SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt,
    StmtVisitor, VarData, WhileData,
};
use crate::token::{Token, TokenKind};

/// Non-local control flow out of a statement or expression evaluation.
/// `Return` unwinds to the nearest enclosing function call; `Error` unwinds
/// all the way to the driver. Kept distinct from `RuntimeError` itself so a
/// `return` never has to be mistaken for (or reported as) a failure.
pub enum Signal {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

/// Walks the AST produced by the parser, evaluating expressions and
/// executing statements directly rather than compiling to any intermediate
/// form. `locals` is the resolver's output: for every AST node whose
/// binding depth was statically determined, how many scopes out it lives.
pub struct Interpreter {
    pub globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<ExprId, usize>,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(out: Box<dyn Write>) -> Self {
        let globals = Environment::new(None);
        for (name, value) in NativeFunction::globals() {
            globals.borrow_mut().define(&name, value);
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Writes a line to the same sink `print` statements use. Used by the
    /// driver's `--ast` mode so debug output and program output share one
    /// capturable stream instead of one going to real `stdout` regardless.
    pub fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(signal) = self.execute(statement) {
                return match signal {
                    Signal::Error(err) => Err(err),
                    Signal::Return(_) => {
                        unreachable!("resolver rejects `return` outside of a function")
                    }
                };
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        stmt.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], env: EnvRef) -> Result<(), Signal> {
        let previous = std::mem::replace(&mut self.environment, env);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, Signal> {
        expr.accept(self)
    }

    fn lookup_variable(&mut self, id: ExprId, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => Ok(Environment::get_at(&self.environment, distance, &name.lexeme)),
            None => Environment::get(&self.globals, name),
        }
    }

    fn call(&mut self, callee: Object, paren: &Token, arguments: Vec<Object>) -> Result<Object, Signal> {
        let result = match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(native) => native.call(self, arguments),
            Object::Class(class) => class.call(self, arguments),
            _ => {
                return Err(Signal::Error(RuntimeError {
                    token: paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                }))
            }
        };

        Ok(result?)
    }
}

impl ExprVisitor<Result<Object, Signal>> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, Signal> {
        Ok(Object::from(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> Result<Object, Signal> {
        self.evaluate(&grouping.expr)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> Result<Object, Signal> {
        let right = self.evaluate(&unary.expr)?;

        match unary.operator.kind {
            TokenKind::Minus => match right {
                Object::Literal(Literal::Number(n)) => Ok(Object::from(-n)),
                _ => Err(Signal::Error(RuntimeError {
                    token: unary.operator.clone(),
                    message: "Operand must be a number.".to_string(),
                })),
            },
            TokenKind::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!("parser only emits `-` and `!` as unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> Result<Object, Signal> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        let number_error = || {
            Signal::Error(RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be numbers.".to_string(),
            })
        };

        match binary.operator.kind {
            TokenKind::Plus => match (left, right) {
                (Object::Literal(l), Object::Literal(r)) => (l + r).map(Object::from).ok_or_else(|| {
                    Signal::Error(RuntimeError {
                        token: binary.operator.clone(),
                        message: "Operands must be two numbers or two strings.".to_string(),
                    })
                }),
                _ => Err(Signal::Error(RuntimeError {
                    token: binary.operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                })),
            },
            TokenKind::Minus => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l - r)),
            TokenKind::Star => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l * r)),
            TokenKind::Slash => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l / r)),
            TokenKind::Greater => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l > r)),
            TokenKind::GreaterEqual => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l >= r)),
            TokenKind::Less => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l < r)),
            TokenKind::LessEqual => as_numbers(&left, &right).ok_or_else(number_error).map(|(l, r)| Object::from(l <= r)),
            TokenKind::EqualEqual => Ok(Object::from(left == right)),
            TokenKind::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("parser only emits arithmetic/comparison/equality tokens as binary operators"),
        }
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> Result<Object, Signal> {
        let left = self.evaluate(&logical.left)?;

        match logical.operator.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::Or => self.evaluate(&logical.right),
            TokenKind::And if !left.is_truthy() => Ok(left),
            TokenKind::And => self.evaluate(&logical.right),
            _ => unreachable!("parser only emits `and`/`or` as logical operators"),
        }
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> Result<Object, Signal> {
        Ok(self.lookup_variable(variable.id, &variable.name)?)
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> Result<Object, Signal> {
        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.id) {
            Some(&distance) => {
                Environment::assign_at(&self.environment, distance, &assign.name, value.clone());
            }
            None => {
                Environment::assign(&self.globals, &assign.name, value.clone())?;
            }
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, call: &CallData) -> Result<Object, Signal> {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let expected = match &callee {
            Object::Function(f) => Some(f.arity()),
            Object::NativeFunction(f) => Some(f.arity()),
            Object::Class(c) => Some(c.arity()),
            _ => None,
        };

        if let Some(expected) = expected {
            if arguments.len() != expected {
                return Err(Signal::Error(RuntimeError {
                    token: call.paren.clone(),
                    message: format!("Expected {expected} arguments but got {}.", arguments.len()),
                }));
            }
        }

        self.call(callee, &call.paren, arguments)
    }

    fn visit_get_expr(&mut self, get: &GetData) -> Result<Object, Signal> {
        let object = self.evaluate(&get.object)?;

        match object {
            Object::Instance(instance) => Ok(Instance::get(&instance, &get.name)?),
            _ => Err(Signal::Error(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties.".to_string(),
            })),
        }
    }

    fn visit_set_expr(&mut self, set: &SetData) -> Result<Object, Signal> {
        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(Signal::Error(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields.".to_string(),
            }));
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, this: &ThisData) -> Result<Object, Signal> {
        Ok(self.lookup_variable(this.id, &this.keyword)?)
    }

    fn visit_super_expr(&mut self, super_: &SuperData) -> Result<Object, Signal> {
        let distance = *self
            .locals
            .get(&super_.id)
            .expect("resolver always resolves `super` as a local");

        let superclass = Environment::get_at(&self.environment, distance, "super");
        let Object::Class(superclass) = superclass else {
            unreachable!("`super` always resolves to a class object");
        };

        let instance = Environment::get_at(&self.environment, distance - 1, "this");

        let method = superclass.borrow().find_method(&super_.method.lexeme);
        match method {
            Some(method) => Ok(Object::from(method.bind(instance))),
            None => Err(Signal::Error(RuntimeError {
                token: super_.method.clone(),
                message: format!("Undefined property '{}'.", super_.method.lexeme),
            })),
        }
    }
}

fn as_numbers(left: &Object, right: &Object) -> Option<(f64, f64)> {
    match (left, right) {
        (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Some((*l, *r)),
        _ => None,
    }
}

impl StmtVisitor<Result<(), Signal>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<(), Signal> {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<(), Signal> {
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.out, "{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<(), Signal> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<(), Signal> {
        let env = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, env)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<(), Signal> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<(), Signal> {
        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> Result<(), Signal> {
        let function = Function::new(Rc::clone(data), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<(), Signal> {
        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };
        Err(Signal::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<(), Signal> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Object::Class(class) = value else {
                    let token = superclass_token(expr);
                    return Err(Signal::Error(RuntimeError {
                        token,
                        message: "Superclass must be a class.".to_string(),
                    }));
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let method_env = if let Some(superclass) = &superclass {
            let env = Environment::new(Some(Rc::clone(&self.environment)));
            env.borrow_mut().define("super", Object::from(Rc::clone(superclass)));
            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&method_env), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        Environment::assign(&self.environment, &data.name, Object::from(class))?;

        Ok(())
    }
}

fn superclass_token(expr: &Expr) -> Token {
    match expr {
        Expr::Variable(data) => data.name.clone(),
        _ => unreachable!("parser only ever places a Variable expression in ClassData::superclass"),
    }
}

#[cfg(test)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

#[cfg(test)]
impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> String {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        assert!(scan_errors.is_empty(), "{scan_errors:?}");
        let (statements, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "{parse_errors:?}");

        let buffer = Rc::new(RefCell::new(Vec::new()));
        let mut interpreter = Interpreter::new(Box::new(SharedBuf(Rc::clone(&buffer))));

        let resolve_errors = Resolver::new(&mut interpreter).resolve(&statements);
        assert!(resolve_errors.is_empty(), "{resolve_errors:?}");

        interpreter.interpret(&statements).expect("no runtime error");

        String::from_utf8(buffer.borrow().clone()).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run(r#"print "foo" + "bar";"#), "foobar\n");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    print i;
                }
                return count;
            }
            var counter = makeCounter();
            counter();
            counter();
        "#;
        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn classes_and_methods() {
        let source = r#"
            class Greeter {
                init(name) {
                    this.name = name;
                }
                greet() {
                    print "hi " + this.name;
                }
            }
            var g = Greeter("world");
            g.greet();
        "#;
        assert_eq!(run(source), "hi world\n");
    }

    #[test]
    fn inheritance_and_super() {
        let source = r#"
            class A {
                speak() {
                    print "A";
                }
            }
            class B < A {
                speak() {
                    super.speak();
                    print "B";
                }
            }
            B().speak();
        "#;
        assert_eq!(run(source), "A\nB\n");
    }

    #[test]
    fn for_loop_desugars_to_while() {
        let source = r#"
            var total = 0;
            for (var i = 0; i < 5; i = i + 1) {
                total = total + i;
            }
            print total;
        "#;
        assert_eq!(run(source), "10\n");
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let (tokens, _) = Scanner::new("var x = 1; x();").scan_tokens();
        let (statements, _) = Parser::new(tokens).parse();
        let mut interpreter = Interpreter::new(Box::new(Vec::new()));
        Resolver::new(&mut interpreter).resolve(&statements);
        let err = interpreter.interpret(&statements).unwrap_err();
        assert!(err.message.contains("Can only call"));
    }
}
