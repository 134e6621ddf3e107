use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::{EnvRef, Environment};
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;

/// A user-defined function or method, closed over the environment that was
/// live at the point it was declared.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: EnvRef, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Produces a copy of this function whose closure additionally binds
    /// `this` to `instance` one frame inside the original closure. Used
    /// both for `obj.method` lookups and for `super.method` dispatch.
    pub fn bind(&self, instance: Object) -> Function {
        let env = Environment::new(Some(Rc::clone(&self.closure)));
        env.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), env, self.is_initializer)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let env = Environment::new(Some(Rc::clone(&self.closure)));
        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            env.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, env) {
            Ok(()) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "this"))
                } else {
                    Ok(Object::from(crate::literal::Literal::Nil))
                }
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "this"))
                } else {
                    Ok(value)
                }
            }
            Err(Signal::Error(err)) => Err(err),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A builtin implemented in the host language rather than in Lox. Only
/// `clock` exists today; the `Rc<dyn Fn>` indirection leaves room for more
/// without changing the `Callable` contract.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    arity: usize,
    func: Rc<dyn Fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>>,
}

impl NativeFunction {
    pub fn new(
        name: &str,
        arity: usize,
        func: impl Fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError> + 'static,
    ) -> Self {
        NativeFunction { name: name.to_string(), arity, func: Rc::new(func) }
    }

    /// The complete set of natives installed on every interpreter's global
    /// scope at construction time.
    pub fn globals() -> Vec<(String, Object)> {
        vec![(
            "clock".to_string(),
            Object::from(NativeFunction::new("clock", 0, |_, _| {
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock is after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::from(seconds))
            })),
        )]
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.func, &other.func)
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.func)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}
