use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::token::Token;

/// A class: a name, an optional single superclass, and its own methods.
/// Method lookup walks the superclass chain on miss.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<RefCell<Class>>>, methods: HashMap<String, Function>) -> Self {
        Class { name, superclass, methods }
    }

    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref().and_then(|sup| sup.borrow().find_method(name))
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// `Callable` is implemented on the shared handle rather than on `Class`
/// itself: constructing an instance needs a strong reference back to the
/// class, and the handle is what every `Object::Class` carries.
impl Callable for Rc<RefCell<Class>> {
    fn arity(&self) -> usize {
        self.borrow().find_method("init").map_or(0, |init| init.arity())
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(self))));

        if let Some(initializer) = self.borrow().find_method("init") {
            initializer.bind(Object::from(Rc::clone(&instance))).call(interpreter, arguments)?;
        }

        Ok(Object::from(instance))
    }
}

/// A live object: a strong reference back to its class plus its own field
/// map. Fields shadow methods on read; writes always go to `fields`.
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    pub fn get(self_rc: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self_rc.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let method = self_rc.borrow().class.borrow().find_method(&name.lexeme);
        if let Some(method) = method {
            return Ok(Object::from(method.bind(Object::from(Rc::clone(self_rc)))));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}
