use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// Environments are shared (closures alias them), so every live reference
/// to one is an `Rc<RefCell<Environment>>`.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A single lexical scope: a name→value map plus a link to the enclosing
/// scope. Blocks, calls, and the synthetic `this`/`super` bindings each
/// introduce one of these.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<EnvRef>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Environment { enclosing, values: HashMap::new() }))
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let parent = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver guarantees an ancestor exists at this distance");
            current = parent;
        }
        current
    }

    pub fn get(env: &EnvRef, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = env.borrow().values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &env.borrow().enclosing {
            return Environment::get(enclosing, name);
        }

        Err(undefined(name))
    }

    pub fn assign(env: &EnvRef, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if env.borrow().values.contains_key(&name.lexeme) {
            env.borrow_mut().values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        let enclosing = env.borrow().enclosing.clone();
        if let Some(enclosing) = enclosing {
            return Environment::assign(&enclosing, name, value);
        }

        Err(undefined(name))
    }

    pub fn get_at(env: &EnvRef, distance: usize, name: &str) -> Object {
        Environment::ancestor(env, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .expect("resolver guarantees the binding exists at this distance")
    }

    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Object) {
        Environment::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError {
        token: name.clone(),
        message: format!("Undefined variable '{}'.", name.lexeme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn token(lexeme: &str) -> Token {
        Token::new(TokenKind::Identifier, lexeme.to_string(), None, 1)
    }

    #[test]
    fn define_then_get() {
        let env = Environment::new(None);
        env.borrow_mut().define("a", Object::from(1.0));
        assert_eq!(Environment::get(&env, &token("a")), Ok(Object::from(1.0)));
    }

    #[test]
    fn get_falls_back_to_enclosing() {
        let global = Environment::new(None);
        global.borrow_mut().define("a", Object::from(1.0));
        let local = Environment::new(Some(Rc::clone(&global)));
        assert_eq!(Environment::get(&local, &token("a")), Ok(Object::from(1.0)));
    }

    #[test]
    fn get_undefined_is_a_runtime_error() {
        let env = Environment::new(None);
        assert!(Environment::get(&env, &token("missing")).is_err());
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let env = Environment::new(None);
        assert!(Environment::assign(&env, &token("missing"), Object::from(1.0)).is_err());
    }

    #[test]
    fn assign_at_writes_through_ancestor_chain() {
        let global = Environment::new(None);
        global.borrow_mut().define("a", Object::from(1.0));
        let local = Environment::new(Some(Rc::clone(&global)));

        Environment::assign_at(&local, 1, &token("a"), Object::from(2.0));
        assert_eq!(Environment::get_at(&global, 0, "a"), Object::from(2.0));
    }
}
