use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// A lexical scope frame. Frames chain through `enclosing` up to the global
/// environment; closures hold a reference to whichever frame was active at
/// the point they were defined.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Walks `distance` enclosing links up from `self`. Only ever called
    /// with a distance computed by the resolver, so the chain is known to
    /// be that long.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let parent = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));
        let mut environment = Rc::clone(&parent);

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {i}"));
            environment = Rc::clone(&parent);
        }

        environment
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Value) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.variables.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'", name.lexeme),
        })
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
        if distance > 0 {
            match self.ancestor(distance).borrow().variables.get(&name.lexeme) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined variable '{}'", name.lexeme),
                }),
            }
        } else {
            match self.variables.get(&name.lexeme) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined variable '{}'", name.lexeme),
                }),
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::TokenType;

    fn token(name: &str) -> Token {
        Token::new(TokenType::Identifier, name.to_string(), None, 1)
    }

    #[test]
    fn get_undefined_is_a_runtime_error() {
        let env = Environment::default();
        assert!(env.get(&token("missing")).is_err());
    }

    #[test]
    fn define_then_get_round_trips() {
        let mut env = Environment::default();
        env.define("x", Value::Number(1.0));
        assert_eq!(env.get(&token("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_reaches_through_enclosing_scopes() {
        let global = Rc::new(RefCell::new(Environment::default()));
        global.borrow_mut().define("x", Value::Number(1.0));

        let local = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&global)))));
        local.borrow_mut().assign(&token("x"), Value::Number(2.0)).unwrap();

        assert_eq!(global.borrow().get(&token("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn get_at_distance_zero_is_the_local_frame() {
        let mut local = Environment::default();
        local.define("x", Value::Number(3.0));
        assert_eq!(local.get_at(0, &token("x")).unwrap(), Value::Number(3.0));
    }
}
