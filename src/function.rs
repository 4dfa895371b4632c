use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::{Callable, Value};

/// A user-defined function or method, closed over the environment that was
/// active where it was declared. `is_initializer` marks a class's `init`
/// method, which always returns `this` rather than its own return value.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.body == other.body
    }
}

impl Function {
    pub fn new(name: Token, params: Vec<Token>, body: Vec<Stmt>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { name, params, body, closure, is_initializer }
    }

    /// Produces a copy of this method with `this` bound in a fresh
    /// enclosing scope, so the method body can refer to the instance it
    /// was looked up on.
    pub fn bind(&self, instance: Value) -> Function {
        let environment = Environment::new(Some(Rc::clone(&self.closure)));
        let environment = Rc::new(RefCell::new(environment));
        environment.borrow_mut().define("this", instance);

        Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: self.body.clone(),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }

    fn this_token(&self) -> Token {
        Token::new(TokenType::This, "this".to_string(), None, self.name.line)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let signal = interpreter.execute_block(&self.body, Rc::new(RefCell::new(environment)))?;

        if self.is_initializer {
            return self.closure.borrow().get_at(0, &self.this_token());
        }

        match signal {
            Signal::Return(value) => Ok(value),
            Signal::None => Ok(Value::Nil),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A function implemented in Rust and exposed to the language under a
/// fixed name, such as `clock`.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter<'_>, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.function == other.function
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter<'_>, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The natives bound into every global environment.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: Token::new(TokenType::Identifier, "clock".to_owned(), None, 0),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock to be after the Unix epoch")
                        .as_secs_f64();
                    Ok(Value::Number(now))
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn primitive>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn primitive>")
    }
}
