use std::cell::RefCell;
use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use log::trace;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{ErrorReporter, RuntimeError};
use crate::expr::{Expr, NodeId};
use crate::function::{Function, NativeFunction};
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::{Callable, Value};

/// What a statement produced, beyond writing to the environment or the
/// output sink. A `Return` propagates up through every enclosing block
/// and loop until a function call catches it; this replaces unwinding
/// through a dedicated exception type.
#[derive(Debug, Clone)]
pub enum Signal {
    None,
    Return(Value),
}

/// Walks the resolved AST and evaluates it. Holds the live environment
/// chain, the side table of scope distances the resolver produced, and
/// the sink that `print` writes to.
pub struct Interpreter<'out> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: &'out mut dyn std::io::Write,
}

impl<'out> Interpreter<'out> {
    pub fn new(output: &'out mut dyn std::io::Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Value::NativeFunction(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    pub fn locals_mut(&mut self) -> &mut HashMap<NodeId, usize> {
        &mut self.locals
    }

    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                reporter.runtime_error(sink, &error);
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        match stmt {
            Stmt::Expression(data) => {
                self.evaluate(&data.expr)?;
                Ok(Signal::None)
            }

            Stmt::Print(data) => {
                let value = self.evaluate(&data.expr)?;
                let _ = writeln!(self.output, "{value}");
                Ok(Signal::None)
            }

            Stmt::Var(data) => {
                // Bind the name to `nil` before evaluating the initializer: the resolver
                // already rejects a local initializer referencing itself, so the only way
                // this binding is observed is a global initializer referencing its own name,
                // which should see `nil` rather than an undefined-variable error.
                self.environment.borrow_mut().define(&data.name.lexeme, Value::Nil);
                if let Some(initializer) = &data.initializer {
                    let value = self.evaluate(initializer)?;
                    self.environment.borrow_mut().define(&data.name.lexeme, value);
                }
                Ok(Signal::None)
            }

            Stmt::Block(data) => {
                let enclosing = Rc::clone(&self.environment);
                let scope = Rc::new(RefCell::new(Environment::new(Some(enclosing))));
                self.execute_block(&data.statements, scope)
            }

            Stmt::If(data) => {
                if self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.then_branch)
                } else if let Some(else_branch) = &data.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Signal::None)
                }
            }

            Stmt::While(data) => {
                while self.evaluate(&data.condition)?.is_truthy() {
                    match self.execute(&data.body)? {
                        Signal::None => continue,
                        signal => return Ok(signal),
                    }
                }
                Ok(Signal::None)
            }

            Stmt::Function(data) => {
                let function = Function::new(
                    data.name.clone(),
                    data.params.clone(),
                    data.body.clone(),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(&data.name.lexeme, Value::Function(function));
                Ok(Signal::None)
            }

            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(value))
            }

            Stmt::Class(data) => self.execute_class(data),
        }
    }

    fn execute_class(&mut self, data: &crate::stmt::ClassData) -> Result<Signal, RuntimeError> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Value::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(variable) = expr else {
                            unreachable!("parser only emits a Variable as a superclass expression")
                        };
                        return Err(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class".to_string(),
                        });
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Value::Nil);

        let previous_environment = superclass.as_ref().map(|superclass| {
            let enclosing = Rc::clone(&self.environment);
            let scope = Rc::new(RefCell::new(Environment::new(Some(enclosing))));
            scope.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
            mem::replace(&mut self.environment, scope)
        });

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function_data) = method else {
                unreachable!("parser only emits Function stmts as class methods")
            };
            let is_initializer = function_data.name.lexeme == "init";
            let function = Function::new(
                function_data.name.clone(),
                function_data.params.clone(),
                function_data.body.clone(),
                Rc::clone(&self.environment),
                is_initializer,
            );
            methods.insert(function_data.name.lexeme.clone(), function);
        }

        if let Some(previous) = previous_environment {
            self.environment = previous;
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&data.name, Value::Class(Rc::new(RefCell::new(class))))?;

        Ok(Signal::None)
    }

    /// Runs `statements` with `environment` as the active scope, restoring
    /// the previous scope on every exit path including an early return or
    /// a propagated error.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<Signal, RuntimeError> {
        let previous = mem::replace(&mut self.environment, environment);

        let mut result = Ok(Signal::None);
        for statement in statements {
            match self.execute(statement) {
                Ok(Signal::None) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(literal_to_value(literal)),

            Expr::Unary(data) => {
                let right = self.evaluate(&data.expr)?;
                match data.operator.kind {
                    TokenType::Minus => (-right).ok_or_else(|| RuntimeError {
                        token: data.operator.clone(),
                        message: "Operand must be a number".to_string(),
                    }),
                    TokenType::Bang => Ok(!right),
                    _ => unreachable!("parser only emits ! and - as unary operators"),
                }
            }

            Expr::Binary(data) => self.evaluate_binary(data),

            Expr::Grouping(data) => self.evaluate(&data.expr),

            Expr::Variable(data) => self.lookup_variable(&data.name, data.id),

            Expr::Assign(data) => {
                let value = self.evaluate(&data.value)?;
                match self.locals.get(&data.id) {
                    Some(distance) => self.environment.borrow_mut().assign_at(*distance, &data.name, value.clone()),
                    None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
                }
                Ok(value)
            }

            Expr::Logical(data) => {
                let left = self.evaluate(&data.left)?;
                match (data.operator.kind, left.is_truthy()) {
                    (TokenType::Or, true) => Ok(left),
                    (TokenType::And, false) => Ok(left),
                    _ => self.evaluate(&data.right),
                }
            }

            Expr::Call(data) => self.evaluate_call(data),

            Expr::Get(data) => {
                let object = self.evaluate(&data.object)?;
                match &object {
                    Value::Instance(instance) => instance.borrow().get(&data.name, &object),
                    _ => Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have properties".to_string(),
                    }),
                }
            }

            Expr::Set(data) => {
                let object = self.evaluate(&data.object)?;
                let Value::Instance(instance) = &object else {
                    return Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have fields".to_string(),
                    });
                };

                let value = self.evaluate(&data.value)?;
                instance.borrow_mut().set(&data.name, value.clone());
                Ok(value)
            }

            Expr::This(data) => self.lookup_variable(&data.keyword, data.id),

            Expr::Super(data) => self.evaluate_super(data),
        }
    }

    fn evaluate_binary(&mut self, data: &crate::expr::BinaryData) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        let numbers_only = || RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers".to_string(),
        };

        match operator.kind {
            TokenType::Greater => left.partial_cmp(&right).map(|o| Value::Bool(o.is_gt())).ok_or_else(numbers_only),
            TokenType::GreaterEqual => left.partial_cmp(&right).map(|o| Value::Bool(o.is_ge())).ok_or_else(numbers_only),
            TokenType::Less => left.partial_cmp(&right).map(|o| Value::Bool(o.is_lt())).ok_or_else(numbers_only),
            TokenType::LessEqual => left.partial_cmp(&right).map(|o| Value::Bool(o.is_le())).ok_or_else(numbers_only),
            TokenType::EqualEqual => Ok(Value::Bool(left == right)),
            TokenType::BangEqual => Ok(Value::Bool(left != right)),
            TokenType::Minus => (left - right).ok_or_else(numbers_only),
            TokenType::Slash => (left / right).ok_or_else(numbers_only),
            TokenType::Star => (left * right).ok_or_else(numbers_only),
            TokenType::Plus => match &left {
                Value::String(l) => Ok(Value::String(format!("{l}{right}"))),
                _ => (left + right).ok_or_else(|| RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings".to_string(),
                }),
            },
            _ => unreachable!("parser only emits comparison/arithmetic operators as binary operators"),
        }
    }

    fn evaluate_call(&mut self, data: &crate::expr::CallData) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Value::Function(f) => f.arity(),
            Value::NativeFunction(f) => f.arity(),
            Value::Class(c) => c.borrow().arity(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "Expect callable".to_string(),
                });
            }
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}", arguments.len()),
            });
        }

        trace!("calling {callee} with {} argument(s)", arguments.len());

        match callee {
            Value::Function(f) => f.call(self, arguments),
            Value::NativeFunction(f) => f.call(self, arguments),
            Value::Class(c) => {
                let class = c.borrow();
                class.call(self, arguments)
            }
            _ => unreachable!("callability already checked above"),
        }
    }

    fn evaluate_super(&mut self, data: &crate::expr::SuperData) -> Result<Value, RuntimeError> {
        let distance = *self.locals.get(&data.id).expect("resolver always binds a distance to a super expression");

        let super_token = Token::new(TokenType::Super, "super".to_string(), None, data.keyword.line);
        let this_token = Token::new(TokenType::This, "this".to_string(), None, data.keyword.line);

        let superclass = self.environment.borrow().get_at(distance, &super_token)?;
        let Value::Class(superclass) = superclass else {
            unreachable!("the resolver only binds 'super' to a class value")
        };

        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.borrow().find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'", data.method.lexeme),
        })?;

        Ok(Value::Function(method.bind(instance)))
    }

    fn lookup_variable(&self, name: &Token, id: NodeId) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

fn literal_to_value(literal: &crate::literal::Literal) -> Value {
    match literal {
        crate::literal::Literal::Nil => Value::Nil,
        crate::literal::Literal::Bool(b) => Value::Bool(*b),
        crate::literal::Literal::Number(n) => Value::Number(*n),
        crate::literal::Literal::String(s) => Value::String(s.clone()),
    }
}
