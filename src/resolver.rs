use std::collections::HashMap;
use std::mem;

use crate::error::{ErrorReporter, ResolveError};
use crate::expr::{Expr, NodeId};
use crate::stmt::Stmt;
use crate::token::Token;

#[derive(PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Walks the AST once before evaluation to bind every `Variable`/`Assign`/
/// `This`/`Super` node to the number of scopes between its use and its
/// declaration. That distance is recorded in `locals`, keyed by the node's
/// `NodeId`, and consulted by the interpreter instead of searching the
/// environment chain at every lookup.
pub struct Resolver<'a> {
    locals: &'a mut HashMap<NodeId, usize>,
    reporter: &'a mut ErrorReporter,
    sink: &'a mut dyn std::io::Write,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(
        locals: &'a mut HashMap<NodeId, usize>,
        reporter: &'a mut ErrorReporter,
        sink: &'a mut dyn std::io::Write,
    ) -> Self {
        Resolver {
            locals,
            reporter,
            sink,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn error(&mut self, token: &Token, message: &str) {
        let error = ResolveError { token: token.clone(), message: message.to_string() };
        self.reporter.resolve_error(self.sink, &error);
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        let already_declared = scope.contains_key(&name.lexeme);
        scope.insert(name.lexeme.clone(), false);

        if already_declared {
            self.error(name, "Already a variable with this name in this scope");
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: NodeId, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, i);
                return;
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Variable(data) => {
                if let Some(scope) = self.scopes.last() {
                    if let Some(false) = scope.get(&data.name.lexeme) {
                        self.error(&data.name, "Can't read local variable in its own initializer");
                    }
                }
                self.resolve_local(data.id, &data.name);
            }

            Expr::Assign(data) => {
                self.resolve_expr(&data.value);
                self.resolve_local(data.id, &data.name);
            }

            Expr::Logical(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }

            Expr::Unary(data) => self.resolve_expr(&data.expr),

            Expr::Binary(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }

            Expr::Grouping(data) => self.resolve_expr(&data.expr),

            Expr::Call(data) => {
                self.resolve_expr(&data.callee);
                for argument in &data.arguments {
                    self.resolve_expr(argument);
                }
            }

            Expr::Get(data) => self.resolve_expr(&data.object),

            Expr::Set(data) => {
                self.resolve_expr(&data.value);
                self.resolve_expr(&data.object);
            }

            Expr::This(data) => {
                if self.current_class == ClassType::None {
                    self.error(&data.keyword, "Can't use 'this' outside of a class");
                    return;
                }
                self.resolve_local(data.id, &data.keyword);
            }

            Expr::Super(data) => {
                match self.current_class {
                    ClassType::Subclass => {}
                    ClassType::None => self.error(&data.keyword, "Can't use 'super' outside of a class"),
                    ClassType::Class => self.error(&data.keyword, "Can't use 'super' in a class with no superclass"),
                }
                self.resolve_local(data.id, &data.keyword);
            }
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(data) => {
                self.begin_scope();
                self.resolve(&data.statements);
                self.end_scope();
            }

            Stmt::Var(data) => {
                self.declare(&data.name);
                if let Some(initializer) = &data.initializer {
                    self.resolve_expr(initializer);
                }
                self.define(&data.name);
            }

            Stmt::Function(data) => {
                self.declare(&data.name);
                self.define(&data.name);
                self.resolve_function(&data.params, &data.body, FunctionType::Function);
            }

            Stmt::Expression(data) => self.resolve_expr(&data.expr),

            Stmt::If(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.then_branch);
                if let Some(else_branch) = &data.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::Print(data) => self.resolve_expr(&data.expr),

            Stmt::Return(data) => {
                if self.current_function == FunctionType::None {
                    self.error(&data.keyword, "Can't return from top-level code");
                }

                if let Some(value) = &data.value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(&data.keyword, "Can't return from initializer");
                    } else {
                        self.resolve_expr(value);
                    }
                }
            }

            Stmt::While(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.body);
            }

            Stmt::Class(data) => {
                let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

                self.declare(&data.name);
                self.define(&data.name);

                if let Some(superclass) = &data.superclass {
                    let Expr::Variable(variable) = superclass else { unreachable!("parser only emits a Variable as a superclass expression") };

                    if data.name.lexeme == variable.name.lexeme {
                        self.error(&variable.name, "A class can't inherit from itself");
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expr(superclass);

                    self.begin_scope();
                    self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
                }

                self.begin_scope();
                self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

                for method in &data.methods {
                    let Stmt::Function(function) = method else { unreachable!("parser only emits Function stmts as class methods") };
                    let kind = if function.name.lexeme == "init" {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };
                    self.resolve_function(&function.params, &function.body, kind);
                }

                self.end_scope();

                if data.superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }
}
