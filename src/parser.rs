use crate::error::{ErrorReporter, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, TokenType};

type ParseResult<T> = Result<T, ParseError>;

/// Returns if the next token is any of the given types.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) ) ||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Parses a token stream into statements with a hand-written recursive
/// descent parser, one production per precedence level.
///
/// - Program     -> Decleration* EOF ;
/// - Block       -> "{" Decleration* "}" ;
/// - Decleration -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" Function* "}" ;
/// - FunDecl     -> "fun" Function ;
/// - VarDecl     -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function    -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement   -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | WhileStmt | Block ;
/// - ExprStmt    -> Expression ";" ;
/// - ForStmt     -> "for" "(" ( Decleration | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt      -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt   -> "print" Expression ";" ;
/// - ReturnStmt  -> "return" Expression? ";" ;
/// - WhileStmt   -> "while" "(" Expression ")" Statement ;
/// - Expression  -> Assignment ;
/// - Assignment  -> ( Call "." )? IDENTIFIER "=" Assignment | LogicOr ;
/// - LogicOr     -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd    -> Equality ( "and" Equality )* ;
/// - Equality    -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison  -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term        -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor      -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary       -> ( "!" | "-" ) Unary | Call ;
/// - Arguments   -> Expression ( "," Expression )* ;
/// - Call        -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this" | "(" Expression ")" | IDENTIFIER | "super" "." IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: u32,
    next_id: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, next_id: 0 }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Parses the whole token stream into statements, reporting every
    /// parse error it encounters and resynchronizing at the next
    /// statement boundary rather than stopping at the first one.
    pub fn parse(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.decleration(reporter, sink) {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current as usize]
    }

    fn previous(&self) -> &Token {
        &self.tokens[(self.current - 1) as usize]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenType::Eof
    }

    fn check(&self, kind: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: TokenType, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn decleration(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> Option<Stmt> {
        let statement = if matches!(self, TokenType::Class) {
            self.class_decleration(reporter, sink)
        } else if matches!(self, TokenType::Fun) {
            self.function("function", reporter, sink)
        } else if matches!(self, TokenType::Var) {
            self.var_decleration(reporter, sink)
        } else {
            self.statement(reporter, sink)
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                reporter.parse_error(sink, &error);
                self.synchronize();
                None
            }
        }
    }

    fn class_decleration(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect class name")?.clone();

        let superclass = if matches!(self, TokenType::Less) {
            self.consume(TokenType::Identifier, "Expect superclass name")?;
            let id = self.next_id();
            Some(Expr::Variable(VariableData { id, name: self.previous().clone() }))
        } else {
            None
        };

        self.consume(TokenType::LeftBrace, "Expect '{' before class body")?;

        let mut methods: Vec<Stmt> = vec![];
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method", reporter, sink)?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after class body")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    fn var_decleration(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect variable name")?.clone();

        let mut initializer: Option<Expr> = None;
        if matches!(self, TokenType::Equal) {
            initializer = Some(self.expression(reporter, sink)?);
        }

        self.consume(TokenType::Semicolon, "Expect ';' after variable decleration")?;
        Ok(Stmt::Var(VarData { name, initializer }))
    }

    fn while_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'")?;
        let condition = self.expression(reporter, sink)?;
        self.consume(TokenType::RightParen, "Expect ')' after condition")?;
        let body = self.statement(reporter, sink)?;

        Ok(Stmt::While(WhileData { condition, body: Box::new(body) }))
    }

    fn expression(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        self.assignment(reporter, sink)
    }

    fn statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        if matches!(self, TokenType::For) {
            return self.for_statement(reporter, sink);
        }

        if matches!(self, TokenType::If) {
            return self.if_statement(reporter, sink);
        }

        if matches!(self, TokenType::Print) {
            return self.print_statement(reporter, sink);
        }

        if matches!(self, TokenType::Return) {
            return self.return_statement(reporter, sink);
        }

        if matches!(self, TokenType::While) {
            return self.while_statement(reporter, sink);
        }

        if matches!(self, TokenType::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block(reporter, sink)? }));
        }

        self.expression_statement(reporter, sink)
    }

    fn for_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'")?;

        let initializer = if matches!(self, TokenType::Semicolon) {
            None
        } else if matches!(self, TokenType::Var) {
            Some(self.var_decleration(reporter, sink)?)
        } else {
            Some(self.expression_statement(reporter, sink)?)
        };

        let condition = if !self.check(TokenType::Semicolon) { Some(self.expression(reporter, sink)?) } else { None };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition")?;

        let increment = if !self.check(TokenType::RightParen) { Some(self.expression(reporter, sink)?) } else { None };
        self.consume(TokenType::RightParen, "Expect ')' after loop clauses")?;

        let mut body = self.statement(reporter, sink)?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'")?;
        let condition = self.expression(reporter, sink)?;
        self.consume(TokenType::RightParen, "Expect ')' after if condition")?;

        let then_branch = Box::new(self.statement(reporter, sink)?);
        let else_branch = if matches!(self, TokenType::Else) {
            Some(Box::new(self.statement(reporter, sink)?))
        } else {
            None
        };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let expr = self.expression(reporter, sink)?;
        self.consume(TokenType::Semicolon, "Expect ';' after value")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if self.check(TokenType::Semicolon) { None } else { Some(self.expression(reporter, sink)?) };

        self.consume(TokenType::Semicolon, "Expect ';' after return value")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn expression_statement(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let expr = self.expression(reporter, sink)?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn function(&mut self, kind: &str, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, &format!("Expect {kind} name"))?.clone();

        self.consume(TokenType::LeftParen, &format!("Expect '(' after {kind} name"))?;

        let mut params = vec![];

        if !self.check(TokenType::RightParen) {
            loop {
                // Reported once, the moment the 256th parameter is about to
                // be parsed, but parsing keeps going per spec: exceeding the
                // cap is a reported error, not an abort.
                if params.len() == 255 {
                    reporter.parse_error(sink, &ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 parameters".to_string(),
                    });
                }

                params.push(self.consume(TokenType::Identifier, "Expect parameter name")?.clone());

                if !matches!(self, TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightParen, "Expect ')' after parameters")?;
        self.consume(TokenType::LeftBrace, &format!("Expect '{{' before {kind} body"))?;

        let body = self.block(reporter, sink)?;

        Ok(Stmt::Function(FunctionData { name, params, body }))
    }

    fn block(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.decleration(reporter, sink) {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block")?;

        Ok(statements)
    }

    fn assignment(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let expr = self.or(reporter, sink)?;

        if matches!(self, TokenType::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment(reporter, sink)?;

            if let Expr::Variable(data) = expr {
                let id = self.next_id();
                return Ok(Expr::Assign(AssignData { id, name: data.name, value: Box::new(value) }));
            } else if let Expr::Get(data) = expr {
                return Ok(Expr::Set(SetData { object: data.object, name: data.name, value: Box::new(value) }));
            }

            return Err(ParseError { token: equals, message: "Invalid assignment target".to_string() });
        }

        Ok(expr)
    }

    fn or(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.and(reporter, sink)?;

        while matches!(self, TokenType::Or) {
            let operator = self.previous().clone();
            let right = self.and(reporter, sink)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.equality(reporter, sink)?;

        while matches!(self, TokenType::And) {
            let operator = self.previous().clone();
            let right = self.equality(reporter, sink)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.comparison(reporter, sink)?;

        while matches!(self, TokenType::BangEqual, TokenType::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison(reporter, sink)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.term(reporter, sink)?;

        while matches!(self, TokenType::Greater, TokenType::GreaterEqual, TokenType::Less, TokenType::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term(reporter, sink)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.factor(reporter, sink)?;

        while matches!(self, TokenType::Minus, TokenType::Plus) {
            let operator = self.previous().clone();
            let right = self.factor(reporter, sink)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.unary(reporter, sink)?;

        while matches!(self, TokenType::Slash, TokenType::Star) {
            let operator = self.previous().clone();
            let right = self.unary(reporter, sink)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        if matches!(self, TokenType::Bang, TokenType::Minus) {
            let operator = self.previous().clone();
            let right = self.unary(reporter, sink)?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call(reporter, sink)
    }

    fn finish_call(&mut self, callee: Expr, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenType::RightParen) {
            loop {
                // Reported once, the moment the 256th argument is about to
                // be parsed, but parsing keeps going per spec: exceeding the
                // cap is a reported error, not an abort.
                if arguments.len() == 255 {
                    reporter.parse_error(sink, &ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 arguments".to_string(),
                    });
                }

                arguments.push(self.expression(reporter, sink)?);

                if !matches!(self, TokenType::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenType::RightParen, "Expect ')' after arguments")?.clone();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        let mut expr = self.primary(reporter, sink)?;

        loop {
            if matches!(self, TokenType::LeftParen) {
                expr = self.finish_call(expr, reporter, sink)?;
            } else if matches!(self, TokenType::Dot) {
                let name = self.consume(TokenType::Identifier, "Expect property name after '.'")?.clone();
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) -> ParseResult<Expr> {
        if matches!(self, TokenType::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }

        if matches!(self, TokenType::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }

        if matches!(self, TokenType::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }

        if matches!(self, TokenType::Number, TokenType::String) {
            return Ok(Expr::Literal(self.previous().literal.clone().expect("number or string to have a literal value")));
        }

        if matches!(self, TokenType::Super) {
            let keyword = self.previous().clone();
            self.consume(TokenType::Dot, "Expect '.' after 'super'")?;
            let method = self.consume(TokenType::Identifier, "Expect superclass method name")?.clone();
            let id = self.next_id();
            return Ok(Expr::Super(SuperData { id, keyword, method }));
        }

        if matches!(self, TokenType::This) {
            let id = self.next_id();
            return Ok(Expr::This(ThisData { id, keyword: self.previous().clone() }));
        }

        if matches!(self, TokenType::Identifier) {
            let id = self.next_id();
            return Ok(Expr::Variable(VariableData { id, name: self.previous().clone() }));
        }

        if matches!(self, TokenType::LeftParen) {
            let expr = self.expression(reporter, sink)?;
            self.consume(TokenType::RightParen, "Expect ')' after expression")?;
            return Ok(Expr::Grouping(GroupingData { expr: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenType::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
