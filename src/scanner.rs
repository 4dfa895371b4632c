use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::{ErrorReporter, ScanError};
use crate::literal::Literal;
use crate::token::{Token, TokenType};

/// Converts source text into a token stream. Walks a `PeekMoreIterator`
/// over `source.chars()` so two-character operators and `//` comments can
/// be recognized with one token of lookahead; lexemes are recovered from
/// the original text by char offset via `substring` rather than
/// accumulated character-by-character.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source, reporting lexical errors as encountered
    /// without aborting, and returns the resulting token stream ending in
    /// an `Eof` token.
    pub fn scan_tokens(
        mut self,
        reporter: &mut ErrorReporter,
        sink: &mut dyn std::io::Write,
    ) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(reporter, sink);
        }

        self.tokens.push(Token::new(TokenType::Eof, String::new(), None, self.line));
        self.tokens
    }

    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance past end of source");
        self.current += 1;
        c
    }

    fn peek(&mut self) -> char {
        self.chars.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.chars.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        self.peek_next() == expected
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn lexeme(&self) -> String {
        self.source.substring(self.start, self.current).to_string()
    }

    fn add_token(&mut self, kind: TokenType, literal: Option<Literal>) {
        self.tokens.push(Token::new(kind, self.lexeme(), literal, self.line));
    }

    fn add_single_char_token(&mut self, kind: TokenType) {
        self.advance();
        self.add_token(kind, None);
    }

    fn add_double_char_token(&mut self, kind: TokenType) {
        self.advance();
        self.advance();
        self.add_token(kind, None);
    }

    fn string(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) {
        let start_line = self.line;
        self.advance(); // opening quote

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            reporter.scan_error(sink, &ScanError {
                line: start_line,
                message: "Unterminated string".to_string(),
            });
            return;
        }

        self.advance(); // closing quote

        // Literal excludes the surrounding quotes; the lexeme includes them.
        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token(TokenType::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume the dot
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme().parse().expect("scanned digits to parse as f64");
        self.add_token(TokenType::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let kind = match self.lexeme().as_str() {
            "and" => TokenType::And,
            "class" => TokenType::Class,
            "else" => TokenType::Else,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "fun" => TokenType::Fun,
            "if" => TokenType::If,
            "nil" => TokenType::Nil,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "return" => TokenType::Return,
            "super" => TokenType::Super,
            "this" => TokenType::This,
            "true" => TokenType::True,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            _ => TokenType::Identifier,
        };

        self.add_token(kind, None);
    }

    fn scan_token(&mut self, reporter: &mut ErrorReporter, sink: &mut dyn std::io::Write) {
        let c = self.peek();
        match c {
            '(' => self.add_single_char_token(TokenType::LeftParen),
            ')' => self.add_single_char_token(TokenType::RightParen),
            '{' => self.add_single_char_token(TokenType::LeftBrace),
            '}' => self.add_single_char_token(TokenType::RightBrace),
            ',' => self.add_single_char_token(TokenType::Comma),
            '.' => self.add_single_char_token(TokenType::Dot),
            '-' => self.add_single_char_token(TokenType::Minus),
            '+' => self.add_single_char_token(TokenType::Plus),
            ';' => self.add_single_char_token(TokenType::Semicolon),
            '*' => self.add_single_char_token(TokenType::Star),

            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(TokenType::BangEqual);
                } else {
                    self.add_single_char_token(TokenType::Bang);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(TokenType::EqualEqual);
                } else {
                    self.add_single_char_token(TokenType::Equal);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(TokenType::LessEqual);
                } else {
                    self.add_single_char_token(TokenType::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(TokenType::GreaterEqual);
                } else {
                    self.add_single_char_token(TokenType::Greater);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_single_char_token(TokenType::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }

            '\n' => {
                self.advance();
                self.line += 1;
            }

            '"' => self.string(reporter, sink),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();
                reporter.scan_error(sink, &ScanError {
                    line: self.line,
                    message: format!("Unexpected character '{c}'"),
                });
            }
        }
    }
}
