use thiserror::Error;

use crate::token::{Token, TokenType};

/// Reported by the scanner: an unexpected character or an unterminated
/// string. Scanning continues after either.
#[derive(Debug, Error)]
#[error("Error: {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

/// Reported by the parser: an unexpected token, a missing terminator, an
/// invalid assignment target, or an argument/parameter overflow.
#[derive(Debug, Error)]
#[error("{}", format_token_error(.token, .message))]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// Reported by the resolver: a duplicate local, a self-referential
/// initializer, an illegal `return`/`this`/`super`, or self-inheritance.
#[derive(Debug, Error)]
#[error("{}", format_token_error(.token, .message))]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

/// Reported by the evaluator: a wrong operand type, an undefined
/// variable/property, a non-callable call, or an arity mismatch.
#[derive(Debug, Error)]
#[error("{}", format_token_error(.token, .message))]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

fn format_token_error(token: &Token, message: &str) -> String {
    if token.kind == TokenType::Eof {
        format!("Error at end: {message}")
    } else {
        format!("Error at '{}': {message}", token.lexeme)
    }
}

/// Owns the `had_error`/`had_runtime_error` flags that used to live as
/// process-wide statics. One instance is threaded down the pipeline per
/// `run` call instead, and errors are written to a caller-supplied sink.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error || self.had_runtime_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn scan_error(&mut self, sink: &mut dyn std::io::Write, err: &ScanError) {
        let _ = writeln!(sink, "[line {}] {err}", err.line);
        self.had_error = true;
    }

    pub fn parse_error(&mut self, sink: &mut dyn std::io::Write, err: &ParseError) {
        let _ = writeln!(sink, "[line {}] {err}", err.token.line);
        self.had_error = true;
    }

    pub fn resolve_error(&mut self, sink: &mut dyn std::io::Write, err: &ResolveError) {
        let _ = writeln!(sink, "[line {}] {err}", err.token.line);
        self.had_error = true;
    }

    pub fn runtime_error(&mut self, sink: &mut dyn std::io::Write, err: &RuntimeError) {
        let _ = writeln!(sink, "[line {}] {err}", err.token.line);
        self.had_runtime_error = true;
    }
}
