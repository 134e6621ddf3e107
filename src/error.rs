use std::io::{self, Write};

use crate::token::{Token, TokenKind};

/// Shared formatting contract for every diagnostic the pipeline can
/// produce. Unlike the historical implementation this is grounded on,
/// reporting is an explicit write to a caller-supplied sink rather than a
/// side effect on a global "had error" flag — see DESIGN.md.
pub trait Diagnostic {
    fn report(&self, out: &mut dyn Write) -> io::Result<()>;
}

fn at(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// An error found by the scanner (unterminated string, stray byte). There
/// is no token yet at this point, only a line number.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Diagnostic for ScanError {
    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[line {}] Error: {}", self.line, self.message)
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ParseError {
    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[line {}] Error{}: {}", self.token.line, at(&self.token), self.message)
    }
}

#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ResolveError {
    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[line {}] Error{}: {}", self.token.line, at(&self.token), self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for RuntimeError {
    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[line {}] Error{}: {}", self.token.line, at(&self.token), self.message)
    }
}
