//! A tree-walking interpreter for the Lox scripting language: scan, parse,
//! resolve, then evaluate the AST directly against a lexical environment
//! chain.

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use ast::Printer;
use error::Diagnostic;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

const EXIT_USAGE: u8 = 64;
const EXIT_DATA_ERROR: u8 = 65;
const EXIT_SOFTWARE_ERROR: u8 = 70;

/// Top-level driver: owns the interpreter's persistent state (globals,
/// environment) across REPL lines, and reports diagnostics through an
/// injectable sink (real `stderr` outside of tests).
pub struct Lox {
    interpreter: Interpreter,
    err_out: Box<dyn Write>,
    print_ast: bool,
    had_error: bool,
    had_runtime_error: bool,
}

impl Lox {
    pub fn new() -> Self {
        Lox::with_sinks(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Builds a driver whose `print` statements and diagnostics go to the
    /// given sinks instead of real `stdout`/`stderr`. Production code always
    /// wants [`Lox::new`]; this is what lets integration tests assert on
    /// captured output and diagnostics without spawning a subprocess per
    /// case.
    pub fn with_sinks(out: Box<dyn Write>, err_out: Box<dyn Write>) -> Self {
        Lox {
            interpreter: Interpreter::new(out),
            err_out,
            print_ast: false,
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn with_ast_printing(mut self, print_ast: bool) -> Self {
        self.print_ast = print_ast;
        self
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn run_file(&mut self, path: &Path) -> ExitCode {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                let _ = writeln!(self.err_out, "Could not read file '{}': {err}", path.display());
                return ExitCode::from(EXIT_USAGE);
            }
        };

        self.run(&source);

        if self.had_runtime_error {
            ExitCode::from(EXIT_SOFTWARE_ERROR)
        } else if self.had_error {
            ExitCode::from(EXIT_DATA_ERROR)
        } else {
            ExitCode::SUCCESS
        }
    }

    pub fn run_prompt(&mut self) -> ExitCode {
        let mut editor = match rustyline::DefaultEditor::new() {
            Ok(editor) => editor,
            Err(err) => {
                let _ = writeln!(self.err_out, "Could not start line editor: {err}");
                return ExitCode::from(EXIT_SOFTWARE_ERROR);
            }
        };

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.had_error = false;
                    self.had_runtime_error = false;
                    self.run(&line);
                }
                Err(rustyline::error::ReadlineError::Eof)
                | Err(rustyline::error::ReadlineError::Interrupted) => break,
                Err(err) => {
                    let _ = writeln!(self.err_out, "Readline error: {err}");
                    break;
                }
            }
        }

        ExitCode::SUCCESS
    }

    /// Shared scan -> parse -> resolve -> interpret pipeline for both
    /// `run_file` and every REPL line.
    pub fn run(&mut self, source: &str) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        self.report_all(&scan_errors);
        if !scan_errors.is_empty() {
            self.had_error = true;
        }

        let (statements, parse_errors) = Parser::new(tokens).parse();
        self.report_all(&parse_errors);
        if !parse_errors.is_empty() {
            self.had_error = true;
        }

        if self.had_error {
            return;
        }

        let resolve_errors = Resolver::new(&mut self.interpreter).resolve(&statements);
        self.report_all(&resolve_errors);
        if !resolve_errors.is_empty() {
            self.had_error = true;
            return;
        }

        if self.print_ast {
            let mut printer = Printer;
            for statement in &statements {
                let rendered = printer.print_stmt(statement);
                self.interpreter.write_line(&rendered);
            }
            return;
        }

        if let Err(err) = self.interpreter.interpret(&statements) {
            let _ = err.report(&mut self.err_out);
            self.had_runtime_error = true;
        }
    }

    fn report_all<D: Diagnostic>(&mut self, diagnostics: &[D]) {
        for diagnostic in diagnostics {
            let _ = diagnostic.report(&mut self.err_out);
        }
        let _ = self.err_out.flush();
    }
}

impl Default for Lox {
    fn default() -> Self {
        Lox::new()
    }
}
