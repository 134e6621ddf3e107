use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rlox_tree::Lox;

#[derive(Clone)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Run {
    pub stdout: String,
    pub stderr: String,
    pub had_error: bool,
    pub had_runtime_error: bool,
}

/// Runs `source` through the full driver pipeline with both output streams
/// captured in memory, the way the teacher's own end-to-end tests assert on
/// program output without spawning a subprocess per case.
pub fn run(source: &str) -> Run {
    let stdout_buf = Rc::new(RefCell::new(Vec::new()));
    let stderr_buf = Rc::new(RefCell::new(Vec::new()));

    let mut lox = Lox::with_sinks(
        Box::new(SharedBuf(Rc::clone(&stdout_buf))),
        Box::new(SharedBuf(Rc::clone(&stderr_buf))),
    );

    lox.run(source);

    Run {
        stdout: String::from_utf8(stdout_buf.borrow().clone()).unwrap(),
        stderr: String::from_utf8(stderr_buf.borrow().clone()).unwrap(),
        had_error: lox.had_error(),
        had_runtime_error: lox.had_runtime_error(),
    }
}
