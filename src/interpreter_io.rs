use std::{
    collections::VecDeque,
    io::{self, Write},
};

use crate::error::Error;

/// The console an interpreter run talks to.
///
/// The default methods use the process stdio; implementors override what
/// they need to capture.
pub trait InterpreterIO {
    /// Writes `s` as is, with no added framing.
    fn output(&mut self, s: &str) -> Result<(), io::Error> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(s.as_bytes())?;
        stdout.flush()
    }

    /// Appends one line of input to `s`, returning the bytes read (0 at end of input).
    fn input(&mut self, s: &mut String) -> Result<usize, io::Error> {
        io::stdin().read_line(s)
    }

    /// Receives problems that do not stop the script.
    fn diagnostic(&mut self, err: &Error) {
        eprintln!("Error: {}", err);
    }
}

/// Process stdin/stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stdio;

impl InterpreterIO for Stdio {}

/// Console built from a pair of closures.
#[derive(Clone)]
pub struct Console<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> InterpreterIO for Console<I, O>
where
    I: FnMut(&mut String) -> Result<usize, io::Error>,
    O: FnMut(&str) -> Result<(), io::Error>,
{
    fn output(&mut self, s: &str) -> Result<(), io::Error> {
        (self.output)(s)
    }

    fn input(&mut self, s: &mut String) -> Result<usize, io::Error> {
        (self.input)(s)
    }
}

/// In-memory console: input is fed from a string, output and diagnostics
/// are captured for inspection.
#[derive(Clone, Debug, Default)]
pub struct BufferedIO {
    lines: VecDeque<String>,
    pub written: String,
    pub diagnostics: Vec<String>,
}

impl BufferedIO {
    pub fn new(input: &str) -> Self {
        Self {
            lines: input.split_inclusive('\n').map(str::to_string).collect(),
            ..Self::default()
        }
    }
}

impl InterpreterIO for BufferedIO {
    fn output(&mut self, s: &str) -> Result<(), io::Error> {
        self.written.push_str(s);
        Ok(())
    }

    fn input(&mut self, s: &mut String) -> Result<usize, io::Error> {
        match self.lines.pop_front() {
            Some(line) => {
                s.push_str(&line);
                Ok(line.len())
            }
            None => Ok(0),
        }
    }

    fn diagnostic(&mut self, err: &Error) {
        self.diagnostics.push(err.to_string());
    }
}

/// Splits console input into whitespace-delimited tokens, pulling more
/// lines only when the buffered ones run out.
#[derive(Debug, Default)]
pub struct TokenReader {
    pending: VecDeque<String>,
}

impl TokenReader {
    pub fn next_token(&mut self, io: &mut dyn InterpreterIO) -> Result<Option<String>, io::Error> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            if io.input(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}
