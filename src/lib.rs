use std::io;

mod config;
mod error;
mod eval;
mod interpreter_io;
mod lexer;
mod parser;
pub mod prelude;
mod utils;
use eval::*;
use parser::*;
pub use prelude::*;
use utils::*;

/// What a successful run leaves behind.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// Every variable the script declared, with its final value.
    pub vars: SymbolTable,
    /// Non-fatal problems, in the order they happened.
    pub diagnostics: Vec<Error>,
}

pub struct Interpreter<IO> {
    io: IO,
    config: Config,
}

impl<I, O> Interpreter<Console<I, O>>
where
    I: FnMut(&mut String) -> Result<usize, io::Error>,
    O: FnMut(&str) -> Result<(), io::Error>,
{
    pub fn new(input: I, output: O) -> Self {
        Self::with_io(Console { input, output })
    }
}

impl Default for Interpreter<Stdio> {
    fn default() -> Self {
        Self::with_io(Stdio)
    }
}

impl<IO: InterpreterIO> Interpreter<IO> {
    pub fn with_io(io: IO) -> Self {
        Self {
            io,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn into_io(self) -> IO {
        self.io
    }

    /// Runs a complete script. Markers are checked before anything executes;
    /// after that every line runs once, top to bottom, until the end marker
    /// or the first fatal error.
    pub fn interpret(&mut self, code: &str) -> Result<Outcome, Error> {
        let lines = source_lines(code);
        let body = frame(&lines, &self.config)?;
        tracing::info!(statements = body.len(), "interpreting script");

        let mut ctx = Ctx::new(&self.config, &mut self.io);
        for line in body {
            let statement = parse_statement(line.text).map_err(|kind| Error::new(kind, line))?;
            tracing::debug!(line = line.number, ?statement, "classified");
            ctx.exec(&statement, line)?;
        }

        tracing::info!(
            variables = ctx.vars.len(),
            diagnostics = ctx.diagnostics.len(),
            "script finished"
        );
        Ok(Outcome {
            vars: ctx.vars,
            diagnostics: ctx.diagnostics,
        })
    }
}

/// Runs `code` against the process stdin/stdout with the default config.
pub fn interpret(code: &str) -> Result<Outcome, Error> {
    Interpreter::default().interpret(code)
}

/// Checks the begin/end markers and returns the lines between them.
fn frame<'l, 's>(lines: &'l [SourceLine<'s>], config: &Config) -> Result<&'l [SourceLine<'s>], Error> {
    let mut filled = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_blank());

    let Some((first, begin)) = filled.next() else {
        let line = SourceLine {
            number: 1,
            text: "",
            span: 0..0,
        };
        return Err(Error::new(
            ErrorKind::MalformedScript("script is empty".to_string()),
            &line,
        ));
    };
    if begin.text.trim() != config.begin_marker {
        return Err(Error::new(
            ErrorKind::MalformedScript(format!(
                "source code must start with '{}'",
                config.begin_marker
            )),
            begin,
        ));
    }

    let (last, end) = filled.last().unwrap_or((first, begin));
    if last == first || end.text.trim() != config.end_marker {
        return Err(Error::new(
            ErrorKind::MalformedScript(format!(
                "source code must end with '{}'",
                config.end_marker
            )),
            end,
        ));
    }

    Ok(&lines[first + 1..last])
}
