use std::collections::HashMap;

use crate::{
    config::Config,
    error::{Error, ErrorKind},
    interpreter_io::{InterpreterIO, TokenReader},
    lexer::{parse_input, parse_literal},
    parser::{Declarator, Statement, Value, Variant, NEXT_LINE_SYMBOL},
    utils::{strip_whitespace, SourceLine},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Fixed at declaration; `value` always has this variant.
    pub variant: Variant,
    pub value: Value,
}

/// Flat name -> variable map for one run. Iterates in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    vars: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        if self.index.contains_key(name) {
            return Err(ErrorKind::DuplicateDeclaration(name.to_string()));
        }
        tracing::trace!(name, %value, "declare");

        self.index.insert(name.to_string(), self.vars.len());
        self.vars.push(Variable {
            name: name.to_string(),
            variant: value.variant(),
            value,
        });
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        let var = self
            .index
            .get(name)
            .map(|&i| &mut self.vars[i])
            .ok_or_else(|| ErrorKind::UndeclaredVariable(name.to_string()))?;

        if var.variant != value.variant() {
            return Err(ErrorKind::TypeMismatch {
                name: name.to_string(),
                expected: var.variant,
                found: value.to_string(),
            });
        }
        tracing::trace!(name, %value, "assign");

        var.value = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Value, ErrorKind> {
        self.lookup(name).map(|var| var.value)
    }

    pub fn variant_of(&self, name: &str) -> Result<Variant, ErrorKind> {
        self.lookup(name).map(|var| var.variant)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    fn lookup(&self, name: &str) -> Result<&Variable, ErrorKind> {
        self.index
            .get(name)
            .map(|&i| &self.vars[i])
            .ok_or_else(|| ErrorKind::UndeclaredVariable(name.to_string()))
    }
}

/// Execution state for one run: the symbol table plus the console it
/// borrows for the duration.
pub struct Ctx<'a> {
    pub vars: SymbolTable,
    pub diagnostics: Vec<Error>,
    config: &'a Config,
    io: &'a mut dyn InterpreterIO,
    tokens: TokenReader,
}

impl<'a> Ctx<'a> {
    pub fn new(config: &'a Config, io: &'a mut dyn InterpreterIO) -> Self {
        Self {
            vars: SymbolTable::new(),
            diagnostics: Vec::new(),
            config,
            io,
            tokens: TokenReader::default(),
        }
    }

    pub fn exec(&mut self, statement: &Statement, line: &SourceLine) -> Result<(), Error> {
        match statement {
            Statement::Blank | Statement::Comment => Ok(()),
            Statement::BlockMarker(marker) => {
                tracing::debug!(line = line.number, marker = marker.keyword(), "block marker");
                Ok(())
            }
            Statement::Declaration { entries, .. } => self.declare(entries, line),
            Statement::Display(items) => self.display(items, line),
            Statement::Scan(names) => self.scan(names, line),
            Statement::Assignment { names, literal } => self.assign(names, literal, line),
            Statement::Unknown(text) => Err(Error::new(
                ErrorKind::UnknownStatement(text.clone()),
                line,
            )),
        }
    }

    fn declare(&mut self, entries: &[Declarator], line: &SourceLine) -> Result<(), Error> {
        for entry in entries {
            self.vars
                .declare(&entry.name, entry.value)
                .map_err(|kind| Error::new(kind, line))?;
        }
        Ok(())
    }

    fn display(&mut self, items: &[String], line: &SourceLine) -> Result<(), Error> {
        for item in items {
            let name = strip_whitespace(item);
            let trimmed = item.trim();

            if let Ok(value) = self.vars.get(&name) {
                self.write(&value.to_string(), line)?;
            } else if name == NEXT_LINE_SYMBOL {
                self.write("\n", line)?;
            } else if let Some(text) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                self.write(text, line)?;
            } else {
                self.report(Error::new(
                    ErrorKind::UnknownDisplayToken(trimmed.to_string()),
                    line,
                ));
            }
        }
        Ok(())
    }

    fn scan(&mut self, names: &[String], line: &SourceLine) -> Result<(), Error> {
        for name in names {
            let variant = match self.vars.variant_of(name) {
                Ok(variant) => variant,
                Err(kind) => {
                    self.undeclared(kind, line)?;
                    continue;
                }
            };

            self.write(&format!("Enter value for {}: ", name), line)?;

            let token = self
                .tokens
                .next_token(&mut *self.io)
                .map_err(|e| Error::new(ErrorKind::Io(e.to_string()), line))?
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidInput {
                            name: name.clone(),
                            reason: "input ended before a value was read".to_string(),
                        },
                        line,
                    )
                })?;

            let value = parse_input(variant, &token).map_err(|_| {
                Error::new(
                    ErrorKind::InvalidInput {
                        name: name.clone(),
                        reason: format!("'{}' is not a valid {} value", token, variant),
                    },
                    line,
                )
            })?;

            self.vars
                .assign(name, value)
                .map_err(|kind| Error::new(kind, line))?;
        }
        Ok(())
    }

    /// Every target is checked and parsed before any of them changes.
    fn assign(&mut self, names: &[String], literal: &str, line: &SourceLine) -> Result<(), Error> {
        let mut pending = Vec::with_capacity(names.len());

        for name in names {
            let variant = match self.vars.variant_of(name) {
                Ok(variant) => variant,
                Err(kind) => {
                    self.undeclared(kind, line)?;
                    continue;
                }
            };

            let value = parse_literal(variant, literal).map_err(|_| {
                Error::new(
                    ErrorKind::TypeMismatch {
                        name: name.clone(),
                        expected: variant,
                        found: literal.to_string(),
                    },
                    line,
                )
            })?;
            pending.push((name, value));
        }

        for (name, value) in pending {
            self.vars
                .assign(name, value)
                .map_err(|kind| Error::new(kind, line))?;
        }
        Ok(())
    }

    fn undeclared(&mut self, kind: ErrorKind, line: &SourceLine) -> Result<(), Error> {
        let err = Error::new(kind, line);
        if self.config.is_lenient() {
            self.report(err);
            Ok(())
        } else {
            Err(err)
        }
    }

    fn report(&mut self, err: Error) {
        tracing::warn!(line = err.line, "{}", err.kind);
        self.io.diagnostic(&err);
        self.diagnostics.push(err);
    }

    fn write(&mut self, s: &str, line: &SourceLine) -> Result<(), Error> {
        self.io
            .output(s)
            .map_err(|e| Error::new(ErrorKind::Io(e.to_string()), line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::UndeclaredPolicy, interpreter_io::BufferedIO, parser::parse_statement,
        utils::source_lines,
    };
    use pretty_assertions::assert_eq;

    fn run_lines(ctx: &mut Ctx, code: &str) -> Result<(), Error> {
        for line in source_lines(code) {
            let statement = parse_statement(line.text).map_err(|kind| Error::new(kind, &line))?;
            ctx.exec(&statement, &line)?;
        }
        Ok(())
    }

    #[test]
    fn declare_twice_fails() {
        let mut table = SymbolTable::new();
        table.declare("x", Value::Int(1)).unwrap();
        assert_eq!(
            table.declare("x", Value::Bool(true)),
            Err(ErrorKind::DuplicateDeclaration("x".to_string()))
        );
        assert_eq!(table.get("x"), Ok(Value::Int(1)));
    }

    #[test]
    fn assignment_keeps_the_variant() {
        let mut table = SymbolTable::new();
        table.declare("f", Value::Float(3.5)).unwrap();
        table.assign("f", Value::Float(4.25)).unwrap();
        assert_eq!(table.get("f"), Ok(Value::Float(4.25)));

        assert!(matches!(
            table.assign("f", Value::Int(4)),
            Err(ErrorKind::TypeMismatch { .. })
        ));
        assert_eq!(
            table.assign("g", Value::Int(4)),
            Err(ErrorKind::UndeclaredVariable("g".to_string()))
        );
        assert_eq!(table.variant_of("f"), Ok(Variant::Float));
    }

    #[test]
    fn variables_iterate_in_declaration_order() {
        let mut table = SymbolTable::new();
        for name in ["b", "a", "c"] {
            table.declare(name, Value::Char('z')).unwrap();
        }
        let names: Vec<_> = table.variables().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn failed_assignment_leaves_values_alone() {
        let config = Config::default();
        let mut io = BufferedIO::default();
        let mut ctx = Ctx::new(&config, &mut io);

        let err = run_lines(&mut ctx, "INT x = 1\nCHAR c\nc, x = 'q'").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { ref name, .. } if name == "x"));
        assert_eq!(err.line, 3);
        assert_eq!(ctx.vars.get("x"), Ok(Value::Int(1)));
        assert_eq!(ctx.vars.get("c"), Ok(Value::Char('a')));
    }

    #[test]
    fn display_reports_unknown_items_and_continues() {
        let config = Config::default();
        let mut io = BufferedIO::default();
        {
            let mut ctx = Ctx::new(&config, &mut io);
            run_lines(&mut ctx, "INT x = 5\nDISPLAY: x & $ & nope & [Hello]").unwrap();
            assert_eq!(ctx.diagnostics.len(), 1);
            assert_eq!(
                ctx.diagnostics[0].kind,
                ErrorKind::UnknownDisplayToken("nope".to_string())
            );
        }
        assert_eq!(io.written, "5\nHello");
        assert_eq!(io.diagnostics.len(), 1);
    }

    #[test]
    fn scan_reads_one_token_per_variable() {
        let config = Config::default();
        let mut io = BufferedIO::new("3 x\nfalse\n");
        {
            let mut ctx = Ctx::new(&config, &mut io);
            run_lines(&mut ctx, "INT a\nCHAR b\nBOOL c = true\nSCAN: a, b, c").unwrap();
            assert_eq!(ctx.vars.get("a"), Ok(Value::Int(3)));
            assert_eq!(ctx.vars.get("b"), Ok(Value::Char('x')));
            assert_eq!(ctx.vars.get("c"), Ok(Value::Bool(false)));
        }
        assert_eq!(
            io.written,
            "Enter value for a: Enter value for b: Enter value for c: "
        );
    }

    #[test]
    fn scan_rejects_bad_tokens() {
        let config = Config::default();
        let mut io = BufferedIO::new("abc\n");
        let mut ctx = Ctx::new(&config, &mut io);

        let err = run_lines(&mut ctx, "INT a\nSCAN: a").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidInput { ref name, .. } if name == "a"));

        let err = run_lines(&mut ctx, "SCAN: a").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidInput { .. }));
    }

    #[test]
    fn lenient_policy_skips_undeclared_names() {
        let config = Config::default().with_undeclared(UndeclaredPolicy::Lenient);
        let mut io = BufferedIO::default();
        let mut ctx = Ctx::new(&config, &mut io);

        run_lines(&mut ctx, "INT x\nx, y = 7\nSCAN: z").unwrap();
        assert_eq!(ctx.vars.get("x"), Ok(Value::Int(7)));
        assert_eq!(ctx.diagnostics.len(), 2);
        assert!(!ctx.vars.contains("y"));
    }

    #[test]
    fn strict_policy_rejects_undeclared_names() {
        let config = Config::default();
        let mut io = BufferedIO::default();
        let mut ctx = Ctx::new(&config, &mut io);

        let err = run_lines(&mut ctx, "y = 7").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("y".to_string()));
    }
}
