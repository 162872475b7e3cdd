use ariadne::{Color, Fmt, Label, Report, ReportKind};
use thiserror::Error;

use crate::{parser::Variant, prelude::Span, utils::SourceLine};

/// What went wrong, independent of where.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErrorKind {
    #[error("malformed script: {0}")]
    MalformedScript(String),
    #[error("variable '{0}' already exists")]
    DuplicateDeclaration(String),
    #[error("variable '{0}' does not exist")]
    UndeclaredVariable(String),
    #[error("cannot assign '{found}' to {expected} variable '{name}'")]
    TypeMismatch {
        name: String,
        expected: Variant,
        found: String,
    },
    #[error("'{literal}' is not a valid {variant} literal")]
    InvalidLiteral { variant: Variant, literal: String },
    #[error("malformed declaration: {0}")]
    MalformedDeclaration(String),
    #[error("malformed assignment: {0}")]
    MalformedAssignment(String),
    #[error("malformed scan: {0}")]
    MalformedScan(String),
    #[error("invalid input for '{name}': {reason}")]
    InvalidInput { name: String, reason: String },
    #[error("encountered unknown statement: {0}")]
    UnknownStatement(String),
    #[error("'{0}' is not a variable, '$' or a [bracketed] literal")]
    UnknownDisplayToken(String),
    #[error("console error: {0}")]
    Io(String),
}

impl ErrorKind {
    /// Everything except an unknown display item stops the script.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::UnknownDisplayToken(_))
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::MalformedScript(_) => "script markers are wrong here",
            ErrorKind::DuplicateDeclaration(_) => "declared twice",
            ErrorKind::UndeclaredVariable(_) => "not declared",
            ErrorKind::TypeMismatch { .. } => "wrong type for this variable",
            ErrorKind::InvalidLiteral { .. } => "invalid literal",
            ErrorKind::MalformedDeclaration(_) => "bad declaration",
            ErrorKind::MalformedAssignment(_) => "bad assignment",
            ErrorKind::MalformedScan(_) => "bad scan",
            ErrorKind::InvalidInput { .. } => "input read here",
            ErrorKind::UnknownStatement(_) => "unknown statement",
            ErrorKind::UnknownDisplayToken(_) => "skipped",
            ErrorKind::Io(_) => "console failed here",
        }
    }
}

/// An [`ErrorKind`] pinned to the script line it came from.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct Error {
    pub kind: ErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// The offending line, verbatim.
    pub text: String,
    pub span: Span,
}

impl Error {
    pub fn new(kind: ErrorKind, line: &SourceLine) -> Self {
        Self {
            kind,
            line: line.number,
            text: line.text.to_string(),
            span: line.span.clone(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Renders the error against the script it was raised for.
    pub fn report(&self) -> Report<'static> {
        if self.is_fatal() {
            self.build(ReportKind::Error, Color::Red)
        } else {
            self.build(ReportKind::Warning, Color::Yellow)
        }
    }

    fn build(&self, kind: ReportKind<'static>, color: Color) -> Report<'static> {
        Report::build(kind, (), self.span.start)
            .with_message(self.kind.to_string())
            .with_label(
                Label::new(self.span.clone())
                    .with_message(format!("{}", self.kind.label().fg(color)))
                    .with_color(color),
            )
            .finish()
    }
}
