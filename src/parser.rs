use std::fmt::Display;

use crate::{
    error::ErrorKind,
    lexer::{is_identifier, parse_literal},
    utils::split_top_level,
};

pub const COMMENT: &str = "#";
pub const DISPLAY_KEYWORD: &str = "DISPLAY:";
pub const SCAN_KEYWORD: &str = "SCAN:";
pub const NEXT_LINE_SYMBOL: &str = "$";

/// The primitive kind a variable is declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Integer,
    Float,
    Character,
    Boolean,
}

impl Variant {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "INT" => Some(Variant::Integer),
            "FLOAT" => Some(Variant::Float),
            "CHAR" => Some(Variant::Character),
            "BOOL" => Some(Variant::Boolean),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Variant::Integer => "INT",
            Variant::Float => "FLOAT",
            Variant::Character => "CHAR",
            Variant::Boolean => "BOOL",
        }
    }

    /// Value given to declared variables when no initializer is written.
    pub fn zero(self) -> Value {
        match self {
            Variant::Integer => Value::Int(0),
            Variant::Float => Value::Float(0.0),
            Variant::Character => Value::Char('a'),
            Variant::Boolean => Value::Bool(false),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Char(char),
    Bool(bool),
}

impl Value {
    pub fn variant(&self) -> Variant {
        match self {
            Value::Int(_) => Variant::Integer,
            Value::Float(_) => Variant::Float,
            Value::Char(_) => Variant::Character,
            Value::Bool(_) => Variant::Boolean,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(s) => write!(f, "{}", s),
            Value::Float(s) => {
                let digits = s.to_string();
                if s.is_finite() && !digits.contains('.') {
                    write!(f, "{}.0", digits)
                } else {
                    write!(f, "{}", digits)
                }
            }
            Value::Char(s) => write!(f, "{}", s),
            Value::Bool(s) => write!(f, "{}", s),
        }
    }
}

/// Structural keywords that are recognized but carry no control flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    EndIf,
    EndWhile,
    BeginIf,
    BeginWhile,
    If,
    Else,
    While,
}

impl Marker {
    // longest first so `END IF` is not read as something shorter
    const ALL: [(&'static str, Marker); 7] = [
        ("END WHILE", Marker::EndWhile),
        ("BEGIN WHILE", Marker::BeginWhile),
        ("END IF", Marker::EndIf),
        ("BEGIN IF", Marker::BeginIf),
        ("WHILE", Marker::While),
        ("ELSE", Marker::Else),
        ("IF", Marker::If),
    ];

    pub fn recognize(line: &str) -> Option<Self> {
        Self::ALL.iter().find_map(|(keyword, marker)| {
            let rest = line.strip_prefix(*keyword)?;
            match rest.chars().next() {
                None => Some(*marker),
                Some(c) if c.is_whitespace() || c == '(' => Some(*marker),
                _ => None,
            }
        })
    }

    pub fn keyword(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, marker)| *marker == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or_default()
    }
}

/// One entry of a declaration list, with its initial value already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub value: Value,
}

/// A classified script line.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Blank,
    Comment,
    Declaration {
        variant: Variant,
        entries: Vec<Declarator>,
    },
    /// Raw `&`-separated items; whether an item is a variable is only known
    /// at execution time.
    Display(Vec<String>),
    Scan(Vec<String>),
    BlockMarker(Marker),
    Assignment {
        names: Vec<String>,
        literal: String,
    },
    Unknown(String),
}

/// Classifies a single line. Order matters: comments win over everything,
/// and block markers are checked before assignment so that a condition like
/// `IF (a == 1)` is never taken for one.
pub fn parse_statement(line: &str) -> Result<Statement, ErrorKind> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(Statement::Blank);
    }
    if line.starts_with(COMMENT) {
        return Ok(Statement::Comment);
    }
    if let Some((variant, list)) = type_keyword(line) {
        return declaration(variant, list);
    }
    if let Some(items) = line.strip_prefix(DISPLAY_KEYWORD) {
        return Ok(Statement::Display(
            items.split('&').map(str::to_string).collect(),
        ));
    }
    if let Some(names) = line.strip_prefix(SCAN_KEYWORD) {
        return scan(names);
    }
    if let Some(marker) = Marker::recognize(line) {
        return Ok(Statement::BlockMarker(marker));
    }
    if line.contains('=') {
        return assignment(line);
    }

    Ok(Statement::Unknown(line.to_string()))
}

fn type_keyword(line: &str) -> Option<(Variant, &str)> {
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    Variant::from_keyword(head).map(|variant| (variant, rest))
}

fn declaration(variant: Variant, list: &str) -> Result<Statement, ErrorKind> {
    let list = list.trim();
    if list.is_empty() {
        return Err(ErrorKind::MalformedDeclaration(format!(
            "'{}' must be followed by at least one variable",
            variant
        )));
    }

    let mut parsed = Vec::new();
    for entry in split_top_level(list, ',') {
        let parts = split_top_level(entry, '=');
        let (name, literal) = match parts.as_slice() {
            [name] => (name.trim(), None),
            [name, literal] => (name.trim(), Some(literal.trim())),
            _ => {
                return Err(ErrorKind::MalformedDeclaration(format!(
                    "'{}' has more than one '='",
                    entry.trim()
                )))
            }
        };

        if name.is_empty() {
            return Err(ErrorKind::MalformedDeclaration(
                "missing variable name between separators".to_string(),
            ));
        }
        if !is_identifier(name) {
            return Err(ErrorKind::MalformedDeclaration(format!(
                "'{}' is not a valid variable name",
                name
            )));
        }

        let value = match literal {
            Some("") => {
                return Err(ErrorKind::MalformedDeclaration(format!(
                    "'{}' is missing a value after '='",
                    name
                )))
            }
            Some(literal) => Some(parse_literal(variant, literal).map_err(|_| {
                ErrorKind::InvalidLiteral {
                    variant,
                    literal: literal.to_string(),
                }
            })?),
            None => None,
        };
        parsed.push((name.to_string(), value));
    }

    // the last written initializer is the default for every bare name
    let default = parsed
        .iter()
        .rev()
        .find_map(|(_, value)| *value)
        .unwrap_or_else(|| variant.zero());

    Ok(Statement::Declaration {
        variant,
        entries: parsed
            .into_iter()
            .map(|(name, value)| Declarator {
                name,
                value: value.unwrap_or(default),
            })
            .collect(),
    })
}

fn scan(names: &str) -> Result<Statement, ErrorKind> {
    names
        .split(',')
        .map(|name| {
            let name = name.trim();
            if is_identifier(name) {
                Ok(name.to_string())
            } else if name.is_empty() {
                Err(ErrorKind::MalformedScan(
                    "expected a variable name".to_string(),
                ))
            } else {
                Err(ErrorKind::MalformedScan(format!(
                    "'{}' is not a valid variable name",
                    name
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Statement::Scan)
}

fn assignment(line: &str) -> Result<Statement, ErrorKind> {
    let (targets, literal) = match split_top_level(line, '=').as_slice() {
        [targets, literal] => (*targets, literal.trim()),
        _ => {
            return Err(ErrorKind::MalformedAssignment(
                "only one '=' is allowed per assignment".to_string(),
            ))
        }
    };

    if literal.is_empty() {
        return Err(ErrorKind::MalformedAssignment(
            "missing value after '='".to_string(),
        ));
    }

    let names = targets
        .split(',')
        .map(|name| {
            let name = name.trim();
            if is_identifier(name) {
                Ok(name.to_string())
            } else {
                Err(ErrorKind::MalformedAssignment(format!(
                    "'{}' is not a valid variable name",
                    name
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Statement::Assignment {
        names,
        literal: literal.to_string(),
    })
}
