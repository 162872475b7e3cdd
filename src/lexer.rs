use chumsky::prelude::*;

use crate::{
    parser::{Value, Variant},
    prelude::Span,
};

pub type LexResult<T> = Result<T, Vec<Simple<char>>>;

/// Words a line is classified by. They can never name a variable.
pub const RESERVED: [&str; 9] = [
    "INT", "FLOAT", "CHAR", "BOOL", "IF", "ELSE", "WHILE", "BEGIN", "END",
];

pub fn identifier() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    text::ident()
        .try_map(|ident: String, span: Span| {
            if RESERVED.contains(&ident.as_str()) {
                Err(Simple::custom(span, format!("'{}' is a reserved word", ident)))
            } else {
                Ok(ident)
            }
        })
        .labelled("identifier")
}

fn sign() -> impl Parser<char, Option<char>, Error = Simple<char>> + Clone {
    one_of::<_, _, Simple<char>>("+-").or_not()
}

pub fn int_literal() -> impl Parser<char, i32, Error = Simple<char>> + Clone {
    sign()
        .chain::<char, _, _>(text::digits(10))
        .collect::<String>()
        .try_map(|s: String, span: Span| {
            s.parse::<i32>()
                .map_err(|e| Simple::custom(span, format!("'{}' {}", s, e)))
        })
        .labelled("integer")
}

pub fn float_literal() -> impl Parser<char, f32, Error = Simple<char>> + Clone {
    let digits = filter::<_, _, Simple<char>>(|c: &char| c.is_ascii_digit()).repeated();

    sign()
        .chain::<char, _, _>(digits.clone())
        .chain::<char, _, _>(just('.').chain::<char, _, _>(digits).or_not().flatten())
        .collect::<String>()
        .try_map(|s: String, span: Span| {
            match s.parse::<f32>() {
                Ok(f) if f.is_finite() => Ok(f),
                Ok(_) => Err(Simple::custom(span, format!("'{}' is out of range", s))),
                Err(e) => Err(Simple::custom(span, format!("'{}' {}", s, e))),
            }
        })
        .labelled("float")
}

pub fn char_literal() -> impl Parser<char, char, Error = Simple<char>> + Clone {
    just('\'')
        .ignore_then(filter(|c: &char| *c != '\''))
        .then_ignore(just('\''))
        .labelled("character")
}

fn bool_word() -> impl Parser<char, bool, Error = Simple<char>> + Clone {
    text::ident().try_map(|word: String, span: Span| {
        match word.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Simple::custom(
                span,
                format!("expected 'true' or 'false', found '{}'", word),
            )),
        }
    })
}

/// `true`/`false` in any case, optionally wrapped in double quotes the way
/// CODE programs usually write them (`"TRUE"`).
pub fn bool_literal() -> impl Parser<char, bool, Error = Simple<char>> + Clone {
    bool_word()
        .delimited_by(just('"'), just('"'))
        .or(bool_word())
        .labelled("boolean")
}

pub fn is_identifier(s: &str) -> bool {
    identifier().then_ignore(end()).parse(s).is_ok()
}

/// Parses a literal written in the source as a value of `variant`.
pub fn parse_literal(variant: Variant, literal: &str) -> LexResult<Value> {
    match variant {
        Variant::Integer => int_literal().map(Value::Int).then_ignore(end()).parse(literal),
        Variant::Float => float_literal()
            .map(Value::Float)
            .then_ignore(end())
            .parse(literal),
        Variant::Character => char_literal()
            .map(Value::Char)
            .then_ignore(end())
            .parse(literal),
        Variant::Boolean => bool_literal()
            .map(Value::Bool)
            .then_ignore(end())
            .parse(literal),
    }
}

/// Parses a token typed at a `SCAN:` prompt. Unlike source literals a
/// character may be typed bare (`x`) as well as quoted (`'x'`).
pub fn parse_input(variant: Variant, token: &str) -> LexResult<Value> {
    match variant {
        Variant::Character => char_literal()
            .or(filter(|c: &char| !c.is_whitespace()))
            .map(Value::Char)
            .then_ignore(end())
            .parse(token),
        _ => parse_literal(variant, token),
    }
}

#[test]
fn test_literals() {
    assert_eq!(parse_literal(Variant::Integer, "42"), Ok(Value::Int(42)));
    assert_eq!(parse_literal(Variant::Integer, "-7"), Ok(Value::Int(-7)));
    assert_eq!(parse_literal(Variant::Integer, "+3"), Ok(Value::Int(3)));
    assert!(parse_literal(Variant::Integer, "4.5").is_err());
    assert!(parse_literal(Variant::Integer, "abc").is_err());
    assert!(parse_literal(Variant::Integer, "99999999999").is_err());

    assert_eq!(parse_literal(Variant::Float, "3.5"), Ok(Value::Float(3.5)));
    assert_eq!(parse_literal(Variant::Float, "-2"), Ok(Value::Float(-2.0)));
    assert_eq!(parse_literal(Variant::Float, ".25"), Ok(Value::Float(0.25)));
    assert!(parse_literal(Variant::Float, ".").is_err());
    assert!(parse_literal(Variant::Float, "1.2.3").is_err());
    assert!(parse_literal(Variant::Float, &format!("1{}", "0".repeat(42))).is_err());
    assert_eq!(
        parse_literal(Variant::Float, "100000000000000000000"),
        Ok(Value::Float(1e20))
    );

    assert_eq!(parse_literal(Variant::Character, "'n'"), Ok(Value::Char('n')));
    assert_eq!(parse_literal(Variant::Character, "','"), Ok(Value::Char(',')));
    assert!(parse_literal(Variant::Character, "n").is_err());
    assert!(parse_literal(Variant::Character, "'ab'").is_err());

    assert_eq!(parse_literal(Variant::Boolean, "TRUE"), Ok(Value::Bool(true)));
    assert_eq!(parse_literal(Variant::Boolean, "\"FALSE\""), Ok(Value::Bool(false)));
    assert_eq!(parse_literal(Variant::Boolean, "False"), Ok(Value::Bool(false)));
    assert!(parse_literal(Variant::Boolean, "yes").is_err());
    assert!(parse_literal(Variant::Boolean, "\"TRUE").is_err());
}

#[test]
fn test_scan_tokens() {
    assert_eq!(parse_input(Variant::Character, "x"), Ok(Value::Char('x')));
    assert_eq!(parse_input(Variant::Character, "'x'"), Ok(Value::Char('x')));
    assert!(parse_input(Variant::Character, "xy").is_err());
    assert_eq!(parse_input(Variant::Boolean, "true"), Ok(Value::Bool(true)));
    assert_eq!(parse_input(Variant::Integer, "12"), Ok(Value::Int(12)));
}

#[test]
fn test_identifiers() {
    assert!(is_identifier("a_1"));
    assert!(is_identifier("_tmp"));
    assert!(!is_identifier("1a"));
    assert!(!is_identifier("a b"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("ELSE"));
    assert!(!is_identifier("INT"));
    assert!(is_identifier("Else"));
    assert!(is_identifier("ENDING"));
}
