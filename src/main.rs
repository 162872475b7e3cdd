use std::{env, fs, process::ExitCode};

use code_interpreter::prelude::*;

const USAGE: &str = "usage: code-interpreter <FILE> [--lenient] [--quiet]";

/// Enable with `RUST_LOG=code_interpreter=debug`. Logs go to stderr so they
/// never mix with program output.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<(String, Config), String> {
    let mut config = Config::default();
    let mut path = None;

    for arg in args {
        if let Some(flag) = arg.strip_prefix("--") {
            config = match flag {
                "lenient" => config.with_undeclared(UndeclaredPolicy::Lenient),
                "quiet" => config.with_echo_source(false),
                _ => return Err(format!("unknown flag '{}'", arg)),
            };
        } else if path.replace(arg).is_some() {
            return Err("expected a single file argument".to_string());
        }
    }

    path.map(|path| (path, config))
        .ok_or_else(|| "expected file argument".to_string())
}

fn main() -> ExitCode {
    init_tracing();

    let (path, config) = match parse_args(env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    let code = match fs::read_to_string(&path) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error reading file {}: {}", path, e);
            return ExitCode::from(2);
        }
    };

    if config.echo_source {
        println!("Source Code:-----------------");
        println!("{}", code);
        println!("End of Source Code----------");
    }

    let mut interpreter = Interpreter::default().with_config(config);
    match interpreter.interpret(&code) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!();
            if let Err(io_err) = e.report().eprint(Source::from(&code)) {
                eprintln!("{}: {}", e, io_err);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn flags_map_onto_config() {
        let (path, config) = parse_args(args(&["prog.code", "--lenient", "--quiet"])).unwrap();
        assert_eq!(path, "prog.code");
        assert!(config.is_lenient());
        assert!(!config.echo_source);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["a.code", "b.code"])).is_err());
        assert!(parse_args(args(&["a.code", "--verbose"])).is_err());
    }
}
