use std::io::{self, Write};

use code_interpreter::prelude::*;

fn main() {
    let code = "BEGIN CODE
INT age
CHAR grade
SCAN: age, grade
DISPLAY: [age: ] & age & $ & [grade: ] & grade & $
END CODE"
        .to_string();

    let input = |s: &mut String| -> Result<usize, io::Error> { io::stdin().read_line(s) };

    let output = |s: &str| -> Result<(), io::Error> {
        let mut stdout = io::stdout();
        stdout.write_all(s.as_bytes())?;
        stdout.flush()
    };

    let mut interpreter = Interpreter::new(input, output);

    match interpreter.interpret(&code) {
        Ok(outcome) => {
            for var in outcome.vars.variables() {
                println!("{} ({}) = {}", var.name, var.variant, var.value);
            }
        }
        Err(e) => e.report().eprint(Source::from(&code)).unwrap(),
    }
}
