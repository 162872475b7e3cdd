use code_interpreter::prelude::*;

fn main() {
    let code = "BEGIN CODE\nDISPLAY: [Hello World] & $\nEND CODE".to_string();
    let mut interpreter = Interpreter::default();

    if let Err(e) = interpreter.interpret(&code) {
        e.report().eprint(Source::from(&code)).unwrap();
    }
}
