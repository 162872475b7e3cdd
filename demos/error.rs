use code_interpreter::prelude::*;

fn main() {
    let code = "BEGIN CODE\nINT i = 1\ni = 'I am an error!'\nEND CODE".to_string();

    if let Err(e) = code_interpreter::interpret(&code) {
        e.report().eprint(Source::from(&code)).unwrap();
    }
}
