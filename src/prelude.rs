pub use crate::config::{Config, UndeclaredPolicy};
pub use crate::error::{Error, ErrorKind};
pub use crate::eval::{SymbolTable, Variable};
pub use crate::interpreter_io::{BufferedIO, Console, InterpreterIO, Stdio};
pub use crate::parser::{Statement, Value, Variant};
pub use crate::{interpret, Interpreter, Outcome};

pub type Span = std::ops::Range<usize>;
pub use ariadne::Source;
