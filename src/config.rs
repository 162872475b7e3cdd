//! Interpreter configuration.
//!
//! Holds the script framing markers and how strictly undeclared names are
//! treated. Enforcement happens in the executor.

/// What to do when a statement names a variable that was never declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndeclaredPolicy {
    /// Abort the script with `UndeclaredVariable`.
    #[default]
    Strict,
    /// Report the name as a diagnostic and skip it.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// First non-empty line of every script.
    pub begin_marker: String,

    /// Last non-empty line of every script.
    pub end_marker: String,

    pub undeclared: UndeclaredPolicy,

    /// Print the loaded source before running it (CLI only).
    pub echo_source: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            begin_marker: "BEGIN CODE".to_string(),
            end_marker: "END CODE".to_string(),
            undeclared: UndeclaredPolicy::Strict,
            echo_source: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markers(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin_marker = begin.into();
        self.end_marker = end.into();
        self
    }

    pub fn with_undeclared(mut self, policy: UndeclaredPolicy) -> Self {
        self.undeclared = policy;
        self
    }

    pub fn with_echo_source(mut self, echo: bool) -> Self {
        self.echo_source = echo;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.undeclared == UndeclaredPolicy::Lenient
    }
}
