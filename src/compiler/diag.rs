//! Diagnostics reported by the scanner and the lowering pass.
//!
//! Every condition here is recoverable: the reporting pass emits a
//! diagnostic into a caller-owned sink and keeps going. Fatal errors
//! (unreadable input, unwritable output) are the binary's problem,
//! not the compiler's.

use std::fmt;

/// A 1-based (line, column) location in the source text.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DiagKind {
    /// Closing quote missing before a newline or end of input.
    UnterminatedString,
    /// A byte that starts no recognized token.
    UnexpectedCharacter,
    /// The token after `return` is not an integer or string literal.
    InvalidReturnOperand,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub kind: DiagKind,
    pub pos: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagKind, pos: Position, message: String) -> Self {
        Diagnostic { kind, pos, message }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.pos)
    }
}

/// Destination for diagnostics. The compiler passes never terminate
/// the process; they hand every error to the sink and continue.
pub trait DiagSink {
    fn report(&mut self, diag: Diagnostic);
}

/// Collecting sink, used by tests and available to embedders.
impl DiagSink for Vec<Diagnostic> {
    fn report(&mut self, diag: Diagnostic) {
        self.push(diag);
    }
}

/// Sink that forwards diagnostics to the log facade and counts them.
#[derive(Default)]
pub struct LogSink {
    count: usize,
}

impl LogSink {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl DiagSink for LogSink {
    fn report(&mut self, diag: Diagnostic) {
        self.count += 1;
        error!("{}", diag);
    }
}
