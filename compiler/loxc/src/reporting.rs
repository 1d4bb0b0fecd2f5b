//! Diagnostic reporting hook.
//!
//! The session never prints errors itself; it hands them to a [`Reporter`].
//! [`StderrReporter`] renders them for a terminal, [`CollectingReporter`]
//! keeps them for tests and embedding hosts.

use lox_ir::SourcePosition;

/// Receives every failure a run produces.
pub trait Reporter {
    /// A static error found by the resolver, at the offending token.
    fn resolve_error(&mut self, position: SourcePosition, lexeme: &str, message: &str);

    /// The runtime error that aborted a run.
    fn runtime_error(&mut self, position: Option<SourcePosition>, message: &str);
}

/// Writes diagnostics to stderr.
///
/// Static errors render as `[line N] Error at 'x': message`; runtime errors
/// as the message followed by `[line N]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn resolve_error(&mut self, position: SourcePosition, lexeme: &str, message: &str) {
        eprintln!("[{position}] Error at '{lexeme}': {message}");
    }

    fn runtime_error(&mut self, position: Option<SourcePosition>, message: &str) {
        match position {
            Some(position) => eprintln!("{message}\n[{position}]"),
            None => eprintln!("{message}"),
        }
    }
}

/// Which phase produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Resolve,
    Runtime,
}

/// One collected diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reported {
    pub phase: Phase,
    pub position: Option<SourcePosition>,
    /// Offending lexeme, for static errors.
    pub lexeme: Option<String>,
    pub message: String,
}

impl Reported {
    pub fn line(&self) -> Option<u32> {
        self.position.map(|position| position.line)
    }
}

/// Keeps every diagnostic in arrival order.
#[derive(Clone, Debug, Default)]
pub struct CollectingReporter {
    pub reported: Vec<Reported>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages only, in arrival order.
    pub fn messages(&self) -> Vec<&str> {
        self.reported.iter().map(|r| r.message.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn clear(&mut self) {
        self.reported.clear();
    }
}

impl Reporter for CollectingReporter {
    fn resolve_error(&mut self, position: SourcePosition, lexeme: &str, message: &str) {
        self.reported.push(Reported {
            phase: Phase::Resolve,
            position: Some(position),
            lexeme: Some(lexeme.to_owned()),
            message: message.to_owned(),
        });
    }

    fn runtime_error(&mut self, position: Option<SourcePosition>, message: &str) {
        self.reported.push(Reported {
            phase: Phase::Runtime,
            position,
            lexeme: None,
            message: message.to_owned(),
        });
    }
}
