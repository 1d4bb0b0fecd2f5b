//! Static resolution errors.

use lox_ir::{SourcePosition, Token};

/// What rule a program broke.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveErrorKind {
    #[error("Can't read local variable in its own initializer.")]
    ReadInOwnInitializer,
    #[error("Can't return from top-level code.")]
    ReturnAtTopLevel,
    #[error("Can't return a value from an initializer.")]
    ReturnValueFromInitializer,
    #[error("Can't use 'this' outside of a class.")]
    ThisOutsideClass,
    #[error("Can't use 'super' outside of a class.")]
    SuperOutsideClass,
    #[error("Can't use 'super' in a class with no superclass.")]
    SuperWithoutSuperclass,
    #[error("A class can't inherit from itself.")]
    InheritFromSelf,
    #[error("Can't use 'break' outside of a loop.")]
    BreakOutsideLoop,
    #[error("Can't use 'continue' outside of a loop.")]
    ContinueOutsideLoop,
}

/// A static error at a specific token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub token: Token,
}

impl ResolveError {
    #[cold]
    pub fn new(kind: ResolveErrorKind, token: Token) -> Self {
        ResolveError { kind, token }
    }

    /// Where the error was detected.
    pub fn position(&self) -> SourcePosition {
        self.token.position()
    }
}
