//! Driver error type.

use lox_eval::EvalError;
use lox_resolve::ResolveError;

/// Why a run did not complete.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Static errors; nothing was executed.
    #[error("{} static error(s); program not run", .0.len())]
    Resolve(Vec<ResolveError>),
    /// A runtime error aborted the rest of the program.
    #[error(transparent)]
    Runtime(#[from] EvalError),
}

impl From<Vec<ResolveError>> for RunError {
    fn from(errors: Vec<ResolveError>) -> Self {
        RunError::Resolve(errors)
    }
}
