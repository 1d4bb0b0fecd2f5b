//! Statement completion signals.
//!
//! Statements either complete normally or unwind to an enclosing construct:
//! `break` and `continue` to the innermost loop, `return` to the innermost
//! call. Runtime errors travel separately in the `Err` arm of [`ExecResult`].

use crate::errors::EvalError;
use crate::value::Value;

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Normal,
    Break,
    Continue,
    Return(Value),
}

impl Completion {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Completion::Normal)
    }
}

/// Result of executing a statement.
pub type ExecResult = Result<Completion, EvalError>;
