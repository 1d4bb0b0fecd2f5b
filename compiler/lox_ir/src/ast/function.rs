//! Function declarations, shared by `fun` statements and class methods.

use crate::{Span, StmtRange, Token};

/// A function or method declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: StmtRange,
    pub span: Span,
}

impl FunctionDecl {
    /// Number of declared parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
