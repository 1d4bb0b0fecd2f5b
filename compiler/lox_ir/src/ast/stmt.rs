//! Statement nodes.

use crate::{ExprId, FunctionId, FunctionRange, Span, StmtId, StmtRange, Token};

/// Statement node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Expression evaluated for its effect
    Expression(ExprId),

    Print(ExprId),

    /// `var name [= initializer];`
    Var {
        name: Token,
        initializer: Option<ExprId>,
    },

    Block(StmtRange),

    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },

    /// The only loop form. `for` desugars to this with `increment` carrying
    /// the loop step, evaluated after each normal or continued iteration.
    While {
        condition: ExprId,
        body: StmtId,
        increment: Option<ExprId>,
    },

    Break(Token),

    Continue(Token),

    Function(FunctionId),

    Class {
        name: Token,
        /// Always a `Variable` expression when present
        superclass: Option<ExprId>,
        methods: FunctionRange,
    },

    Return {
        keyword: Token,
        value: Option<ExprId>,
    },
}
