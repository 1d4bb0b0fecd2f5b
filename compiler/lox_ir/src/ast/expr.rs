//! Expression nodes.

use super::{BinaryOp, LogicalOp, UnaryOp};
use crate::{ExprId, ExprRange, Name, Span, Token};

/// Expression node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Literal values.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(f64),
    /// String literal (interned).
    Str(Name),
}

/// Expression variants.
///
/// Tokens are kept where the evaluator or the resolver may report an error
/// at that node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ExprKind {
    Literal(Literal),

    /// Parenthesized: `(expr)`
    Grouping(ExprId),

    Unary {
        op: UnaryOp,
        operator: Token,
        operand: ExprId,
    },

    Binary {
        op: BinaryOp,
        operator: Token,
        left: ExprId,
        right: ExprId,
    },

    /// `and` / `or`, yielding the deciding operand
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },

    /// `cond ? a : b`
    Ternary {
        condition: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    /// Variable reference
    Variable(Token),

    /// `name = value`
    Assign { name: Token, value: ExprId },

    /// `callee(args)`; `paren` is the closing parenthesis
    Call {
        callee: ExprId,
        paren: Token,
        args: ExprRange,
    },

    /// `object.name`
    Get { object: ExprId, name: Token },

    /// `object.name = value`
    Set {
        object: ExprId,
        name: Token,
        value: ExprId,
    },

    This(Token),

    /// `super.method`
    Super { keyword: Token, method: Token },
}
