//! Syntax tree node types.
//!
//! Nodes are plain data stored in an [`ExprArena`](crate::ExprArena); children
//! are referenced by id, never boxed.

mod expr;
mod function;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, Literal};
pub use function::FunctionDecl;
pub use operators::{BinaryOp, LogicalOp, UnaryOp};
pub use stmt::{Stmt, StmtKind};
