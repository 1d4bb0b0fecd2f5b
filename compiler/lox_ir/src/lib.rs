//! Lox IR - shared vocabulary for the Lox runtime core.
//!
//! This crate contains the data structures every phase agrees on:
//! - Spans and source positions for diagnostics
//! - Names for interned identifiers
//! - Tokens as handed over by the (external) scanner
//! - The flat syntax tree (`Expr`, `Stmt`, `FunctionDecl`) stored in an arena
//! - The `Resolution` side table produced by the resolver
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, nodes are addressed by `ExprId(u32)`
//! - **Identity by id**: the resolver keys its table on node ids, so the same
//!   identifier at two different positions resolves independently

mod arena;
pub mod ast;
mod builder;
mod expr_id;
mod interner;
mod name;
mod resolution;
mod span;
mod token;

pub use arena::{ExprArena, Program};
pub use ast::{
    BinaryOp, Expr, ExprKind, FunctionDecl, Literal, LogicalOp, Stmt, StmtKind, UnaryOp,
};
pub use builder::AstBuilder;
pub use expr_id::{ExprId, ExprRange, FunctionId, FunctionRange, StmtId, StmtRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use resolution::Resolution;
pub use span::{SourcePosition, Span};
pub use token::{Token, TokenKind};
