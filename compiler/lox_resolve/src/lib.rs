//! Static scope resolution for Lox.
//!
//! Runs once over a parsed [`Program`](lox_ir::Program) before execution and
//! produces a [`Resolution`](lox_ir::Resolution): for each variable-like node,
//! how many scopes out its binding lives. Nodes without an entry are globals.
//!
//! The pass also rejects structurally invalid programs (returning from top
//! level, `this` outside a class, reading a local in its own initializer, ...).
//! All such errors are collected; a program with any of them must not run.

mod errors;
mod resolver;

pub use errors::{ResolveError, ResolveErrorKind};
pub use resolver::{resolve_program, Resolver};
