//! RAII-style scope guards for Interpreter environment management.
//!
//! The [`ScopedInterpreter`] guard pops the scope it pushed when dropped, so
//! every exit path out of a block or call (normal completion, `return`,
//! `break`, a runtime error propagated with `?`, or a panic) restores the
//! previous scope.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! allowing transparent access to all interpreter methods.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope};

/// RAII guard that ensures environment scope cleanup on drop.
///
/// # Example
///
/// ```text
/// let mut scoped = interpreter.scoped();
/// scoped.env.define(name, value);
/// let result = scoped.execute_stmts(script, body)?;
/// // Scope automatically popped when `scoped` goes out of scope
/// ```
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a child of the current scope, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Push a child of `parent`, popped when the guard drops.
    ///
    /// Calls use this to run a body in a scope chained to the callee's
    /// closure rather than to the caller's scope.
    pub fn scoped_in(&mut self, parent: LocalScope<Scope>) -> ScopedInterpreter<'_> {
        self.env.push_scope_in(parent);
        ScopedInterpreter { interpreter: self }
    }
}
