//! Tree-walking interpreter for Lox.
//!
//! # Architecture
//!
//! - `exec.rs`: statements, producing a [`Completion`]
//! - `eval.rs`: expressions, producing a [`Value`]
//! - `function_call.rs`: calls to functions, natives and classes
//! - `scope_guard.rs`: RAII scope management
//!
//! Every visit goes through `ensure_sufficient_stack`, so deeply nested
//! programs grow the host stack instead of overflowing it. Runaway recursion
//! in user code is bounded separately by the call stack's depth limit.
//!
//! # Script Threading Pattern
//!
//! Functions carry the [`SharedScript`] they were declared in. A call runs
//! the body against the callee's script, not the caller's: node ids are only
//! meaningful within the arena (and resolution table) that produced them, and
//! in an interactive session a function declared by one input is routinely
//! called from a later one.

mod builder;
mod eval;
mod exec;
mod function_call;
mod scope_guard;

pub use builder::{InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use scope_guard::ScopedInterpreter;

use lox_ir::{Name, SharedInterner, StmtKind, StringInterner};

use crate::control::Completion;
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::errors::{internal_error, EvalError};
use crate::eval_mode::EvalMode;
use crate::print_handler::SharedPrintHandler;
use crate::script::SharedScript;
use crate::value::Value;

/// Names the evaluator compares against on hot paths.
///
/// Interned once at construction so checks are a `u32 == u32`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct KnownNames {
    pub(crate) this: Name,
    pub(crate) super_: Name,
    pub(crate) init: Name,
}

impl KnownNames {
    fn new(interner: &StringInterner) -> Self {
        KnownNames {
            this: interner.intern("this"),
            super_: interner.intern("super"),
            init: interner.intern("init"),
        }
    }
}

/// Tree-walking interpreter.
///
/// Owns the global scope, so state persists across [`Interpreter::interpret`]
/// calls. After a runtime error the interpreter remains usable.
pub struct Interpreter {
    pub(crate) interner: SharedInterner,
    pub(crate) names: KnownNames,
    pub(crate) env: Environment,
    pub(crate) mode: EvalMode,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) call_stack: CallStack,
}

impl Interpreter {
    /// Interpreter with default settings: batch mode, stdout, default depth.
    pub fn new(interner: SharedInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    /// Run a resolved script's top-level statements in order.
    ///
    /// The first runtime error aborts the rest of the script.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = script.program.body().len()))]
    pub fn interpret(&mut self, script: &SharedScript) -> Result<(), EvalError> {
        let result = self.run_top_level(script);
        if let Err(err) = &result {
            tracing::debug!(error = %err, line = ?err.line(), "run aborted");
            // Guards unwind scopes and call frames; anything left is a bug
            debug_assert_eq!(self.env.depth(), 1);
            debug_assert!(self.call_stack.is_empty());
        }
        result
    }

    fn run_top_level(&mut self, script: &SharedScript) -> Result<(), EvalError> {
        let echo = self.mode.echoes_expression_statements();
        for &stmt in script.program.body() {
            if echo {
                if let StmtKind::Expression(expr) = script.program.arena.stmt(stmt).kind {
                    let value = self.evaluate(script, expr)?;
                    self.print_handler.println(&value.to_string());
                    continue;
                }
            }
            match self.execute(script, stmt)? {
                Completion::Normal => {}
                escaped => {
                    tracing::error!(completion = ?escaped, "control signal reached top level");
                    return Err(internal_error(format!(
                        "{escaped:?} escaped to top level"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The interner this interpreter resolves names with.
    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    #[inline]
    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Current user call depth.
    #[inline]
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Value of a global, if bound and initialized.
    pub fn global(&self, name: &str) -> Option<Value> {
        let name = self.interner.intern(name);
        self.env.lookup_global(name).ok()
    }

    /// Bind a global, replacing any earlier binding.
    pub fn define_global(&mut self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.env.define_global(name, value);
    }
}

#[cfg(test)]
mod tests;
