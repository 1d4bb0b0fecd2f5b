//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use lox_ir::SharedInterner;

use super::{Interpreter, KnownNames};
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::eval_mode::EvalMode;
use crate::natives::NATIVES;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value::Value;

/// User call depth allowed before a run fails with a stack overflow error.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Builder for creating Interpreter instances with various configurations.
///
/// Defaults: `EvalMode::Batch`, stdout printing, and a call depth limit of
/// [`DEFAULT_MAX_CALL_DEPTH`].
pub struct InterpreterBuilder {
    interner: SharedInterner,
    mode: EvalMode,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        Self {
            interner,
            mode: EvalMode::default(),
            print_handler: None,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }

    /// Set the evaluation mode.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set where `print` output goes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set the user call depth limit; `None` leaves only the host stack as
    /// the bound.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Build the interpreter, with natives installed as globals.
    pub fn build(self) -> Interpreter {
        let names = KnownNames::new(&self.interner);

        let mut env = Environment::new();
        for native in NATIVES {
            env.define_global(self.interner.intern(native.name), Value::Native(*native));
        }

        Interpreter {
            names,
            env,
            mode: self.mode,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            call_stack: CallStack::new(self.max_call_depth),
            interner: self.interner,
        }
    }
}
