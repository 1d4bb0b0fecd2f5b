//! Sessions: one interpreter, many programs.

use lox_eval::{
    EvalMode, Interpreter, InterpreterBuilder, Script, SharedPrintHandler, SharedScript,
    DEFAULT_MAX_CALL_DEPTH,
};
use lox_ir::{Program, SharedInterner};
use lox_resolve::resolve_program;

use crate::errors::RunError;
use crate::reporting::Reporter;

/// How a session is set up.
#[derive(Clone)]
pub struct SessionConfig {
    pub mode: EvalMode,
    /// User call depth limit; `None` for unbounded.
    pub max_call_depth: Option<usize>,
    /// Where `print` writes; stdout when `None`.
    pub print_handler: Option<SharedPrintHandler>,
}

impl SessionConfig {
    /// Settings for a read-eval-print loop.
    pub fn interactive() -> Self {
        SessionConfig {
            mode: EvalMode::Interactive,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: EvalMode::Batch,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            print_handler: None,
        }
    }
}

/// Result of [`Session::resolve_and_run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Static errors were reported; nothing ran.
    ResolveFailed,
    /// A runtime error was reported; later statements did not run.
    RuntimeFailed,
}

impl RunOutcome {
    #[inline]
    pub fn is_success(self) -> bool {
        self == RunOutcome::Completed
    }

    /// Conventional process exit status (sysexits `EX_DATAERR` and
    /// `EX_SOFTWARE` for the two failure kinds).
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::ResolveFailed => 65,
            RunOutcome::RuntimeFailed => 70,
        }
    }
}

/// Resolves and runs programs against one persistent interpreter.
///
/// Programs must be built with the session's interner.
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    /// Batch session with default settings.
    pub fn new(interner: SharedInterner) -> Self {
        Self::with_config(interner, SessionConfig::default())
    }

    /// Session that echoes top-level expression statements.
    pub fn interactive(interner: SharedInterner) -> Self {
        Self::with_config(interner, SessionConfig::interactive())
    }

    pub fn with_config(interner: SharedInterner, config: SessionConfig) -> Self {
        let mut builder = InterpreterBuilder::new(interner)
            .mode(config.mode)
            .max_call_depth(config.max_call_depth);
        if let Some(handler) = config.print_handler {
            builder = builder.print_handler(handler);
        }
        Session {
            interpreter: builder.build(),
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        self.interpreter.interner()
    }

    #[inline]
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    #[inline]
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Resolve `program` and run it if resolution found no errors.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: Program) -> Result<(), RunError> {
        let resolution = resolve_program(&program, self.interpreter.interner())?;
        let script = SharedScript::new(Script::new(program, resolution));
        self.interpreter.interpret(&script)?;
        Ok(())
    }

    /// [`Session::run`], with failures handed to `reporter`.
    pub fn resolve_and_run(&mut self, program: Program, reporter: &mut dyn Reporter) -> RunOutcome {
        match self.run(program) {
            Ok(()) => RunOutcome::Completed,
            Err(RunError::Resolve(errors)) => {
                let interner = self.interpreter.interner();
                for error in &errors {
                    let lexeme = interner.lookup(error.token.lexeme);
                    reporter.resolve_error(error.position(), lexeme, &error.to_string());
                }
                RunOutcome::ResolveFailed
            }
            Err(RunError::Runtime(error)) => {
                reporter.runtime_error(error.position(), &error.message);
                RunOutcome::RuntimeFailed
            }
        }
    }
}
