//! Lox Eval - tree-walking evaluator for Lox.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Environment`: a stack of `LocalScope<Scope>` handles; each scope links to
//!   its lexical parent, so closures keep their defining scope alive
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch
//! - `Completion`: explicit control signals for `break`, `continue` and `return`
//! - `Interpreter`: owns the globals, the print handler and the call stack, and
//!   runs a resolved [`Script`]
//!
//! Scripts are immutable once resolved. Every user function keeps a handle to
//! the script it was declared in, so a function defined by one interactive
//! input can be called from a later one.

mod control;
mod diagnostics;
mod environment;
pub mod errors;
mod eval_mode;
mod function;
pub mod interpreter;
mod natives;
mod operators;
mod print_handler;
mod script;
mod unary_operators;
mod value;

pub use control::{Completion, ExecResult};
pub use diagnostics::{CallFrame, CallStack};
pub use environment::{Environment, LocalScope, LookupError, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use eval_mode::EvalMode;
pub use function::{Class, Instance, NativeFunction, UserFunction};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter, DEFAULT_MAX_CALL_DEPTH};
pub use natives::{clock, NATIVES};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use script::{Script, SharedScript};
pub use unary_operators::evaluate_unary;
pub use value::{Heap, Value};
