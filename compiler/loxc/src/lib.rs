//! Loxc - driver for the Lox runtime core.
//!
//! A front end hands over a parsed [`Program`](lox_ir::Program) built with the
//! session's interner. The session resolves it, runs it if resolution
//! succeeded, and reports failures through a [`Reporter`]:
//!
//! ```text
//! let mut session = Session::new(interner.clone());
//! let outcome = session.resolve_and_run(program, &mut StderrReporter);
//! std::process::exit(outcome.exit_code());
//! ```
//!
//! State persists across runs of one session, which is what an interactive
//! prompt needs: each input is a separate program, and globals (including
//! functions and classes) declared by earlier inputs stay visible.

mod errors;
mod reporting;
mod session;
mod tracing_setup;

pub use errors::RunError;
pub use reporting::{CollectingReporter, Phase, Reported, Reporter, StderrReporter};
pub use session::{RunOutcome, Session, SessionConfig};
pub use tracing_setup::init_tracing;
