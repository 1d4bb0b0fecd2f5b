//! Stack growth for the tree walkers.
//!
//! The resolver and the evaluator recurse once per syntax node, and user
//! code can nest arbitrarily (`((((...))))`, deeply recursive functions).
//! Every visit goes through [`ensure_sufficient_stack`], which grows the host
//! stack on a fresh segment when the current one runs low.
//!
//! Growth does not bound user recursion: the evaluator additionally counts
//! calls against its configured maximum call depth.
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough.

/// Grow when less than this much stack remains.
///
/// A single evaluator frame (expression visit plus a user call) stays well
/// under this.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const GROWTH_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left on the current segment, when the platform reports it.
///
/// Only used for trace output.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
