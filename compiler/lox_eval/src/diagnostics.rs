//! Call stack tracking for the evaluator.
//!
//! Every user function call pushes a `CallFrame`; the depth check that turns
//! runaway recursion into a runtime error lives in [`CallStack::push`].

use lox_ir::Name;

use crate::errors::{stack_overflow, EvalError};

/// A single frame in the live call stack.
#[derive(Clone, Copy, Debug)]
pub struct CallFrame {
    /// Interned function or method name.
    pub name: Name,
    /// Line of the call site.
    pub line: u32,
}

/// Live call stack for the interpreter.
///
/// `max_depth` is `None` for unlimited, in which case only the native stack
/// bounds recursion.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the stack is empty.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

impl Default for CallStack {
    /// An unlimited call stack.
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalErrorKind;

    fn frame(raw: u32) -> CallFrame {
        CallFrame {
            name: Name::from_raw(raw),
            line: raw,
        }
    }

    #[test]
    fn push_pop_tracks_depth() {
        let mut stack = CallStack::new(Some(4));
        stack.push(frame(1)).unwrap();
        stack.push(frame(2)).unwrap();
        assert_eq!(stack.depth(), 2);
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn overflow_is_reported_and_not_pushed() {
        let mut stack = CallStack::new(Some(2));
        stack.push(frame(1)).unwrap();
        stack.push(frame(2)).unwrap();
        let err = stack.push(frame(3)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 2 });
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn unlimited_by_default() {
        let mut stack = CallStack::default();
        for i in 0..1000 {
            stack.push(frame(i)).unwrap();
        }
        assert_eq!(stack.depth(), 1000);
    }
}
