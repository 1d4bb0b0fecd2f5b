//! Evaluation modes.
//!
//! A script run as a file and a line typed at a prompt differ in one policy:
//! whether a bare expression statement shows its value.

/// Evaluation mode, consulted through policy methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Whole-file execution.
    #[default]
    Batch,
    /// Read-eval-print loop.
    Interactive,
}

impl EvalMode {
    /// Whether top-level expression statements print their value.
    #[inline]
    pub fn echoes_expression_statements(self) -> bool {
        matches!(self, Self::Interactive)
    }
}
