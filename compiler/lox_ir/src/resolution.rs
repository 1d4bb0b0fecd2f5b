//! Resolver output: binding distances keyed by node identity.

use crate::ExprId;
use rustc_hash::FxHashMap;

/// Side table mapping a variable-like node (`Variable`, `Assign`, `This`,
/// `Super`) to the number of scopes between its use and its binding.
///
/// A node with no entry is a global reference.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Resolution {
    depths: FxHashMap<ExprId, usize>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hop distance for a node. Later records win.
    pub fn record(&mut self, expr: ExprId, depth: usize) {
        self.depths.insert(expr, depth);
    }

    /// Hop distance for a node, or `None` for globals.
    #[inline]
    pub fn depth(&self, expr: ExprId) -> Option<usize> {
        self.depths.get(&expr).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
