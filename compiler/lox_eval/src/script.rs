//! Resolved scripts.

use std::ops::Deref;
use std::sync::Arc;

use lox_ir::{Program, Resolution};

/// A program together with its resolution side table.
///
/// Immutable once built. Functions keep a [`SharedScript`] to the script
/// that declared them, so their bodies stay reachable after the run that
/// defined them has finished.
#[derive(Debug)]
pub struct Script {
    pub program: Program,
    pub resolution: Resolution,
}

impl Script {
    pub fn new(program: Program, resolution: Resolution) -> Self {
        Script {
            program,
            resolution,
        }
    }
}

/// Shared handle to a [`Script`].
#[derive(Clone, Debug)]
pub struct SharedScript(Arc<Script>);

impl SharedScript {
    pub fn new(script: Script) -> Self {
        SharedScript(Arc::new(script))
    }
}

impl Deref for SharedScript {
    type Target = Script;

    fn deref(&self) -> &Script {
        &self.0
    }
}
