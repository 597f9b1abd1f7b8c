// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operator interrupt flag.
//!
//! Ctrl-C sets a shared flag instead of killing the process. Sync runs check
//! it between pages and between sleep slices, then release their lock and
//! report partial progress before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Shared, cloneable interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag raised by Ctrl-C.
    ///
    /// Only one handler may be installed per process.
    pub fn install() -> Result<Self> {
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        ctrlc::set_handler(move || {
            handle.trigger();
        })
        .map_err(|e| Error::Io(std::io::Error::other(format!("failed to install Ctrl-C handler: {e}"))))?;
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fails with [`Error::Interrupted`] once the flag is raised.
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
