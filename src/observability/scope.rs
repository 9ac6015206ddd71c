//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` with elapsed time on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::cell::Cell;
use std::time::Instant;

use tracing::{error, info, warn};

/// A scope that logs the lifecycle of one operation
///
/// ```ignore
/// let scope = ObservationScope::new("EXPORT");
/// // ... do work ...
/// scope.complete(); // logs EXPORT_COMPLETE
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    started: Instant,
    completed: Cell<bool>,
}

impl<'a> ObservationScope<'a> {
    /// Logs `{name}_BEGIN` immediately
    pub fn new(name: &'a str) -> Self {
        info!(event = %format!("{}_BEGIN", name));
        Self {
            name,
            started: Instant::now(),
            completed: Cell::new(false),
        }
    }

    pub fn complete(self) {
        self.completed.set(true);
        info!(
            event = %format!("{}_COMPLETE", self.name),
            elapsed_ms = self.elapsed_ms(),
        );
    }

    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        error!(
            event = %format!("{}_FAILED", self.name),
            elapsed_ms = self.elapsed_ms(),
            reason,
        );
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                reason = "scope dropped without completion",
            );
        }
    }
}
