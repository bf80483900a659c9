//! Single-flight guard for long-running operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::PipelineError;

/// Allows at most one holder at a time. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard, or fail immediately with `Conflict` if it is held.
    pub fn try_acquire(&self, operation: &'static str) -> Result<RunPermit, PipelineError> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| RunPermit {
                running: self.running.clone(),
            })
            .map_err(|_| PipelineError::Conflict { operation })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Held while an operation runs. Dropping it releases the guard on every exit path.
#[derive(Debug)]
pub struct RunPermit {
    running: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
