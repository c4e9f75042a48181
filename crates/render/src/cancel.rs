use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::MeshError;

/// Shared flag that aborts a running mesh pass.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Polled once per processed block.
    #[inline]
    pub fn check(&self) -> Result<(), MeshError> {
        if self.is_cancelled() {
            return Err(MeshError::Cancelled);
        }
        Ok(())
    }
}
