use apnum_core::{ApnumError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cooperative cancellation flag shared by a context and its computations.
///
/// Long loops poll [`CancellationToken::check`] between passes. Observing a
/// cancellation does not clear it; the caller decides when to [`reset`].
///
/// [`reset`]: CancellationToken::reset
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        debug!("cancellation requested");
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    /// `Err(Interrupted)` while a cancellation is pending.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ApnumError::Interrupted)
        } else {
            Ok(())
        }
    }
}
