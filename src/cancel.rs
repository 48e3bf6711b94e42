//! Cooperative cancellation for running fades.

use core::sync::atomic::{AtomicBool, Ordering};

/// Flag checked by the engine once per fade step.
///
/// Cancelling stops the fade before its next step. The color stays at the
/// last vector that was applied; nothing is rolled back.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Requests cancellation of the fade observing this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clears a previous request so the token can guard the next fade.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
