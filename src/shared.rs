//! Thread-safe engine handle.
//!
//! [`SharedEngine`] lets several request handlers reach one engine while
//! allowing only one fade at a time. A call that finds the engine fading is
//! rejected with [`CrossfadeError::Busy`] instead of queueing behind it.
//! After [`SharedEngine::close`] every call is rejected the same way.

use crate::cancel::CancelToken;
use crate::command::LightCommand;
use crate::delay::DelayNs;
use crate::engine::{CrossfadeEngine, EngineState, FadeOutcome};
use crate::error::CrossfadeError;
use crate::pwm::PwmOutput;
use crate::types::ColorVector;
use core::time::Duration;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Cloneable, mutex-guarded handle to a [`CrossfadeEngine`].
///
/// All clones share one engine and one [`CancelToken`]. The token is cleared
/// when a fade starts, so a cancel only affects the fade running at the time.
pub struct SharedEngine<P: PwmOutput, D: DelayNs> {
    engine: Arc<Mutex<CrossfadeEngine<P, D>>>,
    cancel: Arc<CancelToken>,
    closed: Arc<AtomicBool>,
}

impl<P: PwmOutput, D: DelayNs> Clone for SharedEngine<P, D> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            cancel: Arc::clone(&self.cancel),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<P: PwmOutput, D: DelayNs> SharedEngine<P, D> {
    pub fn new(engine: CrossfadeEngine<P, D>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            cancel: Arc::new(CancelToken::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Applies a color. Fails with `Busy` while a fade runs.
    pub fn set_color(&self, color: ColorVector) -> Result<(), CrossfadeError> {
        self.lock()?.set_color(color)
    }

    /// Cancellable [`CrossfadeEngine::fade_to`]. Fails with `Busy` while a fade runs.
    pub fn fade_to(
        &self,
        target: ColorVector,
        period: Duration,
    ) -> Result<FadeOutcome, CrossfadeError> {
        let mut engine = self.start_fade()?;
        engine.fade_to_with(target, period, Some(&self.cancel))
    }

    /// Cancellable [`CrossfadeEngine::run_show`]. Fails with `Busy` while a fade runs.
    pub fn run_show(
        &self,
        iterations: u32,
        period: Duration,
        legs: &[ColorVector],
    ) -> Result<FadeOutcome, CrossfadeError> {
        let mut engine = self.start_fade()?;
        engine.run_show_with(iterations, period, legs, Some(&self.cancel))
    }

    /// Dispatches a command. Fails with `Busy` while a fade runs.
    pub fn handle_command<const N: usize>(
        &self,
        command: LightCommand<N>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        let mut engine = self.start_fade()?;
        engine.handle_command(command, Some(&self.cancel))
    }

    /// Asks the running fade, if any, to stop before its next step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancels the running fade and rejects every later call with `Busy`.
    ///
    /// Only [`release`](Self::release) still works on a closed engine.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.cancel.cancel();
        info!("shared engine closed");
    }

    /// Returns true once [`close`](Self::close) was called on any handle.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Returns the last applied color, or `Busy` while a fade runs.
    pub fn current_color(&self) -> Result<ColorVector, CrossfadeError> {
        Ok(self.lock()?.current_color())
    }

    /// Returns `Fading` while another caller holds the engine.
    pub fn state(&self) -> EngineState {
        match self.engine.try_lock() {
            Ok(engine) => engine.state(),
            Err(TryLockError::WouldBlock) => EngineState::Fading,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().state(),
        }
    }

    /// Switches the output off and hands it back.
    ///
    /// Fails with `Busy` while other handles to the engine are alive; the
    /// output is then released when the last handle is dropped.
    pub fn release(self) -> Result<P, CrossfadeError> {
        let mutex = Arc::try_unwrap(self.engine).map_err(|_| CrossfadeError::Busy)?;
        let engine = mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        engine.release()
    }

    fn start_fade(&self) -> Result<MutexGuard<'_, CrossfadeEngine<P, D>>, CrossfadeError> {
        let engine = self.lock()?;
        self.cancel.reset();
        // Checked after the reset: a concurrent close either lands before this
        // check or cancels the fade that follows.
        if self.is_closed() {
            return Err(CrossfadeError::Busy);
        }
        Ok(engine)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CrossfadeEngine<P, D>>, CrossfadeError> {
        if self.is_closed() {
            return Err(CrossfadeError::Busy);
        }
        match self.engine.try_lock() {
            Ok(engine) => Ok(engine),
            Err(TryLockError::WouldBlock) => Err(CrossfadeError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!("engine lock poisoned by a panicked fade, continuing");
                Ok(poisoned.into_inner())
            }
        }
    }
}
