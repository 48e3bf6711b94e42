//! Crossfade engine: state tracking, linear interpolation and timing.
//!
//! Provides [`CrossfadeEngine`], which owns a [`PwmOutput`] and the color last
//! written to it, and turns fade requests into a sequence of
//! compute-apply-sleep steps.

use crate::cancel::CancelToken;
use crate::colors::OFF;
use crate::command::LightCommand;
use crate::delay::{DelayNs, delay_for};
use crate::error::CrossfadeError;
use crate::pwm::PwmOutput;
use crate::show::{Show, leg_period};
use crate::types::{Channel, ColorVector, FadeResolution};
use core::time::Duration;
use log::{debug, info, warn};

/// Externally observable phase of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// No fade in progress.
    Idle,
    /// A fade or show is stepping.
    Fading,
}

/// How a fade or show ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FadeOutcome {
    /// Every step ran.
    Completed,
    /// Stopped early through a [`CancelToken`]. The color holds at the last
    /// applied vector.
    Cancelled,
}

/// Drives an RGB LED through linear crossfades.
///
/// The engine is the only writer to its output. After every successful step
/// `current_color` equals the vector on all three channels.
///
/// Fades block: each step applies a color, then sleeps `period / resolution`
/// on the delay provider. Taking `&mut self` keeps fades on one engine from
/// overlapping; see [`SharedEngine`](crate::SharedEngine) for sharing between
/// threads.
///
/// # Type Parameters
/// * `P` - PWM output implementation type
/// * `D` - Delay provider used between steps
pub struct CrossfadeEngine<P: PwmOutput, D: DelayNs> {
    output: P,
    delay: D,
    resolution: FadeResolution,
    state: EngineState,
    current_color: ColorVector,
}

impl<P: PwmOutput, D: DelayNs> CrossfadeEngine<P, D> {
    /// Creates an idle engine and switches the output off.
    ///
    /// # Errors
    /// * `Config(ZeroResolution)` - `resolution` is zero
    /// * `Hardware` - switching the output off failed
    pub fn new(output: P, delay: D, resolution: u32) -> Result<Self, CrossfadeError> {
        let resolution = FadeResolution::new(resolution)?;
        Self::with_resolution(output, delay, resolution)
    }

    /// Like [`new`](Self::new) with an already validated resolution.
    pub fn with_resolution(
        output: P,
        delay: D,
        resolution: FadeResolution,
    ) -> Result<Self, CrossfadeError> {
        let mut engine = Self {
            output,
            delay,
            resolution,
            state: EngineState::Idle,
            current_color: OFF,
        };
        engine.set_color(OFF)?;
        Ok(engine)
    }

    /// Clamps `color`, writes it to all three channels and records it.
    ///
    /// Out-of-range components are corrected silently (logged at debug).
    /// On a hardware error `current_color` keeps its previous value and the
    /// channels already written are put back to it.
    pub fn set_color(&mut self, color: ColorVector) -> Result<(), CrossfadeError> {
        let clamped = color.clamped();
        if clamped != color {
            debug!("clamped color {:?} to {:?}", color, clamped);
        }

        for (index, channel) in Channel::ALL.into_iter().enumerate() {
            if let Err(err) = self.output.set_duty_cycle(channel, clamped.channel(channel)) {
                self.restore(&Channel::ALL[..index]);
                return Err(err.into());
            }
        }
        self.current_color = clamped;
        Ok(())
    }

    /// Best-effort write of `current_color` to `channels`. Failures are logged.
    fn restore(&mut self, channels: &[Channel]) {
        for &channel in channels {
            let percent = self.current_color.channel(channel);
            if let Err(err) = self.output.set_duty_cycle(channel, percent) {
                warn!("could not restore {} to {}%: {}", channel, percent, err);
            }
        }
    }

    /// Fades linearly from the current color to `target` over `period`.
    pub fn fade_to(
        &mut self,
        target: ColorVector,
        period: Duration,
    ) -> Result<FadeOutcome, CrossfadeError> {
        self.fade_to_with(target, period, None)
    }

    /// [`fade_to`](Self::fade_to) that checks `cancel` before every step.
    ///
    /// Runs exactly `resolution` steps. Each step adds
    /// `(target - start) / resolution` to the current color, applies it and
    /// sleeps `period / resolution`. Rounding error accumulates over the steps,
    /// so the final color may differ from `target` by a small epsilon.
    ///
    /// A hardware error aborts the fade at the failing step.
    pub fn fade_to_with(
        &mut self,
        target: ColorVector,
        period: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        info!("fading to {:?} over {:?}", target, period);
        self.state = EngineState::Fading;
        let result = self.crossfade(target, period, cancel);
        self.state = EngineState::Idle;
        log_outcome("fade", &result);
        result
    }

    /// Runs a show: every leg in order, `iterations` times, then a fade to off.
    ///
    /// Each leg fades over `period / legs.len()`. The closing fade to off
    /// always runs, even for zero iterations, and uses the same per-leg period
    /// (the whole `period` when `legs` is empty).
    pub fn run_show(
        &mut self,
        iterations: u32,
        period: Duration,
        legs: &[ColorVector],
    ) -> Result<FadeOutcome, CrossfadeError> {
        self.run_show_with(iterations, period, legs, None)
    }

    /// [`run_show`](Self::run_show) that checks `cancel` before every step.
    pub fn run_show_with(
        &mut self,
        iterations: u32,
        period: Duration,
        legs: &[ColorVector],
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        let leg_period = leg_period(period, legs.len());
        info!(
            "starting show: {} iterations over {} legs, {:?} per leg",
            iterations,
            legs.len(),
            leg_period
        );

        self.state = EngineState::Fading;
        let result = self.show(iterations, leg_period, legs, cancel);
        self.state = EngineState::Idle;
        log_outcome("show", &result);
        result
    }

    /// Runs a prepared [`Show`].
    pub fn play<const N: usize>(
        &mut self,
        show: &Show<N>,
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        self.run_show_with(show.iterations(), show.period(), show.legs(), cancel)
    }

    /// Handles a command by dispatching to the matching operation.
    ///
    /// `Set` completes immediately and ignores `cancel`.
    pub fn handle_command<const N: usize>(
        &mut self,
        command: LightCommand<N>,
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        match command {
            LightCommand::Set(color) => {
                self.set_color(color)?;
                Ok(FadeOutcome::Completed)
            }
            LightCommand::Fade { target, period } => self.fade_to_with(target, period, cancel),
            LightCommand::Play(show) => self.play(&show, cancel),
        }
    }

    /// Returns the color last written to all three channels.
    pub fn current_color(&self) -> ColorVector {
        self.current_color
    }

    /// Returns the current phase of the engine.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns the number of steps per fade.
    pub fn resolution(&self) -> FadeResolution {
        self.resolution
    }

    /// Returns a reference to the output.
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Switches the output off and hands it back.
    ///
    /// `current_color` is not updated on the way out: the engine is gone.
    pub fn release(mut self) -> Result<P, CrossfadeError> {
        self.output.release()?;
        info!("engine released its output");
        Ok(self.output)
    }

    fn show(
        &mut self,
        iterations: u32,
        leg_period: Duration,
        legs: &[ColorVector],
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        for iteration in 0..iterations {
            debug!("show iteration {}/{}", iteration + 1, iterations);
            for &leg in legs {
                if self.crossfade(leg, leg_period, cancel)? == FadeOutcome::Cancelled {
                    return Ok(FadeOutcome::Cancelled);
                }
            }
        }
        self.crossfade(OFF, leg_period, cancel)
    }

    fn crossfade(
        &mut self,
        target: ColorVector,
        period: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<FadeOutcome, CrossfadeError> {
        let target = target.clamped();
        let steps = self.resolution.get();
        let increment = (target - self.current_color) / steps as f32;
        let step_period = self.resolution.step_period(period);
        debug!(
            "crossfade {:?} -> {:?}: {} steps of {:?}",
            self.current_color, target, steps, step_period
        );

        for step in 0..steps {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                warn!("fade cancelled after {} of {} steps", step, steps);
                return Ok(FadeOutcome::Cancelled);
            }

            if let Err(err) = self.set_color(self.current_color + increment) {
                warn!("fade aborted at step {} of {}: {}", step + 1, steps, err);
                return Err(err);
            }
            delay_for(&mut self.delay, step_period);
        }

        Ok(FadeOutcome::Completed)
    }
}

fn log_outcome(what: &str, result: &Result<FadeOutcome, CrossfadeError>) {
    match result {
        Ok(FadeOutcome::Completed) => info!("{} complete", what),
        Ok(FadeOutcome::Cancelled) => info!("{} cancelled", what),
        Err(err) => warn!("{} failed: {}", what, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, RED};
    use crate::error::PwmError;
    extern crate std;
    use std::vec::Vec;

    struct VecOutput {
        writes: Vec<(Channel, f32)>,
    }

    impl PwmOutput for VecOutput {
        fn set_duty_cycle(&mut self, channel: Channel, percent: f32) -> Result<(), PwmError> {
            self.writes.push((channel, percent));
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn engine(resolution: u32) -> CrossfadeEngine<VecOutput, NoDelay> {
        CrossfadeEngine::new(VecOutput { writes: Vec::new() }, NoDelay, resolution).unwrap()
    }

    #[test]
    fn new_writes_off_to_every_channel() {
        let engine = engine(10);
        assert_eq!(
            engine.output().writes,
            [(Channel::Red, 0.0), (Channel::Green, 0.0), (Channel::Blue, 0.0)]
        );
        assert_eq!(engine.current_color(), OFF);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn zero_resolution_refuses_construction() {
        let result = CrossfadeEngine::new(VecOutput { writes: Vec::new() }, NoDelay, 0);
        assert!(matches!(
            result,
            Err(CrossfadeError::Config(crate::ConfigError::ZeroResolution))
        ));
    }

    #[test]
    fn target_outside_range_is_clamped_before_interpolating() {
        let mut engine = engine(4);
        engine
            .fade_to(ColorVector::new(400.0, -40.0, 100.0), Duration::ZERO)
            .unwrap();
        let color = engine.current_color();
        assert!((color.red - 100.0).abs() < 1e-3);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 100.0).abs() < 1e-3);
    }

    #[test]
    fn set_command_applies_immediately() {
        let mut engine = engine(10);
        let outcome = engine
            .handle_command::<2>(LightCommand::Set(RED), None)
            .unwrap();
        assert_eq!(outcome, FadeOutcome::Completed);
        assert_eq!(engine.current_color(), RED);
    }

    #[test]
    fn fade_command_uses_engine_resolution() {
        let mut engine = engine(5);
        engine
            .handle_command::<2>(
                LightCommand::Fade {
                    target: BLUE,
                    period: Duration::ZERO,
                },
                None,
            )
            .unwrap();
        // 3 writes from construction plus 3 per step
        assert_eq!(engine.output().writes.len(), 3 + 5 * 3);
    }
}
