//! Multi-leg light shows.

use crate::colors::HUE_CYCLE;
use crate::types::{ColorVector, ShowError};
use core::time::Duration;
use heapless::Vec;

/// A light show: fade through every leg in order, `iterations` times, then
/// fade to off.
///
/// One pass over all legs takes `period`, so each leg gets
/// `period / leg_count`. The closing fade to off uses the per-leg period too.
///
/// # Type Parameters
/// * `N` - Maximum number of legs this show can hold
#[derive(Debug, Clone, PartialEq)]
pub struct Show<const N: usize> {
    legs: Vec<ColorVector, N>,
    iterations: u32,
    period: Duration,
}

impl<const N: usize> Show<N> {
    /// Creates a new show builder.
    pub fn builder() -> ShowBuilder<N> {
        ShowBuilder::new()
    }

    /// Once around the hue wheel per iteration.
    ///
    /// # Errors
    /// * `CapacityExceeded` - `N` is smaller than the six hue legs
    pub fn hue_cycle(iterations: u32, period: Duration) -> Result<Self, ShowError> {
        Ok(Self::builder()
            .legs(HUE_CYCLE)?
            .iterations(iterations)
            .period(period)
            .build())
    }

    pub fn legs(&self) -> &[ColorVector] {
        &self.legs
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Duration of one pass over all legs.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Fade duration of a single leg.
    pub fn leg_period(&self) -> Duration {
        leg_period(self.period, self.legs.len())
    }
}

/// Splits a pass duration evenly over `leg_count` legs. No legs keeps the
/// whole period.
pub(crate) fn leg_period(period: Duration, leg_count: usize) -> Duration {
    match u32::try_from(leg_count) {
        Ok(0) => period,
        Ok(count) => period / count,
        Err(_) => period / u32::MAX,
    }
}

/// Builder for [`Show`].
#[derive(Debug)]
pub struct ShowBuilder<const N: usize> {
    legs: Vec<ColorVector, N>,
    iterations: u32,
    period: Duration,
}

impl<const N: usize> ShowBuilder<N> {
    /// Creates an empty builder: one iteration over the default period.
    pub fn new() -> Self {
        Self {
            legs: Vec::new(),
            iterations: 1,
            period: crate::DEFAULT_PERIOD,
        }
    }

    /// Appends a leg.
    ///
    /// # Errors
    /// * `CapacityExceeded` - the show already holds `N` legs
    pub fn leg(mut self, color: ColorVector) -> Result<Self, ShowError> {
        self.legs
            .push(color)
            .map_err(|_| ShowError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends several legs in order.
    pub fn legs<I>(mut self, colors: I) -> Result<Self, ShowError>
    where
        I: IntoIterator<Item = ColorVector>,
    {
        for color in colors {
            self = self.leg(color)?;
        }
        Ok(self)
    }

    /// Sets how many passes over the legs to run. Default is 1.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the duration of one pass over all legs.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn build(self) -> Show<N> {
        Show {
            legs: self.legs,
            iterations: self.iterations,
            period: self.period,
        }
    }
}

impl<const N: usize> Default for ShowBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
