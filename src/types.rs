//! Core value types: color vectors, channels and fade resolution.

use crate::error::ConfigError;
use core::num::NonZeroU32;
use core::ops::{Add, Div, Sub};
use core::time::Duration;
use palette::Srgb;

/// Lowest duty cycle a channel accepts, in percent.
pub const MIN_DUTY_CYCLE: f32 = 0.0;

/// Highest duty cycle a channel accepts, in percent.
pub const MAX_DUTY_CYCLE: f32 = 100.0;

/// Clamps a duty cycle into `[MIN_DUTY_CYCLE, MAX_DUTY_CYCLE]`. NaN maps to off.
#[inline]
pub fn clamp_duty(value: f32) -> f32 {
    if value.is_nan() {
        MIN_DUTY_CYCLE
    } else {
        value.clamp(MIN_DUTY_CYCLE, MAX_DUTY_CYCLE)
    }
}

/// One of the three LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in write order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

/// Instantaneous brightness of the three channels as duty-cycle percentages.
///
/// Components are nominally in 0.0-100.0. Values outside that range are
/// representable (they show up as intermediate arithmetic results) and are
/// clamped when applied to hardware.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorVector {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl ColorVector {
    #[inline]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Same value on every channel.
    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Returns the component for `channel`.
    #[inline]
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Clamps each component independently into the duty-cycle range.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            clamp_duty(self.red),
            clamp_duty(self.green),
            clamp_duty(self.blue),
        )
    }

    /// Returns true when every component is already a valid duty cycle.
    pub fn is_in_range(&self) -> bool {
        self.clamped() == *self
    }

    /// Largest absolute per-channel difference to `other`.
    pub fn max_distance(&self, other: ColorVector) -> f32 {
        let diff = *self - other;
        diff.red.abs().max(diff.green.abs()).max(diff.blue.abs())
    }
}

impl Add for ColorVector {
    type Output = ColorVector;

    fn add(self, rhs: ColorVector) -> ColorVector {
        ColorVector::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
        )
    }
}

impl Sub for ColorVector {
    type Output = ColorVector;

    fn sub(self, rhs: ColorVector) -> ColorVector {
        ColorVector::new(
            self.red - rhs.red,
            self.green - rhs.green,
            self.blue - rhs.blue,
        )
    }
}

impl Div<f32> for ColorVector {
    type Output = ColorVector;

    fn div(self, rhs: f32) -> ColorVector {
        ColorVector::new(self.red / rhs, self.green / rhs, self.blue / rhs)
    }
}

impl From<Srgb> for ColorVector {
    /// Scales 0.0-1.0 sRGB components to duty-cycle percent.
    fn from(color: Srgb) -> Self {
        ColorVector::new(
            color.red * MAX_DUTY_CYCLE,
            color.green * MAX_DUTY_CYCLE,
            color.blue * MAX_DUTY_CYCLE,
        )
    }
}

impl From<ColorVector> for Srgb {
    fn from(color: ColorVector) -> Self {
        let color = color.clamped();
        Srgb::new(
            color.red / MAX_DUTY_CYCLE,
            color.green / MAX_DUTY_CYCLE,
            color.blue / MAX_DUTY_CYCLE,
        )
    }
}

const DEFAULT_STEPS: NonZeroU32 = match NonZeroU32::new(crate::DEFAULT_RESOLUTION) {
    Some(steps) => steps,
    None => panic!("default resolution must be non-zero"),
};

/// Number of discrete steps used to traverse one crossfade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FadeResolution(NonZeroU32);

impl FadeResolution {
    /// Validates a step count.
    ///
    /// # Errors
    /// * `ZeroResolution` - `steps` is zero
    pub fn new(steps: u32) -> Result<Self, ConfigError> {
        NonZeroU32::new(steps)
            .map(FadeResolution)
            .ok_or(ConfigError::ZeroResolution)
    }

    /// Step count.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Delay between two steps of a fade lasting `period`.
    #[inline]
    pub fn step_period(self, period: Duration) -> Duration {
        period / self.0.get()
    }
}

impl Default for FadeResolution {
    fn default() -> Self {
        FadeResolution(DEFAULT_STEPS)
    }
}

/// Show construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowError {
    /// Show leg capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for ShowError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShowError::CapacityExceeded => write!(f, "show leg capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ShowError {}
