#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ColorVector`**: Duty cycles for the red, green and blue channels, each in 0.0-100.0
//! - **`FadeResolution`**: Number of interpolation steps per crossfade
//! - **`PwmOutput`**: Trait for the three duty-cycle channels an engine drives
//! - **`PwmRgbSink`**: `PwmOutput` over three `embedded_hal` PWM channels
//! - **`CrossfadeEngine`**: Owns the current color and runs fades and shows
//! - **`Show`**: A validated multi-leg show (legs, iterations, period)
//! - **`CancelToken`**: Cooperative cancellation checked once per fade step
//! - **`LightCommand`**: Commands a request layer can dispatch to an engine
//! - **`SharedEngine`** (`std`): Mutex-guarded handle that rejects overlapping fades
//!
//! Interpolation is linear in duty-cycle space. Colors coming from `palette`
//! (`Srgb<f32>`, 0.0-1.0) convert into `ColorVector` by scaling to percent.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod cancel;
pub mod colors;
pub mod command;
pub mod delay;
pub mod engine;
pub mod error;
pub mod pwm;
#[cfg(feature = "std")]
pub mod shared;
pub mod show;
pub mod types;

pub use cancel::CancelToken;
pub use command::LightCommand;
pub use delay::DelayNs;
#[cfg(feature = "std")]
pub use delay::StdDelay;
pub use engine::{CrossfadeEngine, EngineState, FadeOutcome};
pub use error::{ConfigError, CrossfadeError, PwmError};
pub use pwm::{ChannelMap, Polarity, PwmOutput, PwmRgbSink};
#[cfg(feature = "std")]
pub use shared::SharedEngine;
pub use show::{Show, ShowBuilder};
pub use types::{
    Channel, ColorVector, FadeResolution, MAX_DUTY_CYCLE, MIN_DUTY_CYCLE, ShowError,
};

pub use colors::{BLUE, GREEN, GREEN_BLUE, OFF, ON, RED, RED_BLUE, RED_GREEN};

/// Fade duration used when a caller names a color without a period.
pub const DEFAULT_PERIOD: core::time::Duration = core::time::Duration::from_secs(2);

/// Default number of steps per crossfade.
pub const DEFAULT_RESOLUTION: u32 = 100;
