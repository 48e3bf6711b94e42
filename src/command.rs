//! Command-based control for engines.

use crate::show::Show;
use crate::types::ColorVector;
use core::time::Duration;

/// Actions a request layer can hand to an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum LightCommand<const N: usize> {
    /// Apply a color immediately.
    Set(ColorVector),
    /// Crossfade to a color.
    Fade { target: ColorVector, period: Duration },
    /// Run a show.
    Play(Show<N>),
}

impl<const N: usize> LightCommand<N> {
    /// Fade to `target` over the default period.
    pub fn fade(target: ColorVector) -> Self {
        LightCommand::Fade {
            target,
            period: crate::DEFAULT_PERIOD,
        }
    }
}
