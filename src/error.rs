//! Error types for engine construction and hardware writes.

use crate::types::Channel;
use embedded_hal::pwm::ErrorKind;

/// Invalid engine or sink configuration. Refuses construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Fade resolution of zero steps.
    ZeroResolution,
    /// The same pin is mapped to more than one channel.
    DuplicatePin(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroResolution => {
                write!(f, "fade resolution must be at least one step")
            }
            ConfigError::DuplicatePin(pin) => {
                write!(f, "pin {} is mapped to more than one channel", pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// A duty-cycle write failed on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmError {
    /// Channel whose write failed.
    pub channel: Channel,
    /// Error kind reported by the PWM driver.
    pub kind: ErrorKind,
}

impl core::fmt::Display for PwmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "duty-cycle write to {} channel failed: {:?}", self.channel, self.kind)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PwmError {}

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossfadeError {
    /// Invalid configuration at construction.
    Config(ConfigError),
    /// Hardware write failed. The running fade was aborted.
    Hardware(PwmError),
    /// Another fade holds the engine.
    Busy,
}

impl core::fmt::Display for CrossfadeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CrossfadeError::Config(err) => write!(f, "invalid configuration: {}", err),
            CrossfadeError::Hardware(err) => write!(f, "hardware write failed: {}", err),
            CrossfadeError::Busy => write!(f, "a fade is already in progress"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CrossfadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrossfadeError::Config(err) => Some(err),
            CrossfadeError::Hardware(err) => Some(err),
            CrossfadeError::Busy => None,
        }
    }
}

impl From<ConfigError> for CrossfadeError {
    fn from(err: ConfigError) -> Self {
        CrossfadeError::Config(err)
    }
}

impl From<PwmError> for CrossfadeError {
    fn from(err: PwmError) -> Self {
        CrossfadeError::Hardware(err)
    }
}
