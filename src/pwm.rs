//! Duty-cycle output for the three LED channels.
//!
//! [`PwmOutput`] is what the engine writes to. [`PwmRgbSink`] implements it
//! over three `embedded_hal` PWM channels and turns them off when it is
//! released or dropped.

use crate::error::{ConfigError, CrossfadeError, PwmError};
use crate::types::{Channel, MAX_DUTY_CYCLE, MIN_DUTY_CYCLE, clamp_duty};
use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::{debug, warn};

/// Trait for abstracting the three duty-cycle channels of an RGB LED.
///
/// Implement this for your PWM hardware to let a
/// [`CrossfadeEngine`](crate::CrossfadeEngine) drive it.
pub trait PwmOutput {
    /// Sets the duty cycle of one channel, in percent.
    ///
    /// Values outside 0.0-100.0 must be clamped, never rejected.
    fn set_duty_cycle(&mut self, channel: Channel, percent: f32) -> Result<(), PwmError>;

    /// Drives every channel off. Called once when the owner tears down.
    fn release(&mut self) -> Result<(), PwmError> {
        for channel in Channel::ALL {
            self.set_duty_cycle(channel, MIN_DUTY_CYCLE)?;
        }
        Ok(())
    }
}

/// Wiring of the LED channels to output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMap {
    red: u8,
    green: u8,
    blue: u8,
}

impl ChannelMap {
    /// BCM numbering used by the Raspberry Pi light-show wiring.
    pub const BCM_DEFAULT: ChannelMap = ChannelMap {
        red: 27,
        green: 4,
        blue: 17,
    };

    /// Creates a mapping.
    ///
    /// # Errors
    /// * `DuplicatePin` - two channels share a pin
    pub fn new(red: u8, green: u8, blue: u8) -> Result<Self, ConfigError> {
        if red == green || red == blue {
            return Err(ConfigError::DuplicatePin(red));
        }
        if green == blue {
            return Err(ConfigError::DuplicatePin(green));
        }
        Ok(Self { red, green, blue })
    }

    /// Pin driving `channel`.
    pub fn pin(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::BCM_DEFAULT
    }
}

/// How the LED is wired to the PWM outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Higher duty cycle means brighter.
    #[default]
    CommonCathode,
    /// Inverted logic: full duty cycle means dark.
    CommonAnode,
}

/// Converts a percentage to a raw duty value for a channel with `max_duty`.
fn percent_to_duty(percent: f32, max_duty: u16, polarity: Polarity) -> u16 {
    let fraction = clamp_duty(percent) / MAX_DUTY_CYCLE;
    let duty = (fraction * max_duty as f32 + 0.5) as u16;
    let duty = duty.min(max_duty);

    match polarity {
        Polarity::CommonCathode => duty,
        Polarity::CommonAnode => max_duty - duty,
    }
}

fn write_channel<P: SetDutyCycle>(
    pwm: &mut P,
    channel: Channel,
    percent: f32,
    polarity: Polarity,
) -> Result<(), PwmError> {
    let duty = percent_to_duty(percent, pwm.max_duty_cycle(), polarity);
    pwm.set_duty_cycle(duty).map_err(|err| PwmError {
        channel,
        kind: err.kind(),
    })
}

/// RGB output over three PWM channels.
///
/// Construction starts every channel at 0 %. The channels are switched off
/// exactly once on teardown: by [`release`](PwmOutput::release), or by `Drop`
/// when the sink goes away without being released.
pub struct PwmRgbSink<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    red: R,
    green: G,
    blue: B,
    polarity: Polarity,
    released: bool,
}

impl<R, G, B> PwmRgbSink<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    /// Takes ownership of the three channels and switches them off.
    pub fn new(red: R, green: G, blue: B, polarity: Polarity) -> Result<Self, PwmError> {
        let mut sink = Self {
            red,
            green,
            blue,
            polarity,
            released: false,
        };
        for channel in Channel::ALL {
            sink.set_duty_cycle(channel, MIN_DUTY_CYCLE)?;
        }
        Ok(sink)
    }

    /// Returns the channel polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns true once `release` has run and nothing was written since.
    ///
    /// Stays true when the release failed on a channel; it is not retried.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<P: SetDutyCycle> PwmRgbSink<P, P, P> {
    /// Reserves one channel per pin of `map` through `open` and switches them off.
    pub fn open<F>(map: ChannelMap, polarity: Polarity, mut open: F) -> Result<Self, CrossfadeError>
    where
        F: FnMut(Channel, u8) -> P,
    {
        let red = open(Channel::Red, map.pin(Channel::Red));
        let green = open(Channel::Green, map.pin(Channel::Green));
        let blue = open(Channel::Blue, map.pin(Channel::Blue));
        debug!(
            "reserved PWM pins red={} green={} blue={}",
            map.pin(Channel::Red),
            map.pin(Channel::Green),
            map.pin(Channel::Blue)
        );
        Self::new(red, green, blue, polarity).map_err(CrossfadeError::from)
    }
}

impl<R, G, B> PwmOutput for PwmRgbSink<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn set_duty_cycle(&mut self, channel: Channel, percent: f32) -> Result<(), PwmError> {
        let polarity = self.polarity;
        match channel {
            Channel::Red => write_channel(&mut self.red, channel, percent, polarity)?,
            Channel::Green => write_channel(&mut self.green, channel, percent, polarity)?,
            Channel::Blue => write_channel(&mut self.blue, channel, percent, polarity)?,
        }
        // Any write after a release lights the LED again; drop must turn it off.
        self.released = false;
        Ok(())
    }

    fn release(&mut self) -> Result<(), PwmError> {
        if self.released {
            return Ok(());
        }
        // Marked before writing: a failed release is not repeated by drop.
        self.released = true;
        let polarity = self.polarity;
        let red = write_channel(&mut self.red, Channel::Red, MIN_DUTY_CYCLE, polarity);
        let green = write_channel(&mut self.green, Channel::Green, MIN_DUTY_CYCLE, polarity);
        let blue = write_channel(&mut self.blue, Channel::Blue, MIN_DUTY_CYCLE, polarity);
        red.and(green).and(blue)?;
        debug!("PWM channels released");
        Ok(())
    }
}

impl<R, G, B> Drop for PwmRgbSink<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("failed to switch off PWM channels on drop: {}", err);
        }
    }
}
