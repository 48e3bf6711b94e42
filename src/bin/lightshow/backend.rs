//! Simulated PWM channels for hosts without LED hardware.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::trace;
use rgb_crossfade::Channel;
use std::convert::Infallible;

/// Resolution of the simulated PWM counter.
const MAX_DUTY: u16 = 1000;

/// PWM channel that only records and traces its duty cycle.
#[derive(Debug)]
pub struct SimulatedPwm {
    channel: Channel,
    pin: u8,
    duty: u16,
}

impl SimulatedPwm {
    pub fn new(channel: Channel, pin: u8) -> Self {
        Self {
            channel,
            pin,
            duty: 0,
        }
    }
}

impl ErrorType for SimulatedPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimulatedPwm {
    fn max_duty_cycle(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if duty != self.duty {
            trace!("{} (pin {}) duty {}/{}", self.channel, self.pin, duty, MAX_DUTY);
        }
        self.duty = duty;
        Ok(())
    }
}
