//! # GPIO PWM Output
//!
//! Drives servo signal lines from Raspberry Pi GPIO pins using `rppal`'s
//! PWM. Any BCM pin can be used, so the four servos do not compete for the
//! two hardware PWM channels.

use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};
use tracing::debug;

use super::output::PwmOutput;
use crate::error::{ReceiverError, Result};

/// One servo signal line
struct ServoPin {
    pin: OutputPin,
    period: Duration,
}

/// [`PwmOutput`] backed by GPIO pins, channel `i` driving `pins[i]`
pub struct GpioPwm {
    pins: Vec<ServoPin>,
}

impl std::fmt::Debug for GpioPwm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pins: Vec<u8> = self.pins.iter().map(|p| p.pin.pin()).collect();
        f.debug_struct("GpioPwm").field("pins", &pins).finish()
    }
}

impl GpioPwm {
    /// Claim the given BCM pins as outputs, driven low until configured.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Gpio`] if the GPIO peripheral is unavailable
    /// or a pin is already in use.
    pub fn new(pins: &[u8]) -> Result<Self> {
        let gpio = Gpio::new()?;

        let pins = pins
            .iter()
            .map(|&number| -> Result<ServoPin> {
                let pin = gpio.get(number)?.into_output_low();
                debug!("Claimed GPIO {} for servo output", number);
                Ok(ServoPin { pin, period: Duration::ZERO })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { pins })
    }

    fn servo_pin(&mut self, channel: usize) -> Result<&mut ServoPin> {
        self.pins
            .get_mut(channel)
            .ok_or_else(|| ReceiverError::Pwm(format!("no GPIO assigned to servo channel {}", channel)))
    }
}

impl PwmOutput for GpioPwm {
    fn configure(&mut self, channel: usize, period: Duration, pulse_width: Duration) -> Result<()> {
        let servo = self.servo_pin(channel)?;
        servo.pin.set_pwm(period, pulse_width)?;
        servo.period = period;
        Ok(())
    }

    fn set_pulse_width(&mut self, channel: usize, pulse_width: Duration) -> Result<()> {
        let servo = self.servo_pin(channel)?;
        servo.pin.set_pwm(servo.period, pulse_width)?;
        Ok(())
    }
}
