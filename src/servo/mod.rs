//! # Servo Module
//!
//! Actuator driver for four hobby servos.
//!
//! Each servo receives a 50 Hz pulse train whose high time encodes the
//! commanded angle:
//!
//! | Angle | Pulse (default) |
//! |-------|-----------------|
//! | 0° | 1000 µs |
//! | 90° | 1500 µs |
//! | 180° | 2000 µs |
//!
//! Angles outside 0-180 are clamped, never rejected.

pub mod gpio;
pub mod output;

use std::time::Duration;

use tracing::{debug, error, info, warn};

pub use gpio::GpioPwm;
pub use output::PwmOutput;

use crate::config::{ServoConfig, MAX_ANGLE, SERVO_COUNT};
use crate::error::{ReceiverError, Result};

/// Pulse widths for the ends of the servo's travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRange {
    /// Pulse for 0°
    pub min_us: u16,
    /// Pulse for 180°
    pub max_us: u16,
}

impl Default for PulseRange {
    fn default() -> Self {
        Self { min_us: 1000, max_us: 2000 }
    }
}

impl PulseRange {
    /// Pulse width for `angle`, clamped to 0-180 degrees.
    ///
    /// Integer interpolation; the result is truncated, so the same angle
    /// always yields the same pulse.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_receiver::servo::PulseRange;
    ///
    /// let range = PulseRange::default();
    /// assert_eq!(range.pulse_for_angle(90), 1500);
    /// assert_eq!(range.pulse_for_angle(-10), 1000);
    /// assert_eq!(range.pulse_for_angle(200), 2000);
    /// ```
    #[must_use]
    pub fn pulse_for_angle(&self, angle: i32) -> u16 {
        let angle = clamp_angle(angle);
        let span = u32::from(self.max_us.saturating_sub(self.min_us));
        let offset = u32::from(angle) * span / u32::from(MAX_ANGLE);
        self.min_us + offset as u16
    }
}

/// Clamp a commanded angle into 0-180 degrees.
#[inline]
#[must_use]
pub fn clamp_angle(angle: i32) -> u8 {
    angle.clamp(0, i32::from(MAX_ANGLE)) as u8
}

/// Current command of one servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    /// Commanded angle after clamping, in degrees
    pub angle: u8,
    /// Pulse width driven on the output, in microseconds
    pub pulse_us: u16,
}

/// Drives the four servo outputs.
pub struct ServoDriver<P: PwmOutput> {
    output: P,
    pins: [u8; SERVO_COUNT],
    pulse_range: PulseRange,
    period: Duration,
    neutral_angle: u8,
    actuators: [Option<ActuatorState>; SERVO_COUNT],
}

impl<P: PwmOutput> std::fmt::Debug for ServoDriver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServoDriver")
            .field("pins", &self.pins)
            .field("pulse_range", &self.pulse_range)
            .field("period", &self.period)
            .field("actuators", &self.actuators)
            .finish_non_exhaustive()
    }
}

impl<P: PwmOutput> ServoDriver<P> {
    /// Create a driver for the configured pins and pulse range.
    ///
    /// No output is touched until [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Pwm`] if the configuration does not list
    /// exactly four pins.
    pub fn new(output: P, config: &ServoConfig) -> Result<Self> {
        let pins: [u8; SERVO_COUNT] = config.pins.as_slice().try_into().map_err(|_| {
            ReceiverError::Pwm(format!(
                "expected {} servo pins, got {}",
                SERVO_COUNT,
                config.pins.len()
            ))
        })?;

        Ok(Self {
            output,
            pins,
            pulse_range: PulseRange {
                min_us: config.min_pulse_us,
                max_us: config.max_pulse_us,
            },
            period: config.period(),
            neutral_angle: config.neutral_angle,
            actuators: [None; SERVO_COUNT],
        })
    }

    /// Start the pulse train of `channel` at the neutral angle.
    ///
    /// # Errors
    ///
    /// Returns error if `channel` does not exist or the output cannot be
    /// configured. There is no retry; the caller treats this as fatal.
    pub fn initialize(&mut self, channel: usize) -> Result<ActuatorState> {
        let pin = *self
            .pins
            .get(channel)
            .ok_or_else(|| ReceiverError::Pwm(format!("no servo channel {}", channel)))?;

        let state = ActuatorState {
            angle: self.neutral_angle,
            pulse_us: self.pulse_range.pulse_for_angle(i32::from(self.neutral_angle)),
        };

        self.output
            .configure(channel, self.period, Duration::from_micros(u64::from(state.pulse_us)))
            .map_err(|e| ReceiverError::Pwm(format!("servo pin {} could not be configured: {}", pin, e)))?;

        self.actuators[channel] = Some(state);
        info!(
            "Servo pin {} initialized: {:?} period, {}° ({} µs)",
            pin, self.period, state.angle, state.pulse_us
        );
        Ok(state)
    }

    /// Command `channel` to `angle` degrees, clamped to 0-180.
    ///
    /// Returns the resulting actuator state, or `None` if the channel was
    /// never initialized.
    pub fn set_angle(&mut self, channel: usize, angle: i32) -> Option<ActuatorState> {
        if self.actuators.get(channel).copied().flatten().is_none() {
            warn!("Ignoring angle {} for uninitialized servo channel {}", angle, channel);
            return None;
        }

        let pin = self.pins[channel];
        let angle = clamp_angle(angle);
        let pulse_us = self.pulse_range.pulse_for_angle(i32::from(angle));

        if let Err(e) = self
            .output
            .set_pulse_width(channel, Duration::from_micros(u64::from(pulse_us)))
        {
            error!("Failed to update servo pin {}: {}", pin, e);
        }

        let state = ActuatorState { angle, pulse_us };
        self.actuators[channel] = Some(state);

        debug!("Servo pin: {} | Angle: {}° | Pulse width: {} µs", pin, angle, pulse_us);
        Some(state)
    }

    /// Current state of `channel`, if initialized
    pub fn actuator(&self, channel: usize) -> Option<ActuatorState> {
        self.actuators.get(channel).copied().flatten()
    }

    /// Current state of all channels
    pub fn actuators(&self) -> &[Option<ActuatorState>; SERVO_COUNT] {
        &self.actuators
    }

    /// Pulse range used for angle conversion
    pub fn pulse_range(&self) -> PulseRange {
        self.pulse_range
    }
}
