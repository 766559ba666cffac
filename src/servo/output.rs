//! Trait abstraction for periodic pulse outputs to enable testing

use std::time::Duration;

use crate::error::Result;

/// Periodic pulse generator with one output per servo channel.
///
/// Implementations apply a new pulse width at the next period boundary so
/// the pulse currently on the wire is never cut short.
pub trait PwmOutput {
    /// Start the periodic output of `channel` with the given period and initial pulse
    fn configure(&mut self, channel: usize, period: Duration, pulse_width: Duration) -> Result<()>;

    /// Set the pulse width used from the next period on
    fn set_pulse_width(&mut self, channel: usize, pulse_width: Duration) -> Result<()>;
}
