//! # Control Loop Module
//!
//! Polls the radio link and drives the servos.
//!
//! Each iteration is either:
//!
//! - **Dispatch**: a packet is available. It is mapped to a new
//!   [`ChannelState`] and the four proportional values are sent to servos
//!   1-4, in that order.
//! - **Idle-Poll**: nothing arrived. Channel and servo state are left
//!   untouched, so the servos hold their last commanded position.
//!
//! There is no link-loss timeout; a silent transmitter leaves the servos
//! where they were.

use tracing::{debug, info, trace};

use crate::channels::{ChannelMapper, ChannelState};
use crate::config::{Config, SERVO_COUNT};
use crate::error::Result;
use crate::link::LinkReceiver;
use crate::servo::{ActuatorState, PwmOutput, ServoDriver};

/// Number of packets between status log messages
pub const LOG_INTERVAL_PACKETS: u64 = 500;

/// Which branch an iteration took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No packet was available
    IdlePoll,
    /// One packet was decoded and dispatched
    Dispatch,
}

/// Owns all receiver state and runs the polling cycle.
pub struct ControlLoop<L: LinkReceiver, P: PwmOutput> {
    link: L,
    mapper: ChannelMapper,
    driver: ServoDriver<P>,
    channels: ChannelState,
    packet_count: u64,
}

impl<L: LinkReceiver, P: PwmOutput> std::fmt::Debug for ControlLoop<L, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("channels", &self.channels)
            .field("driver", &self.driver)
            .field("packet_count", &self.packet_count)
            .finish_non_exhaustive()
    }
}

impl<L: LinkReceiver, P: PwmOutput> ControlLoop<L, P> {
    /// Create a control loop holding neutral channel values.
    pub fn new(link: L, mapper: ChannelMapper, driver: ServoDriver<P>, neutral: ChannelState) -> Self {
        Self {
            link,
            mapper,
            driver,
            channels: neutral,
            packet_count: 0,
        }
    }

    /// Create a control loop from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the servo configuration is unusable.
    pub fn from_config(link: L, output: P, config: &Config) -> Result<Self> {
        let driver = ServoDriver::new(output, &config.servo)?;
        let neutral = ChannelState::neutral(config.channels.neutral, config.channels.discrete_default);
        Ok(Self::new(link, ChannelMapper::from_config(&config.channels), driver, neutral))
    }

    /// Start every servo output at its neutral position.
    ///
    /// # Errors
    ///
    /// Returns the first servo that fails to configure. The remaining
    /// servos are not started.
    pub fn initialize(&mut self) -> Result<()> {
        for channel in 0..SERVO_COUNT {
            self.driver.initialize(channel)?;
        }
        info!("All {} servos at neutral, waiting for packets", SERVO_COUNT);
        Ok(())
    }

    /// Run exactly one iteration.
    pub fn step(&mut self) -> LoopState {
        let Some(packet) = self.link.poll() else {
            trace!("No message received");
            return LoopState::IdlePoll;
        };

        self.channels = self.mapper.map_packet(&packet);
        self.packet_count += 1;
        debug!("Received data: {}", self.channels);

        for (channel, value) in self.channels.proportional().into_iter().enumerate() {
            self.driver.set_angle(channel, i32::from(value));
        }

        if self.packet_count % LOG_INTERVAL_PACKETS == 0 {
            info!("Received {} packets (last: {})", self.packet_count, self.channels);
        }

        LoopState::Dispatch
    }

    /// Poll forever, yielding to the runtime between iterations.
    pub async fn run(&mut self) {
        info!("Starting control loop");
        loop {
            self.step();
            tokio::task::yield_now().await;
        }
    }

    /// Channel values of the last packet (or the startup defaults)
    pub fn channels(&self) -> &ChannelState {
        &self.channels
    }

    /// Current command of every servo
    pub fn actuators(&self) -> &[Option<ActuatorState>; SERVO_COUNT] {
        self.driver.actuators()
    }

    /// Number of packets dispatched so far
    pub fn packet_count(&self) -> u64 {
        self.packet_count
    }
}
