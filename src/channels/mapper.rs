//! # Channel Mapper Module
//!
//! Maps raw radio packet values to servo angles.
//!
//! ## Channel Assignments
//!
//! | Channel | Function | Default range |
//! |---------|----------|---------------|
//! | CH1 | Roll | 10-170 |
//! | CH2 | Pitch | 10-170 |
//! | CH3 | Yaw | 25-155 |
//! | CH4 | Trim adjustment | 10-170 |
//! | CH5 | Button | passthrough |
//! | CH6 | Button | passthrough |
//!
//! ## Value Ranges
//!
//! - Raw proportional input: 0-254
//! - Output: the channel's range, in degrees
//!
//! ## Usage
//!
//! ```
//! use rc_receiver::channels::ChannelMapper;
//! use rc_receiver::link::Packet;
//!
//! let mapper = ChannelMapper::new();
//! let state = mapper.map_packet(&Packet::from_array([0, 254, 127, 90, 1, 0]));
//!
//! assert_eq!(state.roll, 10);
//! assert_eq!(state.pitch, 170);
//! assert_eq!(state.yaw, 90);
//! assert_eq!(state.aux1, 1);
//! ```

use serde::Deserialize;

use super::state::ChannelState;
use crate::config::ChannelsConfig;
use crate::link::{Packet, RAW_PROPORTIONAL_MAX};

/// Inclusive output range of a proportional channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChannelRange {
    /// Output for raw 0
    pub min: u8,
    /// Output for raw 254 and above
    pub max: u8,
}

impl ChannelRange {
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Scales a raw value (0-254) into this range, rounding to nearest.
    ///
    /// Raw values above 254 saturate to `max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_receiver::channels::ChannelRange;
    ///
    /// let range = ChannelRange::new(10, 170);
    /// assert_eq!(range.scale(0), 10);
    /// assert_eq!(range.scale(127), 90);
    /// assert_eq!(range.scale(254), 170);
    /// ```
    #[inline]
    #[must_use]
    pub fn scale(&self, raw: u8) -> u8 {
        let clamped = u32::from(raw.min(RAW_PROPORTIONAL_MAX));
        let domain = u32::from(RAW_PROPORTIONAL_MAX);
        let span = u32::from(self.max.saturating_sub(self.min));

        // (raw * span + domain / 2) / domain rounds to nearest
        let offset = (clamped * span + domain / 2) / domain;

        self.min + offset as u8
    }
}

/// Maps packets to channel state.
#[derive(Debug, Clone)]
pub struct ChannelMapper {
    /// Output ranges for CH1..CH4
    ranges: [ChannelRange; 4],
}

impl Default for ChannelMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelMapper {
    /// Creates a mapper with the stock ranges.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ranges(ChannelsConfig::default().ranges())
    }

    /// Creates a mapper with the configured ranges.
    #[must_use]
    pub fn from_config(config: &ChannelsConfig) -> Self {
        Self::with_ranges(config.ranges())
    }

    /// Creates a mapper with explicit ranges for CH1..CH4.
    #[must_use]
    pub fn with_ranges(ranges: [ChannelRange; 4]) -> Self {
        Self { ranges }
    }

    /// Output ranges for CH1..CH4.
    #[must_use]
    pub fn ranges(&self) -> &[ChannelRange; 4] {
        &self.ranges
    }

    /// Maps a packet to a complete channel state.
    #[must_use]
    pub fn map_packet(&self, packet: &Packet) -> ChannelState {
        let [roll, pitch, yaw, trim] = self.ranges;

        ChannelState {
            roll: roll.scale(packet.ch1),
            pitch: pitch.scale(packet.ch2),
            yaw: yaw.scale(packet.ch3),
            trim: trim.scale(packet.ch4),
            aux1: packet.ch5,
            aux2: packet.ch6,
        }
    }
}
