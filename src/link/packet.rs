//! # Radio Packet Format
//!
//! The transmitter sends one flat 6-byte payload per update:
//!
//! | Byte | Field | Use |
//! |------|-------|-----|
//! | 0 | ch1 | Roll (proportional) |
//! | 1 | ch2 | Pitch (proportional) |
//! | 2 | ch3 | Yaw (proportional) |
//! | 3 | ch4 | Trim adjustment (proportional) |
//! | 4 | ch5 | Button (discrete) |
//! | 5 | ch6 | Button (discrete) |
//!
//! There is no sync byte and no checksum; integrity is left to the radio transport.

/// Size of one radio payload in bytes
pub const PACKET_SIZE: usize = 6;

/// Highest raw value a transmitter sends on a proportional channel
pub const RAW_PROPORTIONAL_MAX: u8 = 254;

/// One decoded radio payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packet {
    pub ch1: u8,
    pub ch2: u8,
    pub ch3: u8,
    pub ch4: u8,
    pub ch5: u8,
    pub ch6: u8,
}

impl Packet {
    /// Builds a packet from the fixed-size wire representation.
    #[must_use]
    pub fn from_array(bytes: [u8; PACKET_SIZE]) -> Self {
        let [ch1, ch2, ch3, ch4, ch5, ch6] = bytes;
        Self { ch1, ch2, ch3, ch4, ch5, ch6 }
    }
}
